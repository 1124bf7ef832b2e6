use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use crate::models::RepoWorkMode;

#[derive(Parser, Debug)]
#[command(
    name = "pomgraph",
    about = "Inspect package dependencies in a local Maven-style repository",
    version
)]
pub struct Cli {
    /// Name of the package to analyze
    #[arg(short = 'n', long = "packet-name", visible_alias = "packet_name")]
    pub packet_name: Option<String>,

    /// Repository URL or path to the test repository
    #[arg(short = 'u', long = "url-link-repo", visible_alias = "url_link_repo")]
    pub url_link_repo: Option<String>,

    /// How the repository is used
    #[arg(short = 'm', long = "repo-work-mode", visible_alias = "repo_work_mode")]
    pub repo_work_mode: Option<RepoWorkMode>,

    /// Package version
    #[arg(short = 'v', long = "packet-version", visible_alias = "packet_version")]
    pub packet_version: Option<String>,

    /// SVG output path; a PlantUML file with the same base name is written next to it
    #[arg(short = 'o', long = "output-file", visible_alias = "output_file", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Output format for the graph and load order
    #[arg(short = 'F', long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Skip dependencies whose name contains this substring
    #[arg(short = 'f', long = "packet-filter", visible_alias = "packet_filter")]
    pub packet_filter: Option<String>,

    /// Print the direct dependencies of the package
    #[arg(long = "show-direct-deps", visible_alias = "show_direct_deps")]
    pub show_direct_deps: bool,

    /// Build and print the full dependency graph
    #[arg(long = "build-graph", visible_alias = "build_graph")]
    pub build_graph: bool,

    /// Print the order in which dependencies must be loaded
    #[arg(long = "load-order", visible_alias = "load_order")]
    pub load_order: bool,

    /// Print the effective parameters as a key/value table
    #[arg(long = "show-params")]
    pub show_params: bool,

    /// Config file [default: ./.pomgraph/config.toml, fallback ~/.config/pomgraph/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print results, no status lines
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// `true` when at least one operation was requested.
    pub fn has_operation(&self) -> bool {
        self.show_direct_deps || self.build_graph || self.load_order
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented ASCII tree
    Ascii,
    /// JSON document
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Ascii => write!(f, "ascii"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::try_parse_from([
            "pomgraph", "-n", "app", "-v", "1.0", "-u", "/repo", "-F", "ascii", "-f", "log",
            "--build-graph",
        ])
        .unwrap();
        assert_eq!(cli.packet_name.as_deref(), Some("app"));
        assert_eq!(cli.packet_version.as_deref(), Some("1.0"));
        assert_eq!(cli.format, Some(OutputFormat::Ascii));
        assert_eq!(cli.packet_filter.as_deref(), Some("log"));
        assert!(cli.build_graph && cli.has_operation());
    }

    #[test]
    fn test_underscore_aliases() {
        let cli = Cli::try_parse_from([
            "pomgraph", "--packet_name", "app", "--repo_work_mode", "prod", "--load_order",
        ])
        .unwrap();
        assert_eq!(cli.repo_work_mode, Some(RepoWorkMode::Prod));
        assert!(cli.load_order);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["pomgraph", "-F", "dot"]).is_err());
    }
}
