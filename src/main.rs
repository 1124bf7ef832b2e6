//! `pomgraph` — inspect a package's dependencies in a local Maven-style repository.
//!
//! The repository holds one directory per package name, one subdirectory per
//! version, and a `pom.xml` descriptor in each version directory.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up logging.
//! 2. Validate the parameters ([`validate`]); problems exit with code `2`.
//! 3. Load config ([`config::load_config`]) and merge it under the CLI values.
//! 4. Run the requested operations in order:
//!    - `--show-direct-deps`: read the root descriptor ([`descriptor`]).
//!    - `--build-graph`: breadth-first graph ([`graph::builder`]), optional
//!      PlantUML + SVG files ([`report::plantuml`], [`report::svg`]), and a
//!      flat listing, ASCII tree or JSON on stdout ([`report::terminal`]).
//!    - `--load-order`: depth-first load order ([`graph::order`]).
//! 5. A malformed descriptor aborts with exit code `1`.

mod cli;
mod config;
mod descriptor;
mod graph;
mod models;
mod report;
mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, OutputFormat};
use config::load_config;
use graph::TraversalOptions;
use models::PackageKey;
use report::terminal::{self, GraphStyle};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!("parsed CLI arguments: {:?}", cli);

    let problems = validate::validate(&cli);
    if !problems.is_empty() {
        eprintln!("{}", "Problems with parameters:".red().bold());
        for (i, problem) in problems.iter().enumerate() {
            eprintln!("{}. {}", i + 1, problem);
        }
        std::process::exit(2);
    }

    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = load_config(&working_dir, cli.config.as_deref())?;

    let filter = cli.packet_filter.clone().or_else(|| config.filter.clone());
    let format = cli.format.or(config.format);
    let options = TraversalOptions {
        filter: filter.clone(),
        descriptor_name: config.descriptor.clone(),
    };

    if cli.show_params || !cli.has_operation() {
        terminal::print_parameters(&[
            ("packet_name", cli.packet_name.clone()),
            ("url_link_repo", cli.url_link_repo.clone()),
            ("repo_work_mode", cli.repo_work_mode.map(|m| m.to_string())),
            ("packet_version", cli.packet_version.clone()),
            ("output_file", cli.output_file.as_ref().map(|p| p.display().to_string())),
            ("format", format.map(|f| f.to_string())),
            ("packet_filter", filter),
        ]);
    }

    // Both are non-blank once validation has passed.
    let root = PackageKey::new(
        cli.packet_name.clone().unwrap_or_default(),
        cli.packet_version.clone().unwrap_or_default(),
    );

    if cli.show_direct_deps {
        let repo = require_repo(&cli, "--show-direct-deps");
        status(&cli, &format!("reading direct dependencies of {}", root));
        let deps = graph::direct_dependencies(&root, &repo, &options)?;
        terminal::print_direct_dependencies(deps.as_deref());
    }

    if cli.build_graph {
        let repo = require_repo(&cli, "--build-graph");
        status(&cli, &format!("building dependency graph of {}", root));
        let dep_graph = graph::builder::build_graph(&root, &repo, &options)?;
        let root_key = root.canonical();

        if let Some(svg_path) = cli.output_file.as_deref() {
            write_diagrams(&dep_graph, &root_key, &config.layout, svg_path, cli.quiet);
        }

        let style = match format {
            Some(OutputFormat::Ascii) => GraphStyle::Tree,
            Some(OutputFormat::Json) => GraphStyle::Json,
            None => GraphStyle::Flat,
        };
        terminal::print_graph(&dep_graph, &root_key, style)?;
    }

    if cli.load_order {
        let repo = require_repo(&cli, "--load-order");
        status(&cli, &format!("resolving load order of {}", root));
        let order = graph::order::resolve_load_order(&root, &repo, &options)?;
        terminal::print_load_order(&order, format == Some(OutputFormat::Json))?;
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn status(cli: &Cli, message: &str) {
    if !cli.quiet {
        eprintln!("  {} {}", "→".cyan(), message);
    }
}

/// The repository argument, or exit with code `2` if an operation needs it and it is missing.
fn require_repo(cli: &Cli, operation: &str) -> PathBuf {
    let Some(repo) = cli.url_link_repo.as_deref() else {
        eprintln!("{} requires --url-link-repo", operation);
        std::process::exit(2);
    };

    if validate::is_url(repo) {
        tracing::warn!(
            "remote repositories are not fetched; {} is read as a local path",
            repo
        );
    }
    PathBuf::from(repo)
}

/// Write the PlantUML description and the SVG diagram. Failures are reported
/// and do not stop the run.
fn write_diagrams(
    dep_graph: &graph::DependencyGraph,
    root_key: &str,
    layout: &report::svg::Layout,
    svg_path: &Path,
    quiet: bool,
) {
    let puml_path = svg_path.with_extension("puml");
    let puml = report::plantuml::render(dep_graph);
    match std::fs::write(&puml_path, puml) {
        Ok(()) if !quiet => eprintln!("  {} wrote {}", "✓".green(), puml_path.display()),
        Ok(()) => {}
        Err(e) => terminal::print_write_failure("PlantUML", &anyhow::Error::new(e)),
    }

    match report::svg::write(dep_graph, root_key, layout, svg_path) {
        Ok(()) if !quiet => eprintln!("  {} wrote {}", "✓".green(), svg_path.display()),
        Ok(()) => {}
        Err(e) => terminal::print_write_failure("SVG", &e),
    }
}
