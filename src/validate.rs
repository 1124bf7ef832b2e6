use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::cli::Cli;

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^/?#\s]+").expect("static URL pattern")
    })
}

/// `scheme://host...`
pub fn is_url(value: &str) -> bool {
    url_pattern().is_match(value)
}

pub fn is_url_or_path(value: &str) -> bool {
    is_url(value) || Path::new(value).exists()
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Collect every problem with the supplied parameters.
///
/// An empty result means the parameters are usable.
pub fn validate(cli: &Cli) -> Vec<String> {
    let mut problems = Vec::new();

    if is_blank(cli.packet_name.as_deref()) {
        problems.push("specify --packet-name".to_string());
    }

    if let Some(repo) = cli.url_link_repo.as_deref() {
        if !is_url_or_path(repo) {
            problems.push("--url-link-repo must be a URL or an existing path".to_string());
        }
    }

    if is_blank(cli.packet_version.as_deref()) {
        problems.push("--packet-version must not be empty".to_string());
    }

    if let Some(output) = cli.output_file.as_deref() {
        if let Some(dir) = output.parent() {
            if !dir.as_os_str().is_empty() && !dir.is_dir() {
                problems.push("directory for --output-file does not exist".to_string());
            }
        }
    }

    if let Some(filter) = cli.packet_filter.as_deref() {
        if filter.trim().is_empty() {
            problems.push("--packet-filter must not be an empty string".to_string());
        }
    }

    problems
}
