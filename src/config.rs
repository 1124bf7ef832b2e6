use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::OutputFormat;
use crate::descriptor::DEFAULT_DESCRIPTOR;
use crate::report::svg::Layout;

/// Root configuration structure, deserialized from `.pomgraph/config.toml`.
///
/// Every key is optional; command-line values take precedence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Descriptor file name inside `repo/name/version/`.
    pub descriptor: String,
    /// Exclusion substring applied when `--packet-filter` is not given.
    pub filter: Option<String>,
    /// Output format applied when `--format` is not given.
    pub format: Option<OutputFormat>,
    /// SVG diagram geometry.
    pub layout: Layout,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            descriptor: DEFAULT_DESCRIPTOR.to_string(),
            filter: None,
            format: None,
            layout: Layout::default(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<working_dir>/.pomgraph/config.toml`
/// 3. `~/.config/pomgraph/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = working_dir.join(".pomgraph").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("pomgraph").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(dir.path(), Some(&missing)).is_err());

        let config = Config::default();
        assert_eq!(config.descriptor, "pom.xml");
        assert_eq!(config.layout, Layout::default());
    }

    #[test]
    fn test_local_config_is_picked_up() {
        let dir = TempDir::new().unwrap();
        let cfg_dir = dir.path().join(".pomgraph");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            r#"
filter = "test"
format = "ascii"

[layout]
node_width = 300
"#,
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.filter.as_deref(), Some("test"));
        assert_eq!(config.format, Some(OutputFormat::Ascii));
        assert_eq!(config.descriptor, "pom.xml");
        assert_eq!(config.layout.node_width, 300.0);
        assert_eq!(config.layout.vert_gap, 80.0);
    }

    #[test]
    fn test_override_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "descriptor = \"project.xml\"\n").unwrap();

        let config = load_config(dir.path(), Some(&path)).unwrap();
        assert_eq!(config.descriptor, "project.xml");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "format = \"pdf\"\n").unwrap();
        assert!(load_config(dir.path(), Some(&path)).is_err());
    }
}
