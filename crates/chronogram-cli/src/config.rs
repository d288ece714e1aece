//! Optional TOML configuration
//!
//! Looked up at `--config PATH`, or `./chronogram.toml` when that file
//! exists. Every key is optional; command-line flags win over the file and
//! the file wins over built-in defaults.
//!
//! ```toml
//! capacity = 40
//! spare_weeks = 1
//! output = "plan.xlsx"
//! csv_output = "plan.csv"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::OutputFormat;

/// File name probed in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "chronogram.toml";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Hours per week
    pub capacity: Option<u32>,
    /// Empty header weeks after the last populated one
    pub spare_weeks: Option<usize>,
    /// Workbook path
    pub output: Option<PathBuf>,
    /// CSV export path
    pub csv_output: Option<PathBuf>,
    /// Stdout preview format
    pub format: Option<OutputFormat>,
}

pub fn parse_config(contents: &str) -> Result<ConfigFile> {
    toml::from_str(contents).context("failed to parse config file")
}

/// Load configuration.
///
/// An explicit path must exist. Without one, `./chronogram.toml` is used if
/// present and defaults apply otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !implicit.is_file() {
                return Ok(ConfigFile::default());
            }
            implicit
        }
    };

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config = parse_config(&contents)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    debug!(path = %path.display(), ?config, "Loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn parse_full_config() {
        let config = parse_config(
            r#"
capacity = 32
spare_weeks = 2
output = "out/plan.xlsx"
csv_output = "out/plan.csv"
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(
            config,
            ConfigFile {
                capacity: Some(32),
                spare_weeks: Some(2),
                output: Some(PathBuf::from("out/plan.xlsx")),
                csv_output: Some(PathBuf::from("out/plan.csv")),
                format: Some(OutputFormat::Json),
            }
        );
    }

    #[test]
    fn parse_empty_config() {
        assert_eq!(parse_config("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(parse_config("colour = \"red\"").is_err());
    }

    #[test]
    fn wrong_type_rejected() {
        assert!(parse_config("capacity = \"forty\"").is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config(Some(Path::new("/nonexistent/chronogram.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn explicit_path_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "capacity = 20").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.capacity, Some(20));
    }
}
