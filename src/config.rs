use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default production endpoint for the PageSpeed Insights API.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory where daily log files are written. Created on first use.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Seconds between polling ticks.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Request timeout for a single API call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Base URL of the measurement API. Overridable for testing.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
            api_base: default_api_base(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_interval_secs() -> u64 {
    60
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

/// Load configuration from a TOML file.
///
/// A missing file is not an error — every setting has a default, so the
/// binary works without any config on disk.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.interval_secs == 0 {
        anyhow::bail!("interval_secs must be > 0");
    }

    if config.timeout_secs == 0 {
        anyhow::bail!("timeout_secs must be > 0");
    }

    if config.api_base.is_empty() {
        anyhow::bail!("api_base must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/speedwatch.toml")).unwrap();
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("speedwatch.toml");
        std::fs::write(&path, "interval_secs = 5\ndata_dir = \"/tmp/sw\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.interval_secs, 5);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/sw"));
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn zero_interval_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("speedwatch.toml");
        std::fs::write(&path, "interval_secs = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("interval_secs"));
    }
}
