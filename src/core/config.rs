use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest/CNY";

/// Shortest refresh interval a config file may ask for.
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    #[serde(default = "default_rates_url")]
    pub url: String,
    #[serde(default = "default_retries")]
    pub retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            url: default_rates_url(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_min_coverage")]
    pub min_coverage: f64,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            refresh_interval_secs: default_refresh_interval_secs(),
            min_coverage: default_min_coverage(),
            data_path: None,
        }
    }
}

fn default_rates_url() -> String {
    DEFAULT_RATES_URL.to_string()
}

fn default_retries() -> usize {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_refresh_interval_secs() -> u64 {
    3600
}

fn default_min_coverage() -> f64 {
    0.5
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "pricefx", "pricefx").context("Could not determine project directories")
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs < MIN_REFRESH_INTERVAL_SECS {
            bail!(
                "refresh_interval_secs must be at least {}, got {}",
                MIN_REFRESH_INTERVAL_SECS,
                self.refresh_interval_secs
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  url: "http://example.com/rates"
  retries: 0
refresh_interval_secs: 60
min_coverage: 0.8
data_path: "/tmp/pricefx"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.url, "http://example.com/rates");
        assert_eq!(config.provider.retries, 0);
        // Unset provider keys keep their defaults
        assert_eq!(config.provider.retry_delay_ms, 500);
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
        assert_eq!(config.min_coverage, 0.8);
        assert_eq!(config.data_path().unwrap(), PathBuf::from("/tmp/pricefx"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.provider.url, DEFAULT_RATES_URL);
        assert_eq!(config.refresh_interval(), Duration::from_secs(3600));
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/pricefx/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn test_rejects_too_short_refresh_interval() {
        let dir = tempfile::tempdir().unwrap();
        for secs in [0, 1, MIN_REFRESH_INTERVAL_SECS - 1] {
            let path = dir.path().join(format!("config_{secs}.yaml"));
            fs::write(&path, format!("refresh_interval_secs: {secs}\n")).unwrap();

            let err = AppConfig::load_from_path(&path).unwrap_err();
            assert!(err.to_string().contains("Invalid config file"));
            assert!(
                format!("{err:#}").contains("refresh_interval_secs must be at least 60"),
                "unexpected error: {err:#}"
            );
        }

        let path = dir.path().join("config_ok.yaml");
        fs::write(&path, "refresh_interval_secs: 60\n").unwrap();
        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
