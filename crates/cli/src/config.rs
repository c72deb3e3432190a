//! `verity.toml` loading and environment overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use verity_eval::EvalConfig;
use verity_remote::{DEFAULT_APP_KEY_HEADER, DEFAULT_MAX_PAGE_SIZE};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "verity.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {message}")]
    Read { path: PathBuf, message: String },

    #[error("invalid config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("no service endpoint configured (set [service].endpoint, VERITY_ENDPOINT, --endpoint or use --loopback)")]
    MissingEndpoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub endpoint: Option<String>,
    pub table: String,
    pub app_key: Option<String>,
    pub app_key_header: String,
    pub timeout_secs: u64,
    /// Only used by the loopback service.
    pub max_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            endpoint: None,
            table: "movies".to_string(),
            app_key: None,
            app_key_header: DEFAULT_APP_KEY_HEADER.to_string(),
            timeout_secs: 30,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    pub concurrency: usize,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        SuiteConfig { concurrency: 8 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerityConfig {
    pub service: ServiceConfig,
    pub eval: EvalConfig,
    pub suite: SuiteConfig,
}

impl VerityConfig {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read `path`, or `verity.toml` if it exists, or fall back to
    /// defaults. Environment overrides are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Self::parse(&text, &path)?
            }
            None => VerityConfig::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override service settings from `VERITY_ENDPOINT`, `VERITY_APP_KEY`
    /// and `VERITY_TABLE`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("VERITY_ENDPOINT") {
            self.service.endpoint = Some(endpoint);
        }
        if let Some(key) = lookup("VERITY_APP_KEY") {
            self.service.app_key = Some(key);
        }
        if let Some(table) = lookup("VERITY_TABLE") {
            self.service.table = table;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_eval::{RoundingMode, TextCollation};

    #[test]
    fn empty_file_is_all_defaults() {
        let config = VerityConfig::parse("", Path::new("verity.toml")).unwrap();
        assert_eq!(config, VerityConfig::default());
        assert_eq!(config.service.app_key_header, "X-ZUMO-APPLICATION");
        assert_eq!(config.service.max_page_size, 1000);
    }

    #[test]
    fn full_file() {
        let text = r#"
            [service]
            endpoint = "https://example.test"
            table = "films"
            app_key = "secret"
            timeout_secs = 5

            [eval]
            rounding = "half_even"
            collation = "ordinal"

            [suite]
            concurrency = 2
        "#;
        let config = VerityConfig::parse(text, Path::new("verity.toml")).unwrap();
        assert_eq!(config.service.endpoint.as_deref(), Some("https://example.test"));
        assert_eq!(config.service.table, "films");
        assert_eq!(config.service.timeout_secs, 5);
        assert_eq!(config.eval.rounding, RoundingMode::HalfEven);
        assert_eq!(config.eval.collation, TextCollation::Ordinal);
        assert_eq!(config.suite.concurrency, 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = VerityConfig::parse("[service]\nendpiont = \"x\"\n", Path::new("v.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("v.toml"));
    }

    #[test]
    fn environment_overrides_file() {
        let mut config =
            VerityConfig::parse("[service]\nendpoint = \"https://file\"\n", Path::new("v.toml")).unwrap();
        config.apply_env(|key| match key {
            "VERITY_ENDPOINT" => Some("https://env".to_string()),
            "VERITY_TABLE" => Some("other".to_string()),
            _ => None,
        });
        assert_eq!(config.service.endpoint.as_deref(), Some("https://env"));
        assert_eq!(config.service.table, "other");
        assert_eq!(config.service.app_key, None);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = VerityConfig::load(Some(Path::new("/nonexistent/verity.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
