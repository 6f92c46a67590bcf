//! Configuration Loader
//!
//! Environment-aware configuration loading. Handles TOML file discovery,
//! environment detection and environment variable overrides.

use config::{Config, Environment, File};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::error::{ConfigResult, ConfigurationError};
use super::ScanFleetConfig;
use crate::constants::{CONFIG_ENV_PREFIX, ENVIRONMENT_VAR};

/// Loaded configuration together with the environment it was resolved for
#[derive(Debug)]
pub struct ConfigManager {
    config: ScanFleetConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_with_overrides(config_dir, environment, None)
    }

    /// Load configuration with an explicit set of environment overrides
    ///
    /// `overrides` replaces the process environment as the source of
    /// `SCANFLEET__*` variables; `None` reads the process environment.
    pub fn load_with_overrides(
        config_dir: Option<PathBuf>,
        environment: &str,
        overrides: Option<HashMap<String, String>>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config = Self::load_and_merge_config(&config_directory, environment, overrides)?;
        config.validate()?;

        debug!(
            "Configuration loaded successfully: {}",
            Self::sanitize_config_for_logging(&config)
        );
        info!(
            environment = %environment,
            database_host = %config.database.host,
            bind_address = %config.server.bind_address(),
            "Configuration loaded"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Build a manager around an already-constructed configuration
    pub fn from_config(config: ScanFleetConfig, environment: &str) -> ConfigResult<Arc<Self>> {
        config.validate()?;
        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory: Self::default_config_directory(),
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &ScanFleetConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Configuration as JSON with secrets masked
    pub fn debug_config(&self) -> serde_json::Value {
        Self::sanitize_config_for_logging(&self.config)
    }

    /// Current environment from `SCANFLEET_ENV`, defaulting to `development`
    pub fn detect_environment() -> String {
        env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string())
    }

    fn default_config_directory() -> PathBuf {
        PathBuf::from("config")
    }

    fn load_and_merge_config(
        config_directory: &Path,
        environment: &str,
        overrides: Option<HashMap<String, String>>,
    ) -> ConfigResult<ScanFleetConfig> {
        let base_file = config_directory.join("default.toml");
        let environment_file = config_directory.join(format!("{environment}.toml"));

        let env_source = Environment::with_prefix(CONFIG_ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(overrides);

        let merged = Config::builder()
            .add_source(File::from(base_file).required(false))
            .add_source(File::from(environment_file).required(false))
            .add_source(env_source)
            .build()
            .map_err(|e| ConfigurationError::load_error(environment, e))?;

        merged
            .try_deserialize::<ScanFleetConfig>()
            .map_err(|e| ConfigurationError::Deserialize(e.to_string()))
    }

    /// Sanitize configuration for safe logging by masking sensitive fields
    fn sanitize_config_for_logging(config: &ScanFleetConfig) -> serde_json::Value {
        let mut config_json = serde_json::json!(config);
        let sensitive_patterns = ["password", "secret", "token", "credential"];
        Self::sanitize_json_recursive(&mut config_json, &sensitive_patterns);
        config_json
    }

    fn sanitize_json_recursive(value: &mut serde_json::Value, sensitive_patterns: &[&str]) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    let key_lower = key.to_lowercase();
                    let is_sensitive = sensitive_patterns
                        .iter()
                        .any(|pattern| key_lower.contains(pattern));

                    if is_sensitive {
                        *val = serde_json::Value::String("[MASKED]".to_string());
                    } else if key_lower == "url" {
                        if let serde_json::Value::String(url) = val {
                            *val = serde_json::Value::String(redact_url_credentials(url));
                        }
                    } else {
                        Self::sanitize_json_recursive(val, sensitive_patterns);
                    }
                }
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    Self::sanitize_json_recursive(item, sensitive_patterns);
                }
            }
            _ => {}
        }
    }
}

/// Hide the userinfo part of a broker URL
fn redact_url_credentials(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}***{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn overrides(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let dir = TempDir::new().unwrap();
        let manager =
            ConfigManager::load_with_overrides(Some(dir.path().to_path_buf()), "test", overrides(&[]))
                .unwrap();

        assert_eq!(manager.config(), &ScanFleetConfig::default());
        assert_eq!(manager.environment(), "test");
    }

    #[test]
    fn test_environment_file_overrides_default_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 9000\n\n[database]\nhost = \"db.default\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("production.toml"),
            "[database]\nhost = \"db.production\"\n",
        )
        .unwrap();

        let manager = ConfigManager::load_with_overrides(
            Some(dir.path().to_path_buf()),
            "production",
            overrides(&[]),
        )
        .unwrap();

        assert_eq!(manager.config().server.port, 9000);
        assert_eq!(manager.config().database.host, "db.production");
        assert_eq!(manager.config().database.port, 3306);
    }

    #[test]
    fn test_environment_variables_take_priority() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.toml"), "[server]\nport = 9000\n").unwrap();

        let manager = ConfigManager::load_with_overrides(
            Some(dir.path().to_path_buf()),
            "development",
            overrides(&[
                ("SCANFLEET__SERVER__PORT", "9100"),
                ("SCANFLEET__RPC__DELIVERY_MODE", "persistent"),
            ]),
        )
        .unwrap();

        assert_eq!(manager.config().server.port, 9100);
        assert_eq!(manager.config().rpc.delivery_mode, "persistent");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.toml"), "[rpc]\ndelivery_mode = \"sometimes\"\n").unwrap();

        let result = ConfigManager::load_with_overrides(
            Some(dir.path().to_path_buf()),
            "development",
            overrides(&[]),
        );
        assert!(matches!(result, Err(ConfigurationError::InvalidValue { .. })));
    }

    #[test]
    fn test_debug_config_masks_secrets() {
        let mut config = ScanFleetConfig::default();
        config.database.password = "hunter2".to_string();
        let manager = ConfigManager::from_config(config, "test").unwrap();

        let json = manager.debug_config();
        assert_eq!(json["database"]["password"], "[MASKED]");
        assert_eq!(json["rpc"]["url"], "amqp://***@localhost:5672/%2f");
        assert_eq!(json["database"]["host"], "localhost");
    }
}
