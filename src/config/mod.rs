mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;
use std::time::Duration;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            provider_timeout_sec: default_provider_timeout_sec(),
            providers: ProvidersConfig::default(),
            budget: BudgetConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config if the file exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider_timeout_sec == 0 {
            return Err(ConfigError::Invalid {
                field: "provider_timeout_sec",
                reason: "must be greater than zero".to_string(),
            });
        }

        let budget = &self.budget;
        for (field, value) in [
            ("budget.max_bundle_kb", budget.max_bundle_kb),
            ("budget.max_reads_per_action", budget.max_reads_per_action),
            ("budget.tti_ms_per_kb", budget.tti_ms_per_kb),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a non-negative number, got {}", value),
                });
            }
        }

        if !budget.compression_factor.is_finite() || budget.compression_factor <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "budget.compression_factor",
                reason: format!("expected a positive number, got {}", budget.compression_factor),
            });
        }

        Ok(())
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_sec)
    }
}
