use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Environment variable that overrides `items_per_page`.
pub const ITEMS_PER_PAGE_ENV: &str = "ENDLESS_ITEMS_PER_PAGE";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AdapterConfig {
    /// Page size threshold. A page with fewer items ends appending.
    pub items_per_page: usize,

    /// Whether the placeholder row is shown initially.
    pub keep_appending: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            keep_appending: true,
        }
    }
}

impl AdapterConfig {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            items_per_page,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items_per_page == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }

    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: AdapterConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json_str(&source)
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ITEMS_PER_PAGE_ENV) {
            self.items_per_page = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: ITEMS_PER_PAGE_ENV.to_string(),
                value: value.clone(),
            })?;
        }

        self.validate()?;
        Ok(self)
    }
}
