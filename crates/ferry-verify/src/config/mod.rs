//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::{Result, VerifyError};
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| VerifyError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut config: Config = serde_yaml::from_str(yaml)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Strip surrounding whitespace from table names.
    ///
    /// Call after overriding `verify.tables` and before [`Config::validate`].
    pub fn normalize(&mut self) {
        for table in &mut self.verify.tables {
            let trimmed = table.trim();
            if trimmed.len() != table.len() {
                *table = trimmed.to_string();
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}
