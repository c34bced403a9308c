//! Configuration validation.

use super::{Config, StoreConfig};
use crate::error::{Result, VerifyError};

const SSL_MODES: &[&str] = &["disabled", "preferred", "required"];

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    validate_store("source", &config.source)?;
    validate_store("target", &config.target)?;

    // Comparing a store against itself always passes
    if config.source.host == config.target.host
        && config.source.port == config.target.port
        && config.source.database == config.target.database
    {
        return Err(VerifyError::Config(
            "source and target cannot be the same database".into(),
        ));
    }

    if config.verify.tables.is_empty() {
        return Err(VerifyError::Config(
            "verify.tables must list at least one table".into(),
        ));
    }
    if let Some(name) = config.verify.tables.iter().find(|t| t.trim().is_empty()) {
        return Err(VerifyError::Config(format!(
            "verify.tables contains an empty table name: {:?}",
            name
        )));
    }

    if let Some(0) = config.verify.timeout_secs {
        return Err(VerifyError::Config(
            "verify.timeout_secs must be at least 1".into(),
        ));
    }

    Ok(())
}

fn validate_store(side: &str, store: &StoreConfig) -> Result<()> {
    if store.host.is_empty() {
        return Err(VerifyError::Config(format!("{}.host is required", side)));
    }
    if store.database.is_empty() {
        return Err(VerifyError::Config(format!("{}.database is required", side)));
    }
    if store.user.is_empty() {
        return Err(VerifyError::Config(format!("{}.user is required", side)));
    }
    if store.r#type != "mysql" {
        return Err(VerifyError::Config(format!(
            "{}.type must be 'mysql', got '{}'",
            side, store.r#type
        )));
    }
    if !SSL_MODES.contains(&store.ssl_mode.to_lowercase().as_str()) {
        return Err(VerifyError::Config(format!(
            "{}.ssl_mode must be one of {:?}, got '{}'",
            side, SSL_MODES, store.ssl_mode
        )));
    }
    if store.max_connections == 0 {
        return Err(VerifyError::Config(format!(
            "{}.max_connections must be at least 1",
            side
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VerifyConfig;

    fn store(host: &str, database: &str) -> StoreConfig {
        StoreConfig {
            r#type: "mysql".to_string(),
            host: host.to_string(),
            port: 3306,
            database: database.to_string(),
            user: "ferry".to_string(),
            password: "password".to_string(),
            ssl_mode: "disabled".to_string(),
            max_connections: 2,
        }
    }

    fn valid_config() -> Config {
        Config {
            source: store("source-db", "shop"),
            target: store("target-db", "shop"),
            verify: VerifyConfig {
                tables: vec!["shop.users".to_string(), "shop.orders".to_string()],
                timeout_secs: None,
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_source_host() {
        let mut config = valid_config();
        config.source.host = "".to_string();
        let err = validate(&config).unwrap_err();
        assert_eq!(err, VerifyError::Config("source.host is required".into()));
    }

    #[test]
    fn test_wrong_target_type() {
        let mut config = valid_config();
        config.target.r#type = "postgres".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_same_database_rejected() {
        let mut config = valid_config();
        config.target = config.source.clone();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_table_list_rejected() {
        let mut config = valid_config();
        config.verify.tables.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_blank_table_name_rejected() {
        let mut config = valid_config();
        config.verify.tables.push("  ".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = valid_config();
        config.verify.timeout_secs = Some(0);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_unknown_ssl_mode_rejected() {
        let mut config = valid_config();
        config.source.ssl_mode = "sometimes".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_store_config_debug_redacts_password() {
        let mut config = valid_config();
        config.source.password = "super_secret_password_123".to_string();
        let debug_output = format!("{:?}", config.source);
        assert!(
            debug_output.contains("[REDACTED]"),
            "Debug output should contain [REDACTED]"
        );
        assert!(
            !debug_output.contains("super_secret_password_123"),
            "Debug output should not contain actual password value"
        );
    }
}
