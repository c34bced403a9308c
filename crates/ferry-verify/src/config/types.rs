//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source store (the side the migration copies from).
    pub source: StoreConfig,

    /// Target store (the side the migration copies into).
    pub target: StoreConfig,

    /// Verification behavior.
    #[serde(default)]
    pub verify: VerifyConfig,
}

/// Connection settings for one MySQL-compatible store.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database type (only "mysql" is supported).
    #[serde(default = "default_mysql")]
    pub r#type: String,

    /// Database host.
    pub host: String,

    /// Database port (default: 3306).
    #[serde(default = "default_mysql_port")]
    pub port: u16,

    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// SSL mode: disabled, preferred, required (default: preferred).
    #[serde(default = "default_preferred")]
    pub ssl_mode: String,

    /// Maximum pooled connections (default: 2, one per query plus slack).
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("type", &self.r#type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Verification behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VerifyConfig {
    /// Tables to checksum, in the order they are listed in the statement.
    #[serde(default)]
    pub tables: Vec<String>,

    /// Give up waiting after this many seconds. The run itself is not
    /// cancelled. Unset means wait forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// Default value functions for serde
fn default_mysql() -> String {
    "mysql".to_string()
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_preferred() -> String {
    "preferred".to_string()
}

fn default_max_connections() -> u32 {
    2
}
