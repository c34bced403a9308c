//! MySQL/MariaDB store implementation.
//!
//! Uses SQLx for connection pooling and async query execution. Statements are
//! sent over the text protocol so that administrative statements such as
//! `CHECKSUM TABLE` work regardless of prepared-statement support.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow, MySqlSslMode};
use sqlx::{Column, Executor, Row as _, TypeInfo, ValueRef};
use tracing::{debug, info};

use super::value::{Row, SqlValue};
use super::Store;
use crate::config::StoreConfig;
use crate::error::{Result, StoreRole, VerifyError};

/// Connection pool timeout.
const POOL_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// MySQL/MariaDB store backed by an SQLx pool.
pub struct MysqlStore {
    pool: MySqlPool,
    role: StoreRole,
}

impl MysqlStore {
    /// Connect to the store described by `config`.
    pub async fn connect(config: &StoreConfig, role: StoreRole) -> Result<Self> {
        let ssl_mode = match config.ssl_mode.to_lowercase().as_str() {
            "disabled" => MySqlSslMode::Disabled,
            "required" => MySqlSslMode::Required,
            _ => MySqlSslMode::Preferred,
        };

        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password)
            .ssl_mode(ssl_mode);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(POOL_CONNECTION_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| VerifyError::query(role, format!("connecting: {}", e)))?;

        let store = Self::from_pool(pool, role);
        store.ping().await?;

        info!(
            "Connected to MySQL {}: {}:{}/{}",
            role, config.host, config.port, config.database
        );

        Ok(store)
    }

    /// Wrap an existing pool owned by the caller.
    pub fn from_pool(pool: MySqlPool, role: StoreRole) -> Self {
        Self { pool, role }
    }

    /// Convert a MySQL row into an engine-agnostic [`Row`].
    fn convert_row(&self, row: &MySqlRow) -> Result<Row> {
        let mut columns = Vec::with_capacity(row.len());
        let mut values = Vec::with_capacity(row.len());

        for (i, col) in row.columns().iter().enumerate() {
            columns.push(col.name().to_string());
            values.push(self.convert_value(row, i, col.type_info().name())?);
        }

        Ok(Row::new(self.role, columns, values))
    }

    fn convert_value(&self, row: &MySqlRow, i: usize, type_name: &str) -> Result<SqlValue> {
        let decode_err = |e: sqlx::Error| VerifyError::row_decode(self.role, e.to_string());

        let is_null = row.try_get_raw(i).map_err(decode_err)?.is_null();
        if is_null {
            return Ok(SqlValue::Null);
        }

        let upper = type_name.to_uppercase();
        let value = match upper.as_str() {
            t if t.ends_with("UNSIGNED") => SqlValue::U64(row.try_get::<u64, _>(i).map_err(decode_err)?),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
                SqlValue::I64(row.try_get::<i64, _>(i).map_err(decode_err)?)
            }
            "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
                SqlValue::Bytes(row.try_get::<Vec<u8>, _>(i).map_err(decode_err)?)
            }
            _ => match row.try_get::<String, _>(i) {
                Ok(s) => SqlValue::Text(s),
                Err(_) => SqlValue::Bytes(row.try_get::<Vec<u8>, _>(i).map_err(decode_err)?),
            },
        };

        Ok(value)
    }
}

#[async_trait]
impl Store for MysqlStore {
    fn role(&self) -> StoreRole {
        self.role
    }

    async fn query(&self, sql: &str) -> Result<Vec<Row>> {
        debug!("{} query: {}", self.role, sql);

        let rows: Vec<MySqlRow> = (&self.pool)
            .fetch_all(sql)
            .await
            .map_err(|e| VerifyError::query(self.role, e))?;

        rows.iter().map(|row| self.convert_row(row)).collect()
    }

    async fn ping(&self) -> Result<()> {
        (&self.pool)
            .execute("SELECT 1")
            .await
            .map_err(|e| VerifyError::query(self.role, format!("ping: {}", e)))?;
        Ok(())
    }

    fn db_type(&self) -> &str {
        "mysql"
    }
}
