//! Store handles consumed by verification strategies.
//!
//! A [`Store`] is a live connection to one side of the migration. The
//! orchestrator owns it; verifiers only borrow it for their queries and never
//! close it.

pub mod mysql;
pub mod value;

#[cfg(test)]
pub(crate) mod memory;

pub use mysql::MysqlStore;
pub use value::{Row, SqlValue};

use async_trait::async_trait;

use crate::error::{Result, StoreRole};

/// A queryable relational store.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a verifier's background task can
/// hold an `Arc<dyn Store>` while the orchestrator keeps using it.
#[async_trait]
pub trait Store: Send + Sync {
    /// Which side of the migration this store is.
    fn role(&self) -> StoreRole;

    /// Execute a text statement and return every result row.
    ///
    /// Connection and database errors map to [`VerifyError::Query`];
    /// values the store cannot represent map to [`VerifyError::RowDecode`].
    ///
    /// [`VerifyError::Query`]: crate::error::VerifyError::Query
    /// [`VerifyError::RowDecode`]: crate::error::VerifyError::RowDecode
    async fn query(&self, sql: &str) -> Result<Vec<Row>>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<()> {
        self.query("SELECT 1").await.map(|_| ())
    }

    /// Get the database type identifier (e.g., "mysql").
    fn db_type(&self) -> &str;
}
