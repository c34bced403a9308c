//! # ferry-verify
//!
//! Background consistency verification for live table migrations.
//!
//! After (or while) rows are copied from a source store to a target store,
//! a [`Verifier`] confirms that both stores hold the same table contents
//! without blocking the migration:
//!
//! - **Checksum verification** using one `CHECKSUM TABLE ... EXTENDED` per store
//! - **Non-blocking start** with a single background task per run
//! - **Waitable completion** from any number of tasks or threads
//! - **Pluggable strategies** behind the [`Verifier`] trait
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ferry_verify::{ChecksumTableVerifier, Config, MysqlStore, StoreRole, Verifier, VerifyContext};
//!
//! #[tokio::main]
//! async fn main() -> ferry_verify::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let source = MysqlStore::connect(&config.source, StoreRole::Source).await?;
//!     let target = MysqlStore::connect(&config.target, StoreRole::Target).await?;
//!
//!     let verifier = ChecksumTableVerifier::new(config.verify.tables.clone());
//!     verifier.start(VerifyContext::new(Arc::new(source), Arc::new(target)))?;
//!     verifier.wait().await;
//!
//!     println!("Mismatched tables: {:?}", verifier.mismatches()?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod store;
pub mod verify;

// Re-exports for convenient access
pub use config::{Config, StoreConfig, VerifyConfig};
pub use error::{Result, StoreRole, VerifyError};
pub use store::{MysqlStore, Row, SqlValue, Store};
pub use verify::{
    ChecksumTableVerifier, RunHandle, RunState, VerificationReport, Verifier, VerifyContext,
};
