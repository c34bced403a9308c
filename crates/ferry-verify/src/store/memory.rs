//! Scripted in-memory store for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::value::{Row, SqlValue};
use super::Store;
use crate::error::{Result, StoreRole, VerifyError};

/// Store that answers every query with canned checksum rows or a fixed error.
pub(crate) struct MemoryStore {
    role: StoreRole,
    response: Result<Vec<Row>>,
    gate: Option<std::sync::Arc<Notify>>,
    statements: Mutex<Vec<String>>,
}

impl MemoryStore {
    /// Answer with `(Table, Checksum)` rows in the given order.
    pub(crate) fn with_checksums(role: StoreRole, checksums: &[(&str, i64)]) -> Self {
        let rows = checksums
            .iter()
            .map(|(name, sum)| checksum_row(role, name, SqlValue::I64(*sum)))
            .collect();
        Self::with_rows(role, rows)
    }

    pub(crate) fn with_rows(role: StoreRole, rows: Vec<Row>) -> Self {
        Self {
            role,
            response: Ok(rows),
            gate: None,
            statements: Mutex::new(Vec::new()),
        }
    }

    /// Fail every query with a connection error.
    pub(crate) fn failing(role: StoreRole, message: &str) -> Self {
        Self {
            role,
            response: Err(VerifyError::query(role, message)),
            gate: None,
            statements: Mutex::new(Vec::new()),
        }
    }

    /// Hold every query until `gate` is notified.
    pub(crate) fn gated(mut self, gate: std::sync::Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Statements received so far.
    pub(crate) fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

pub(crate) fn checksum_row(role: StoreRole, name: &str, checksum: SqlValue) -> Row {
    Row::new(
        role,
        vec!["Table".to_string(), "Checksum".to_string()],
        vec![SqlValue::Text(name.to_string()), checksum],
    )
}

#[async_trait]
impl Store for MemoryStore {
    fn role(&self) -> StoreRole {
        self.role
    }

    async fn query(&self, sql: &str) -> Result<Vec<Row>> {
        self.statements.lock().unwrap().push(sql.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.response.clone()
    }

    fn db_type(&self) -> &str {
        "memory"
    }
}
