//! Engine-agnostic result rows.
//!
//! Stores hand back rows as [`Row`]s of [`SqlValue`]s so that verification
//! strategies can decode columns without depending on a specific driver.

use crate::error::{Result, StoreRole, VerifyError};

/// A single decoded column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,

    /// Signed integer of any width.
    I64(i64),

    /// Unsigned integer of any width.
    U64(u64),

    /// Character data.
    Text(String),

    /// Binary data (or character data the driver could not decode as text).
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Short type label used in decode error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::I64(_) => "signed integer",
            SqlValue::U64(_) => "unsigned integer",
            SqlValue::Text(_) => "text",
            SqlValue::Bytes(_) => "bytes",
        }
    }
}

/// One row of a tabular result, tagged with the store it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    store: StoreRole,
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Build a row. `columns` and `values` are positional.
    pub fn new(store: StoreRole, columns: Vec<String>, values: Vec<SqlValue>) -> Self {
        Self {
            store,
            columns,
            values,
        }
    }

    fn value(&self, idx: usize) -> Result<&SqlValue> {
        self.values.get(idx).ok_or_else(|| {
            VerifyError::row_decode(
                self.store,
                format!(
                    "expected at least {} columns, row has {}",
                    idx + 1,
                    self.values.len()
                ),
            )
        })
    }

    fn column_label(&self, idx: usize) -> String {
        match self.columns.get(idx) {
            Some(name) => format!("column {} ({})", idx, name),
            None => format!("column {}", idx),
        }
    }

    /// Decode a non-NULL string column.
    pub fn get_string(&self, idx: usize) -> Result<String> {
        match self.value(idx)? {
            SqlValue::Text(s) => Ok(s.clone()),
            SqlValue::Bytes(b) => String::from_utf8(b.clone()).map_err(|e| {
                VerifyError::row_decode(
                    self.store,
                    format!("{} is not valid UTF-8: {}", self.column_label(idx), e),
                )
            }),
            other => Err(VerifyError::row_decode(
                self.store,
                format!(
                    "{}: expected text, got {}",
                    self.column_label(idx),
                    other.type_name()
                ),
            )),
        }
    }

    /// Decode a non-NULL 64-bit signed integer column.
    pub fn get_i64(&self, idx: usize) -> Result<i64> {
        match self.value(idx)? {
            SqlValue::I64(v) => Ok(*v),
            SqlValue::U64(v) => i64::try_from(*v).map_err(|_| {
                VerifyError::row_decode(
                    self.store,
                    format!("{}: {} overflows i64", self.column_label(idx), v),
                )
            }),
            other => Err(VerifyError::row_decode(
                self.store,
                format!(
                    "{}: expected integer, got {}",
                    self.column_label(idx),
                    other.type_name()
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: Vec<SqlValue>) -> Row {
        Row::new(
            StoreRole::Target,
            vec!["Table".to_string(), "Checksum".to_string()],
            values,
        )
    }

    #[test]
    fn test_get_string_accepts_utf8_bytes() {
        let r = row(vec![SqlValue::Bytes(b"shop.users".to_vec()), SqlValue::I64(1)]);
        assert_eq!(r.get_string(0).unwrap(), "shop.users");
    }

    #[test]
    fn test_get_i64_accepts_unsigned_in_range() {
        let r = row(vec![SqlValue::Text("t".into()), SqlValue::U64(4_294_967_295)]);
        assert_eq!(r.get_i64(1).unwrap(), 4_294_967_295);
    }

    #[test]
    fn test_get_i64_rejects_overflow() {
        let r = row(vec![SqlValue::Text("t".into()), SqlValue::U64(u64::MAX)]);
        assert!(matches!(r.get_i64(1), Err(VerifyError::RowDecode { .. })));
    }

    #[test]
    fn test_null_checksum_is_decode_error() {
        let r = row(vec![SqlValue::Text("shop.gone".into()), SqlValue::Null]);
        let err = r.get_i64(1).unwrap_err();
        assert_eq!(err.store(), Some(StoreRole::Target));
        assert!(err.to_string().contains("Checksum"));
        assert!(err.to_string().contains("NULL"));
    }

    #[test]
    fn test_missing_column_is_decode_error() {
        let r = row(vec![SqlValue::Text("shop.users".into())]);
        assert!(matches!(r.get_i64(1), Err(VerifyError::RowDecode { .. })));
    }
}
