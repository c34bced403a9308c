//! SQL generation for checksum verification.
//!
//! Every table is checksummed by a single statement per store so that all
//! tables on that store are read as close together in time as possible.

/// Quote a MySQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a possibly schema-qualified table name (`db.table`).
///
/// Names that already contain backticks are assumed to be quoted by the
/// caller and are passed through unchanged.
pub fn quote_table_name(name: &str) -> String {
    if name.contains('`') {
        return name.to_string();
    }
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Generate `CHECKSUM TABLE ... EXTENDED` covering every table, in order.
///
/// The result set has one `(Table, Checksum)` row per table.
pub fn checksum_table_query(tables: &[String]) -> String {
    let list = tables
        .iter()
        .map(|t| quote_table_name(t))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CHECKSUM TABLE {} EXTENDED", list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_escapes_backticks() {
        assert_eq!(quote_ident("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_quote_qualified_name() {
        assert_eq!(quote_table_name("shop.users"), "`shop`.`users`");
        assert_eq!(quote_table_name("users"), "`users`");
        assert_eq!(quote_table_name("`shop`.`my.table`"), "`shop`.`my.table`");
    }

    #[test]
    fn test_checksum_query_lists_tables_in_order() {
        let tables = vec!["shop.users".to_string(), "shop.orders".to_string()];
        assert_eq!(
            checksum_table_query(&tables),
            "CHECKSUM TABLE `shop`.`users`, `shop`.`orders` EXTENDED"
        );
    }
}
