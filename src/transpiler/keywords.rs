//! Identifier quoting per dialect.

use crate::transpiler::dialect::DbType;

/// Quote character used around column and table identifiers.
pub fn keyword_qm(db: DbType) -> &'static str {
    match db {
        DbType::MySql => "`",
        DbType::Oracle | DbType::Dm | DbType::PostgreSql => "\"",
    }
}

/// Wrap `name` in the dialect quote, doubling any embedded quote character.
pub fn quote_with(qm: &str, name: &str) -> String {
    let doubled = format!("{qm}{qm}");
    format!("{}{}{}", qm, name.replace(qm, &doubled), qm)
}
