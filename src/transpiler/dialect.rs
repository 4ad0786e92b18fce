//! Dialect tags and the registry that maps them to SQL generators.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{EzError, EzResult};
use crate::transpiler::sql::{DmDialect, MySqlDialect, OracleDialect, PostgresDialect};
use crate::transpiler::traits::SqlDialect;

/// Supported database products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    MySql,
    Oracle,
    Dm,
    #[serde(alias = "postgres")]
    PostgreSql,
}

impl DbType {
    pub const ALL: [DbType; 4] = [DbType::MySql, DbType::Oracle, DbType::Dm, DbType::PostgreSql];

    /// Canonical lowercase tag.
    pub fn tag(&self) -> &'static str {
        match self {
            DbType::MySql => "mysql",
            DbType::Oracle => "oracle",
            DbType::Dm => "dm",
            DbType::PostgreSql => "postgresql",
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DbType {
    type Err = EzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(DbType::MySql),
            "oracle" => Ok(DbType::Oracle),
            "dm" => Ok(DbType::Dm),
            "postgres" | "postgresql" | "pg" => Ok(DbType::PostgreSql),
            _ => Err(EzError::UnsupportedDialect(s.to_string())),
        }
    }
}

/// Read-only map from dialect to its stateless generator.
pub struct DialectRegistry {
    dialects: HashMap<DbType, Box<dyn SqlDialect>>,
}

impl DialectRegistry {
    pub fn empty() -> Self {
        Self {
            dialects: HashMap::new(),
        }
    }

    /// Registry with every built-in dialect.
    pub fn standard() -> Self {
        Self::empty()
            .with(MySqlDialect)
            .with(OracleDialect)
            .with(DmDialect)
            .with(PostgresDialect)
    }

    /// Add (or replace) the generator for `dialect.db_type()`.
    pub fn with(mut self, dialect: impl SqlDialect + 'static) -> Self {
        self.dialects.insert(dialect.db_type(), Box::new(dialect));
        self
    }

    pub fn get(&self, db: DbType) -> EzResult<&dyn SqlDialect> {
        self.dialects
            .get(&db)
            .map(|d| d.as_ref())
            .ok_or_else(|| EzError::UnsupportedDialect(db.to_string()))
    }

    /// Look up by textual tag, e.g. `"pg"`.
    pub fn resolve(&self, tag: &str) -> EzResult<&dyn SqlDialect> {
        self.get(tag.parse()?)
    }

    pub fn contains(&self, db: DbType) -> bool {
        self.dialects.contains_key(&db)
    }

    /// Registered dialects in declaration order.
    pub fn db_types(&self) -> Vec<DbType> {
        let mut types: Vec<DbType> = self.dialects.keys().copied().collect();
        types.sort();
        types
    }
}

impl fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("dialects", &self.db_types())
            .finish()
    }
}

static STANDARD: Lazy<DialectRegistry> = Lazy::new(DialectRegistry::standard);

/// Process-wide registry of the built-in dialects.
pub fn standard() -> &'static DialectRegistry {
    &STANDARD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!("MySQL".parse::<DbType>().unwrap(), DbType::MySql);
        assert_eq!("pg".parse::<DbType>().unwrap(), DbType::PostgreSql);
        assert_eq!(" dm ".parse::<DbType>().unwrap(), DbType::Dm);
        assert!(matches!(
            "sqlite".parse::<DbType>(),
            Err(EzError::UnsupportedDialect(t)) if t == "sqlite"
        ));
    }

    #[test]
    fn test_standard_registry() {
        let registry = standard();
        assert_eq!(registry.db_types(), DbType::ALL.to_vec());
        assert_eq!(registry.resolve("oracle").unwrap().db_type(), DbType::Oracle);
    }

    #[test]
    fn test_empty_registry_rejects() {
        let registry = DialectRegistry::empty().with(MySqlDialect);
        assert!(registry.get(DbType::MySql).is_ok());
        assert!(matches!(
            registry.get(DbType::Oracle),
            Err(EzError::UnsupportedDialect(_))
        ));
    }
}
