use serde::{Deserialize, Serialize};

use crate::ast::{Operand, Query};
use crate::error::{EzError, EzResult};

/// What a table in the FROM / JOIN list is backed by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableKind {
    /// Bound to entity metadata; the only kind that resolves FIELD names.
    Entity { entity: String },
    /// A physical table name (optionally `schema.table`).
    Db { name: String },
    /// A nested query used as a derived table.
    Subquery(Box<Query>),
    /// Literal SQL emitted verbatim inside parentheses.
    Raw { sql: String },
}

/// A table with its query-unique alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub alias: String,
    pub kind: TableKind,
}

/// The part of a table that column and field references carry around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub alias: String,
    /// Set when the referenced table is an entity table.
    #[serde(default)]
    pub entity: Option<String>,
}

impl Table {
    /// Entity-backed table, e.g. `Table::entity("User", "t0")`.
    pub fn entity(entity: impl Into<String>, alias: impl Into<String>) -> EzResult<Self> {
        let entity = entity.into();
        if entity.is_empty() {
            return Err(EzError::EmptyName("entity name"));
        }
        Self::with_kind(TableKind::Entity { entity }, alias.into())
    }

    /// Plain table name, e.g. `Table::db("audit.log", "l")`.
    pub fn db(name: impl Into<String>, alias: impl Into<String>) -> EzResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(EzError::EmptyName("table name"));
        }
        if !name.split('.').all(is_identifier) {
            return Err(EzError::InvalidIdentifier(name));
        }
        Self::with_kind(TableKind::Db { name }, alias.into())
    }

    /// Derived table over a nested query.
    pub fn subquery(query: Query, alias: impl Into<String>) -> EzResult<Self> {
        Self::with_kind(TableKind::Subquery(Box::new(query)), alias.into())
    }

    /// Literal SQL table expression. The caller is responsible for its content.
    pub fn raw(sql: impl Into<String>, alias: impl Into<String>) -> EzResult<Self> {
        let sql = sql.into();
        if sql.trim().is_empty() {
            return Err(EzError::EmptyName("raw table sql"));
        }
        Self::with_kind(TableKind::Raw { sql }, alias.into())
    }

    fn with_kind(kind: TableKind, alias: String) -> EzResult<Self> {
        if !is_identifier(&alias) {
            return Err(EzError::InvalidAlias(alias));
        }
        Ok(Self { alias, kind })
    }

    /// Re-run the constructor checks, for tables that did not come
    /// through a constructor (e.g. deserialized ones).
    pub(crate) fn check(&self) -> EzResult<()> {
        if !is_identifier(&self.alias) {
            return Err(EzError::InvalidAlias(self.alias.clone()));
        }
        match &self.kind {
            TableKind::Entity { entity } if entity.is_empty() => {
                Err(EzError::EmptyName("entity name"))
            }
            TableKind::Db { name } if name.is_empty() => Err(EzError::EmptyName("table name")),
            TableKind::Db { name } if !name.split('.').all(is_identifier) => {
                Err(EzError::InvalidIdentifier(name.clone()))
            }
            TableKind::Raw { sql } if sql.trim().is_empty() => {
                Err(EzError::EmptyName("raw table sql"))
            }
            _ => Ok(()),
        }
    }

    pub fn entity_name(&self) -> Option<&str> {
        match &self.kind {
            TableKind::Entity { entity } => Some(entity),
            _ => None,
        }
    }

    pub fn is_entity(&self) -> bool {
        self.entity_name().is_some()
    }

    pub fn reference(&self) -> TableRef {
        TableRef {
            alias: self.alias.clone(),
            entity: self.entity_name().map(str::to_string),
        }
    }

    /// `<alias>.<column>`
    pub fn column(&self, column: &str) -> Operand {
        Operand::Column {
            table: self.reference(),
            column: column.to_string(),
            distinct: false,
        }
    }

    /// `DISTINCT <alias>.<column>`, for aggregate arguments.
    pub fn distinct_column(&self, column: &str) -> Operand {
        Operand::Column {
            table: self.reference(),
            column: column.to_string(),
            distinct: true,
        }
    }

    /// Entity field, resolved to its column at compile time.
    ///
    /// Fails immediately when this table carries no entity metadata.
    pub fn field(&self, field: &str) -> EzResult<Operand> {
        self.field_operand(field, false)
    }

    pub fn distinct_field(&self, field: &str) -> EzResult<Operand> {
        self.field_operand(field, true)
    }

    fn field_operand(&self, field: &str, distinct: bool) -> EzResult<Operand> {
        if !self.is_entity() {
            return Err(EzError::FieldOnNonEntity {
                alias: self.alias.clone(),
                field: field.to_string(),
            });
        }
        Ok(Operand::Field {
            table: self.reference(),
            field: field.to_string(),
            distinct,
        })
    }
}

/// Identifiers are emitted unquoted (aliases) or inside quotes (columns);
/// either way only word characters are accepted.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_validation() {
        assert!(Table::entity("User", "t0").is_ok());
        assert!(matches!(Table::entity("User", ""), Err(EzError::InvalidAlias(_))));
        assert!(matches!(Table::db("user", "t 0"), Err(EzError::InvalidAlias(_))));
        assert!(matches!(Table::db("user; drop", "t0"), Err(EzError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_field_requires_entity() {
        let db = Table::db("user", "u").unwrap();
        let err = db.field("name").unwrap_err();
        assert!(matches!(err, EzError::FieldOnNonEntity { .. }));

        let et = Table::entity("User", "t0").unwrap();
        assert!(matches!(et.field("name"), Ok(Operand::Field { .. })));
    }

    #[test]
    fn test_reference_carries_entity() {
        let et = Table::entity("User", "t0").unwrap();
        assert_eq!(et.reference().entity.as_deref(), Some("User"));
        assert_eq!(Table::raw("SELECT 1", "r").unwrap().reference().entity, None);
    }
}
