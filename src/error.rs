//! Error types for ezsql.

use thiserror::Error;

/// The main error type for ezsql operations.
///
/// Build errors are raised while constructing AST values, resolution errors
/// while compiling them. Either aborts the whole operation; no partial SQL
/// is ever returned.
#[derive(Debug, Error)]
pub enum EzError {
    /// A required name (function, table, column, field, alias) was empty.
    #[error("{0} can not be empty")]
    EmptyName(&'static str),

    /// A FIELD operand was attached to a table without entity metadata.
    #[error("field '{field}' requires an entity table, but '{alias}' is not one")]
    FieldOnNonEntity { alias: String, field: String },

    /// IN / NOT IN with no values.
    #[error("IN condition on {0} has an empty value set")]
    EmptyInValues(String),

    /// A column or field references a table alias the query does not declare.
    #[error("table alias '{0}' is not declared in this query")]
    DanglingAlias(String),

    /// Column, table or select alias with characters outside `[A-Za-z0-9_$]`.
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// Malformed table alias.
    #[error("invalid table alias '{0}'")]
    InvalidAlias(String),

    /// Two tables in the same query share an alias.
    #[error("table alias '{0}' is declared more than once")]
    DuplicateAlias(String),

    /// A non-cross join was built without any ON condition.
    #[error("{kind} join on '{alias}' has no ON condition")]
    EmptyJoinCondition { kind: &'static str, alias: String },

    /// Invalid skip/size or page/page-size.
    #[error("invalid limit: {0}")]
    InvalidLimit(String),

    /// CASE expression with no WHEN branch.
    #[error("CASE expression needs at least one WHEN branch")]
    EmptyCaseWhen,

    /// A condition that can not be expressed (e.g. `> NULL`).
    #[error("invalid condition: {0}")]
    InvalidCondition(String),

    /// A distinct column or field outside a function argument.
    #[error("DISTINCT on {0} is only allowed inside a function call")]
    MisplacedDistinct(String),

    /// UPDATE without SET items.
    #[error("UPDATE of '{0}' has nothing to set")]
    EmptyUpdate(String),

    /// UPDATE / DELETE aimed at a subquery or raw table.
    #[error("table '{0}' can not be the target of UPDATE or DELETE")]
    NotWritable(String),

    /// Field name has no column mapping on the entity.
    #[error("field '{field}' not found on entity '{entity}'")]
    FieldNotFound { entity: String, field: String },

    /// Entity is not present in the catalog.
    #[error("unknown entity '{0}'")]
    UnknownEntity(String),

    /// No compiler is registered for the dialect.
    #[error("unsupported dialect '{0}'")]
    UnsupportedDialect(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EzError {
    /// Create a field-not-found error.
    pub fn field_not_found(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Whether this error was raised while constructing the AST.
    pub fn is_build_error(&self) -> bool {
        !matches!(
            self,
            Self::FieldNotFound { .. }
                | Self::UnknownEntity(_)
                | Self::UnsupportedDialect(_)
                | Self::Config(_)
                | Self::Json(_)
                | Self::Toml(_)
                | Self::Io(_)
        )
    }
}

/// Result type alias for ezsql operations.
pub type EzResult<T> = Result<T, EzError>;
