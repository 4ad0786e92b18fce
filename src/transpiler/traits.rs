//! Transpiler traits and the per-compile render context.

use crate::ast::{Limit, TableRef};
use crate::error::{EzError, EzResult};
use crate::metadata::EntityCatalog;
use crate::transpiler::dialect::DbType;
use crate::transpiler::keywords::{keyword_qm, quote_with};
use crate::transpiler::params::ParamHolder;

/// Dialect-specific SQL generation.
///
/// Implementations are stateless unit structs; one instance serves any
/// number of concurrent compilations.
pub trait SqlDialect: Send + Sync {
    fn db_type(&self) -> DbType;

    /// Identifier quote character.
    fn quote_mark(&self) -> &'static str {
        keyword_qm(self.db_type())
    }

    /// Row window clause, including its leading space.
    fn limit_offset(&self, limit: &Limit) -> String;

    /// Head of a DELETE statement up to and including the aliased table.
    fn delete_head(&self, table_sql: &str, _alias: &str) -> String {
        format!("DELETE FROM {}", table_sql)
    }

    /// Whether SET targets may carry the table alias.
    fn qualified_set_target(&self) -> bool {
        true
    }
}

/// Everything a fragment renderer needs besides the parameter holder.
pub struct RenderCtx<'a> {
    pub dialect: &'a dyn SqlDialect,
    pub catalog: &'a dyn EntityCatalog,
    /// Quote column and table identifiers
    pub escape: bool,
}

impl<'a> RenderCtx<'a> {
    pub fn new(dialect: &'a dyn SqlDialect, catalog: &'a dyn EntityCatalog, escape: bool) -> Self {
        Self {
            dialect,
            catalog,
            escape,
        }
    }

    pub fn quote(&self, ident: &str) -> String {
        if self.escape {
            quote_with(self.dialect.quote_mark(), ident)
        } else {
            ident.to_string()
        }
    }

    /// `<alias>.<quoted column>`
    pub fn column(&self, table: &TableRef, column: &str) -> String {
        format!("{}.{}", table.alias, self.quote(column))
    }

    /// Physical column behind an entity field.
    pub fn field_column(&self, table: &TableRef, field: &str) -> EzResult<String> {
        let entity = table
            .entity
            .as_deref()
            .ok_or_else(|| EzError::FieldOnNonEntity {
                alias: table.alias.clone(),
                field: field.to_string(),
            })?;
        Ok(self.catalog.field_to_column(entity, field)?.to_string())
    }
}

/// Render an AST node into a SQL fragment, registering literals on the way.
///
/// An empty fragment means the node elided itself.
pub trait ToSql {
    fn to_sql(&self, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String>;
}
