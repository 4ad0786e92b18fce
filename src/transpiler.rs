//! SQL transpiler for the query AST.
//!
//! Converts validated [`Query`], [`Update`] and [`Delete`] values into
//! dialect-specific SQL text plus the ordered list of bound values.

pub mod conditions;
pub mod dialect;
pub mod dml;
pub mod joins;
pub mod keywords;
pub mod operand;
pub mod params;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ast::{Delete, Query, Update, Value};
use crate::error::EzResult;
use crate::metadata::EntityCatalog;

pub use dialect::{DbType, DialectRegistry};
pub use params::{ParamHolder, PlaceholderStyle};
pub use traits::{RenderCtx, SqlDialect, ToSql};

/// Rendering switches shared by every dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Quote column and table identifiers with the dialect quote mark
    pub escape_keywords: bool,
    pub placeholder: PlaceholderStyle,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            escape_keywords: true,
            placeholder: PlaceholderStyle::Named,
        }
    }
}

/// SQL text with its bound values, in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSql {
    pub sql: String,
    /// Holder names (`p0`, `p1`, ...), parallel to `params`
    pub names: Vec<String>,
    pub params: Vec<Value>,
}

/// Entry point: resolves the dialect, runs one statement builder with a
/// fresh [`ParamHolder`] and hands back the result.
///
/// A compiler holds only shared references, so one instance can serve
/// any number of threads.
#[derive(Clone, Copy)]
pub struct Compiler<'a> {
    registry: &'a DialectRegistry,
    catalog: &'a dyn EntityCatalog,
    options: CompileOptions,
}

impl<'a> Compiler<'a> {
    /// Compiler over the built-in dialects with default options.
    pub fn new(catalog: &'a dyn EntityCatalog) -> Self {
        Self {
            registry: dialect::standard(),
            catalog,
            options: CompileOptions::default(),
        }
    }

    pub fn with_registry(mut self, registry: &'a DialectRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    pub fn compile(&self, db: DbType, query: &Query) -> EzResult<CompiledSql> {
        self.run(db, "select", |ctx, params| {
            dml::select::build_select(query, ctx, params)
        })
    }

    /// Same as [`compile`](Self::compile), with the dialect given as a tag
    /// such as `"mysql"` or `"pg"`.
    pub fn compile_tag(&self, tag: &str, query: &Query) -> EzResult<CompiledSql> {
        self.compile(tag.parse()?, query)
    }

    pub fn compile_count(&self, db: DbType, query: &Query) -> EzResult<CompiledSql> {
        self.run(db, "count", |ctx, params| {
            dml::count::build_count(query, ctx, params)
        })
    }

    pub fn compile_update(&self, db: DbType, update: &Update) -> EzResult<CompiledSql> {
        self.run(db, "update", |ctx, params| {
            dml::update::build_update(update, ctx, params)
        })
    }

    pub fn compile_delete(&self, db: DbType, delete: &Delete) -> EzResult<CompiledSql> {
        self.run(db, "delete", |ctx, params| {
            dml::delete::build_delete(delete, ctx, params)
        })
    }

    fn run(
        &self,
        db: DbType,
        kind: &str,
        build: impl FnOnce(&RenderCtx<'_>, &mut ParamHolder) -> EzResult<String>,
    ) -> EzResult<CompiledSql> {
        let dialect = self.registry.get(db)?;
        let ctx = RenderCtx::new(dialect, self.catalog, self.options.escape_keywords);
        let mut params = ParamHolder::new(self.options.placeholder);
        let sql = build(&ctx, &mut params)?;
        debug!("Compiled {} for {} with {} params", kind, db, params.len());
        trace!("SQL: {}", sql);
        let (names, params) = params.into_parts();
        Ok(CompiledSql { sql, names, params })
    }
}

/// Compile `query` for `db` with the built-in dialects and default options.
pub fn compile(catalog: &dyn EntityCatalog, db: DbType, query: &Query) -> EzResult<CompiledSql> {
    Compiler::new(catalog).compile(db, query)
}
