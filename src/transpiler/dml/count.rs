//! Row-count queries.

use crate::ast::Query;
use crate::error::EzResult;
use crate::transpiler::dml::select::{build_unordered, from_where};
use crate::transpiler::params::ParamHolder;
use crate::transpiler::traits::RenderCtx;

/// Alias of the derived table wrapping grouped or distinct queries.
pub const COUNT_ALIAS: &str = "ez_count";

/// `SELECT COUNT(*)` over the rows `query` would return, ignoring ORDER BY
/// and LIMIT.
pub fn build_count(query: &Query, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
    if needs_wrap(query) {
        let inner = build_unordered(query, ctx, params)?;
        return Ok(format!("SELECT COUNT(*) FROM ({}) {}", inner, COUNT_ALIAS));
    }
    Ok(format!("SELECT COUNT(*){}", from_where(query, ctx, params)?))
}

/// Grouping or DISTINCT change the row count, so the data query has to be
/// counted as a whole.
fn needs_wrap(query: &Query) -> bool {
    query.distinct || !query.group_by.is_empty() || !query.having.is_vacant()
}
