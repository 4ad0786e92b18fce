//! DELETE SQL generation.

use crate::ast::Delete;
use crate::error::EzResult;
use crate::transpiler::conditions::clause;
use crate::transpiler::params::ParamHolder;
use crate::transpiler::traits::{RenderCtx, ToSql};

pub fn build_delete(delete: &Delete, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
    let table = delete.table.to_sql(ctx, params)?;
    let mut sql = ctx.dialect.delete_head(&table, &delete.table.alias);
    sql.push_str(&clause("WHERE", &delete.filter, ctx, params)?);
    Ok(sql)
}
