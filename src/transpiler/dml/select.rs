//! SELECT SQL generation.

use crate::ast::{OrderBy, Query, SelectItem};
use crate::error::EzResult;
use crate::transpiler::conditions::clause;
use crate::transpiler::params::ParamHolder;
use crate::transpiler::traits::{RenderCtx, ToSql};

/// Full SELECT: list, FROM, JOIN, WHERE, GROUP BY, HAVING, ORDER BY, LIMIT.
pub fn build_select(query: &Query, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
    let mut sql = build_unordered(query, ctx, params)?;
    sql.push_str(&order_by(&query.order_by, ctx, params)?);
    if let Some(limit) = &query.limit {
        sql.push_str(&ctx.dialect.limit_offset(limit));
    }
    Ok(sql)
}

/// SELECT without ORDER BY and LIMIT.
pub(crate) fn build_unordered(
    query: &Query,
    ctx: &RenderCtx<'_>,
    params: &mut ParamHolder,
) -> EzResult<String> {
    let mut sql = if query.distinct {
        String::from("SELECT DISTINCT ")
    } else {
        String::from("SELECT ")
    };
    sql.push_str(&select_list(query, ctx, params)?);
    sql.push_str(&from_where(query, ctx, params)?);
    sql.push_str(&grouping(query, ctx, params)?);
    Ok(sql)
}

fn select_list(query: &Query, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
    if query.select.is_empty() {
        return Ok(format!("{}.*", query.from.alias));
    }
    let mut items = Vec::with_capacity(query.select.len());
    for item in &query.select {
        items.push(match item {
            SelectItem::All { table } => format!("{}.*", table.alias),
            SelectItem::Expr { operand, alias } => {
                let expr = operand.to_sql(ctx, params)?;
                match alias {
                    Some(a) => format!("{} AS {}", expr, ctx.quote(a)),
                    None => expr,
                }
            }
        });
    }
    Ok(items.join(", "))
}

/// ` FROM <table> <joins> [WHERE ...]`
pub(crate) fn from_where(
    query: &Query,
    ctx: &RenderCtx<'_>,
    params: &mut ParamHolder,
) -> EzResult<String> {
    let mut sql = String::from(" FROM ");
    sql.push_str(&query.from.to_sql(ctx, params)?);
    for join in &query.joins {
        sql.push_str(&join.to_sql(ctx, params)?);
    }
    sql.push_str(&clause("WHERE", &query.filter, ctx, params)?);
    Ok(sql)
}

fn grouping(query: &Query, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
    let mut sql = String::new();
    if !query.group_by.is_empty() {
        let cols = query
            .group_by
            .iter()
            .map(|g| g.to_sql(ctx, params))
            .collect::<EzResult<Vec<_>>>()?;
        sql.push_str(" GROUP BY ");
        sql.push_str(&cols.join(", "));
    }
    sql.push_str(&clause("HAVING", &query.having, ctx, params)?);
    Ok(sql)
}

fn order_by(items: &[OrderBy], ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
    if items.is_empty() {
        return Ok(String::new());
    }
    let parts = items
        .iter()
        .map(|o| -> EzResult<String> {
            Ok(format!("{} {}", o.operand.to_sql(ctx, params)?, o.direction.keyword()))
        })
        .collect::<EzResult<Vec<_>>>()?;
    Ok(format!(" ORDER BY {}", parts.join(", ")))
}
