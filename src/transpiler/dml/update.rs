//! UPDATE SQL generation.

use crate::ast::{Operand, Update};
use crate::error::{EzError, EzResult};
use crate::transpiler::conditions::clause;
use crate::transpiler::params::ParamHolder;
use crate::transpiler::traits::{RenderCtx, ToSql};

pub fn build_update(update: &Update, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
    if update.set.is_empty() {
        return Err(EzError::EmptyUpdate(update.table.alias.clone()));
    }
    let mut sql = String::from("UPDATE ");
    sql.push_str(&update.table.to_sql(ctx, params)?);

    let mut sets = Vec::with_capacity(update.set.len());
    for item in &update.set {
        let target = set_target(&item.target, ctx)?;
        sets.push(format!("{} = {}", target, item.value.to_sql(ctx, params)?));
    }
    sql.push_str(" SET ");
    sql.push_str(&sets.join(", "));
    sql.push_str(&clause("WHERE", &update.filter, ctx, params)?);
    Ok(sql)
}

fn set_target(target: &Operand, ctx: &RenderCtx<'_>) -> EzResult<String> {
    let (table, column) = match target {
        Operand::Column { table, column, .. } => (table, column.clone()),
        Operand::Field { table, field, .. } => (table, ctx.field_column(table, field)?),
        other => {
            return Err(EzError::InvalidCondition(format!(
                "SET target {} is not a column",
                other.describe()
            )));
        }
    };
    if ctx.dialect.qualified_set_target() {
        Ok(ctx.column(table, &column))
    } else {
        Ok(ctx.quote(&column))
    }
}
