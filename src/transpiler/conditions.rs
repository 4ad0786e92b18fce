//! Condition chain rendering.
//!
//! A chain folds left to right. When the logic symbol changes the
//! accumulated text is parenthesized first, so `a OR b AND c` keeps the
//! order it was written in: `(a OR b) AND c`.

use crate::ast::{CompareOp, Condition, Conditions, InValues, Logic, Operand, Value};
use crate::error::{EzError, EzResult};
use crate::transpiler::dml::select::build_select;
use crate::transpiler::params::ParamHolder;
use crate::transpiler::traits::{RenderCtx, ToSql};

impl ToSql for Conditions {
    fn to_sql(&self, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
        let mut sql = String::new();
        let mut joined_by: Option<Logic> = None;
        for cond in self.iter() {
            let part = cond.to_sql(ctx, params)?;
            if part.is_empty() {
                continue;
            }
            if sql.is_empty() {
                sql = part;
                continue;
            }
            let logic = cond.logic();
            if joined_by.is_some_and(|prev| prev != logic) {
                sql = format!("({})", sql);
            }
            sql = format!("{} {} {}", sql, logic.keyword(), part);
            joined_by = Some(logic);
        }
        Ok(sql)
    }
}

impl ToSql for Condition {
    fn to_sql(&self, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
        match self {
            Condition::Compare {
                left, op, right, ..
            } => {
                let lhs = left.to_sql(ctx, params)?;
                if let Operand::Value(Value::Null) = right {
                    return match op {
                        CompareOp::Eq => Ok(format!("{} IS NULL", lhs)),
                        CompareOp::Ne => Ok(format!("{} IS NOT NULL", lhs)),
                        _ => Err(EzError::InvalidCondition(format!(
                            "{} {} NULL",
                            left.describe(),
                            op.symbol()
                        ))),
                    };
                }
                let rhs = right.to_sql(ctx, params)?;
                Ok(format!("{} {} {}", lhs, op.symbol(), rhs))
            }
            Condition::Null {
                operand, negated, ..
            } => Ok(format!(
                "{} IS {}NULL",
                operand.to_sql(ctx, params)?,
                not(*negated)
            )),
            Condition::In {
                operand,
                negated,
                values,
                ..
            } => {
                let lhs = operand.to_sql(ctx, params)?;
                let set = match values {
                    InValues::List(list) if list.is_empty() => {
                        return Err(EzError::EmptyInValues(operand.describe()));
                    }
                    InValues::List(list) => list
                        .iter()
                        .map(|v| v.to_sql(ctx, params))
                        .collect::<EzResult<Vec<_>>>()?
                        .join(", "),
                    InValues::Subquery(query) => build_select(query, ctx, params)?,
                };
                Ok(format!("{} {}IN ({})", lhs, not(*negated), set))
            }
            Condition::Like {
                operand,
                negated,
                pattern,
                ..
            } => Ok(format!(
                "{} {}LIKE {}",
                operand.to_sql(ctx, params)?,
                not(*negated),
                pattern.to_sql(ctx, params)?
            )),
            Condition::Between {
                operand,
                negated,
                min,
                max,
                ..
            } => Ok(format!(
                "{} {}BETWEEN {} AND {}",
                operand.to_sql(ctx, params)?,
                not(*negated),
                min.to_sql(ctx, params)?,
                max.to_sql(ctx, params)?
            )),
            Condition::Group { conditions, .. } => {
                let inner = conditions.to_sql(ctx, params)?;
                if inner.is_empty() {
                    Ok(inner)
                } else {
                    Ok(format!("({})", inner))
                }
            }
        }
    }
}

fn not(negated: bool) -> &'static str {
    if negated { "NOT " } else { "" }
}

/// `" <KEYWORD> <conditions>"`, or nothing when the chain renders empty.
pub fn clause(
    keyword: &str,
    conditions: &Conditions,
    ctx: &RenderCtx<'_>,
    params: &mut ParamHolder,
) -> EzResult<String> {
    let body = conditions.to_sql(ctx, params)?;
    if body.is_empty() {
        Ok(body)
    } else {
        Ok(format!(" {} {}", keyword, body))
    }
}
