//! Operand, function, formula, CASE and table fragments.

use crate::ast::{CaseWhen, Formula, Function, Operand, Table, TableKind};
use crate::error::{EzError, EzResult};
use crate::transpiler::dml::select::build_select;
use crate::transpiler::params::ParamHolder;
use crate::transpiler::traits::{RenderCtx, ToSql};

impl ToSql for Operand {
    fn to_sql(&self, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
        match self {
            Operand::Column {
                table,
                column,
                distinct,
            } => Ok(with_distinct(*distinct, ctx.column(table, column))),
            Operand::Field {
                table,
                field,
                distinct,
            } => {
                let column = ctx.field_column(table, field)?;
                Ok(with_distinct(*distinct, ctx.column(table, &column)))
            }
            Operand::Func(f) => f.to_sql(ctx, params),
            Operand::Formula(f) => f.to_sql(ctx, params),
            Operand::CaseWhen(c) => c.to_sql(ctx, params),
            Operand::Value(v) => Ok(params.register(v.clone())),
            Operand::Keywords(k) => Ok(k.clone()),
        }
    }
}

/// Validated queries only carry distinct operands as function arguments.
fn with_distinct(distinct: bool, sql: String) -> String {
    if distinct {
        format!("DISTINCT {}", sql)
    } else {
        sql
    }
}

impl ToSql for Function {
    fn to_sql(&self, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
        let args = self
            .args
            .iter()
            .map(|a| a.to_sql(ctx, params))
            .collect::<EzResult<Vec<_>>>()?;
        Ok(format!("{}({})", self.name, args.join(", ")))
    }
}

impl ToSql for Formula {
    fn to_sql(&self, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
        let mut sql = self.first.to_sql(ctx, params)?;
        if self.rest.is_empty() {
            return Ok(sql);
        }
        for (op, operand) in &self.rest {
            sql.push(' ');
            sql.push_str(op.symbol());
            sql.push(' ');
            sql.push_str(&operand.to_sql(ctx, params)?);
        }
        Ok(format!("({})", sql))
    }
}

impl ToSql for CaseWhen {
    fn to_sql(&self, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
        if self.branches.is_empty() {
            return Err(EzError::EmptyCaseWhen);
        }
        let mut sql = String::from("CASE");
        for (cond, then) in &self.branches {
            let cond_sql = cond.to_sql(ctx, params)?;
            if cond_sql.is_empty() {
                return Err(EzError::InvalidCondition(
                    "CASE branch without condition".to_string(),
                ));
            }
            sql.push_str(&format!(" WHEN {} THEN {}", cond_sql, then.to_sql(ctx, params)?));
        }
        if let Some(otherwise) = &self.otherwise {
            sql.push_str(" ELSE ");
            sql.push_str(&otherwise.to_sql(ctx, params)?);
        }
        sql.push_str(" END");
        Ok(sql)
    }
}

/// `<table sql> <alias>` as it appears after FROM or JOIN.
impl ToSql for Table {
    fn to_sql(&self, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
        let source = match &self.kind {
            TableKind::Entity { entity } => ctx.quote(ctx.catalog.table_name(entity)?),
            TableKind::Db { name } => name
                .split('.')
                .map(|part| ctx.quote(part))
                .collect::<Vec<_>>()
                .join("."),
            TableKind::Subquery(query) => format!("({})", build_select(query, ctx, params)?),
            TableKind::Raw { sql } => format!("({})", sql),
        };
        Ok(format!("{} {}", source, self.alias))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FormulaOp, Table, Value, count_distinct, val};
    use crate::metadata::{EntityInfo, StaticCatalog};
    use crate::transpiler::params::PlaceholderStyle;
    use crate::transpiler::sql::{MySqlDialect, OracleDialect};

    fn catalog() -> StaticCatalog {
        StaticCatalog::new().with(
            EntityInfo::builder("User")
                .field("id", "id")
                .field("userName", "user_name")
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_count_distinct_column() {
        let catalog = catalog();
        let ctx = RenderCtx::new(&MySqlDialect, &catalog, false);
        let mut params = ParamHolder::new(PlaceholderStyle::Named);
        let t0 = Table::entity("User", "t0").unwrap();
        let f = count_distinct(&t0, "id");
        assert_eq!(f.to_sql(&ctx, &mut params).unwrap(), "COUNT(DISTINCT t0.id)");
        assert!(params.is_empty());
    }

    #[test]
    fn test_field_resolves_and_quotes() {
        let catalog = catalog();
        let ctx = RenderCtx::new(&OracleDialect, &catalog, true);
        let mut params = ParamHolder::new(PlaceholderStyle::Named);
        let t0 = Table::entity("User", "t0").unwrap();
        let op = t0.field("userName").unwrap();
        assert_eq!(op.to_sql(&ctx, &mut params).unwrap(), "t0.\"user_name\"");

        let missing = t0.field("nickName").unwrap();
        let err = missing.to_sql(&ctx, &mut params).unwrap_err();
        assert!(matches!(err, EzError::FieldNotFound { ref entity, ref field }
            if entity == "User" && field == "nickName"));
    }

    #[test]
    fn test_formula_parenthesized() {
        let catalog = catalog();
        let ctx = RenderCtx::new(&MySqlDialect, &catalog, false);
        let mut params = ParamHolder::new(PlaceholderStyle::Named);
        let t0 = Table::entity("User", "t0").unwrap();
        let f = Formula {
            first: t0.column("price"),
            rest: vec![(FormulaOp::Mul, val(2)), (FormulaOp::Sub, val(1))],
        };
        assert_eq!(f.to_sql(&ctx, &mut params).unwrap(), "(t0.price * :p0 - :p1)");
        assert_eq!(params.values(), &[Value::Int(2), Value::Int(1)]);
    }

    #[test]
    fn test_entity_table_uses_catalog_name() {
        let catalog = catalog();
        let ctx = RenderCtx::new(&MySqlDialect, &catalog, true);
        let mut params = ParamHolder::new(PlaceholderStyle::Named);
        let t0 = Table::entity("User", "t0").unwrap();
        assert_eq!(t0.to_sql(&ctx, &mut params).unwrap(), "`user` t0");
        let log = Table::db("audit.log", "l").unwrap();
        assert_eq!(log.to_sql(&ctx, &mut params).unwrap(), "`audit`.`log` l");
    }
}
