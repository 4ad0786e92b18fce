//! JOIN chain rendering.

use tracing::debug;

use crate::ast::{Join, JoinType};
use crate::error::EzResult;
use crate::transpiler::conditions::clause;
use crate::transpiler::params::ParamHolder;
use crate::transpiler::traits::{RenderCtx, ToSql};

/// ` <KIND> JOIN <table> ON <cond>` followed by the nested joins in order.
///
/// An inactive join (not `sure`, or every ON condition skipped) renders to
/// nothing, and so do the joins nested under it.
impl ToSql for Join {
    fn to_sql(&self, ctx: &RenderCtx<'_>, params: &mut ParamHolder) -> EzResult<String> {
        if !self.is_active() {
            debug!(
                "Omitting {} on '{}' (sure = {})",
                self.join_type.keyword(),
                self.table.alias,
                self.sure
            );
            return Ok(String::new());
        }
        let mut sql = format!(
            " {} {}",
            self.join_type.keyword(),
            self.table.to_sql(ctx, params)?
        );
        if let (false, Some(on)) = (self.join_type == JoinType::Cross, &self.on) {
            sql.push_str(&clause("ON", on, ctx, params)?);
        }
        for nested in &self.joins {
            sql.push_str(&nested.to_sql(ctx, params)?);
        }
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Table, val};
    use crate::metadata::StaticCatalog;
    use crate::transpiler::params::PlaceholderStyle;
    use crate::transpiler::sql::PostgresDialect;

    #[test]
    fn test_nested_join_order() {
        let t0 = Table::db("user", "t0").unwrap();
        let t1 = Table::db("org", "t1").unwrap();
        let t2 = Table::db("region", "t2").unwrap();
        let t3 = Table::db("tag", "t3").unwrap();
        let join = Join::left(t1.clone())
            .on(|on| on.eq(t1.column("id"), t0.column("org_id")))
            .join(Join::inner(t3.clone()).sure(false).on(|on| on.eq(t3.column("id"), 1)))
            .join(Join::inner(t2.clone()).on(|on| on.eq(t2.column("id"), t1.column("region_id"))))
            .build()
            .unwrap();

        let catalog = StaticCatalog::new();
        let ctx = RenderCtx::new(&PostgresDialect, &catalog, true);
        let mut params = ParamHolder::new(PlaceholderStyle::Numbered);
        assert_eq!(
            join.to_sql(&ctx, &mut params).unwrap(),
            " LEFT JOIN \"org\" t1 ON t1.\"id\" = t0.\"org_id\" \
             INNER JOIN \"region\" t2 ON t2.\"id\" = t1.\"region_id\""
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_cross_join_has_no_on() {
        let t1 = Table::db("calendar", "c").unwrap();
        let join = Join::cross(t1).build().unwrap();
        let catalog = StaticCatalog::new();
        let ctx = RenderCtx::new(&PostgresDialect, &catalog, false);
        let mut params = ParamHolder::new(PlaceholderStyle::Named);
        assert_eq!(join.to_sql(&ctx, &mut params).unwrap(), " CROSS JOIN calendar c");
    }

    #[test]
    fn test_guarded_on_omits_join() {
        let t1 = Table::db("org", "t1").unwrap();
        let join = Join::inner(t1.clone())
            .on(|on| on.when(false, |on| on.eq(t1.column("id"), val(1))))
            .build()
            .unwrap();
        let catalog = StaticCatalog::new();
        let ctx = RenderCtx::new(&PostgresDialect, &catalog, false);
        let mut params = ParamHolder::new(PlaceholderStyle::Named);
        assert_eq!(join.to_sql(&ctx, &mut params).unwrap(), "");
        assert!(params.is_empty());
    }
}
