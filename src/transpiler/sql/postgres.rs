use crate::ast::Limit;
use crate::transpiler::dialect::DbType;
use crate::transpiler::traits::SqlDialect;

pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn db_type(&self) -> DbType {
        DbType::PostgreSql
    }

    fn limit_offset(&self, limit: &Limit) -> String {
        format!(" LIMIT {} OFFSET {}", limit.size, limit.skip)
    }

    /// `UPDATE t x SET x.col = ...` is rejected; SET names bare columns.
    fn qualified_set_target(&self) -> bool {
        false
    }
}
