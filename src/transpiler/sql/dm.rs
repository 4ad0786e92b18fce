use crate::ast::Limit;
use crate::transpiler::dialect::DbType;
use crate::transpiler::traits::SqlDialect;

/// Dameng (DM). MySQL-style row window, Oracle-style quoting.
pub struct DmDialect;

impl SqlDialect for DmDialect {
    fn db_type(&self) -> DbType {
        DbType::Dm
    }

    fn limit_offset(&self, limit: &Limit) -> String {
        format!(" LIMIT {}, {}", limit.skip, limit.size)
    }
}
