use crate::ast::Limit;
use crate::transpiler::dialect::DbType;
use crate::transpiler::traits::SqlDialect;

/// Oracle 12c+ row limiting.
pub struct OracleDialect;

impl SqlDialect for OracleDialect {
    fn db_type(&self) -> DbType {
        DbType::Oracle
    }

    fn limit_offset(&self, limit: &Limit) -> String {
        format!(
            " OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
            limit.skip, limit.size
        )
    }
}
