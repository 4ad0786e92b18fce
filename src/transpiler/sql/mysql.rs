use crate::ast::Limit;
use crate::transpiler::dialect::DbType;
use crate::transpiler::traits::SqlDialect;

pub struct MySqlDialect;

impl SqlDialect for MySqlDialect {
    fn db_type(&self) -> DbType {
        DbType::MySql
    }

    fn limit_offset(&self, limit: &Limit) -> String {
        format!(" LIMIT {}, {}", limit.skip, limit.size)
    }

    /// MySQL only accepts an aliased DELETE target in multi-table form.
    fn delete_head(&self, table_sql: &str, alias: &str) -> String {
        format!("DELETE {} FROM {}", alias, table_sql)
    }
}
