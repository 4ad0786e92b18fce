//! Built-in dialects.

pub mod dm;
pub mod mysql;
pub mod oracle;
pub mod postgres;

pub use dm::DmDialect;
pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
