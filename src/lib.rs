//! # ezsql: query objects to dialect SQL
//!
//! Build a query from tables, joins and conditions, then compile it into
//! parameterized SQL for MySQL, Oracle, DM or PostgreSQL. Literals never
//! reach the SQL text; every one of them is bound through a placeholder.
//!
//! ## Quick Example
//!
//! ```rust
//! use ezsql::prelude::*;
//!
//! let catalog = StaticCatalog::new().with(
//!     EntityInfo::builder("User")
//!         .field("id", "id")
//!         .field("name", "name")
//!         .build()
//!         .unwrap(),
//! );
//!
//! let t0 = Table::entity("User", "t0").unwrap();
//! let query = Query::builder(t0.clone())
//!     .filter(|w| w.eq(t0.field("name").unwrap(), "Ann"))
//!     .limit(5, 10)
//!     .build()
//!     .unwrap();
//!
//! let out = ezsql::compile(&catalog, DbType::MySql, &query).unwrap();
//! assert_eq!(
//!     out.sql,
//!     "SELECT t0.* FROM `user` t0 WHERE t0.`name` = :p0 LIMIT 5, 10"
//! );
//! assert_eq!(out.params, vec![Value::from("Ann")]);
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod metadata;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::error::*;
    pub use crate::metadata::{EntityCatalog, EntityInfo, StaticCatalog};
    pub use crate::transpiler::{
        CompileOptions, CompiledSql, Compiler, DbType, DialectRegistry, PlaceholderStyle,
    };
}

pub use transpiler::compile;
