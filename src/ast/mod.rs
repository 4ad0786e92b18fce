//! Query object model.
//!
//! Tables, operands, conditions, joins and queries are plain data built
//! through validating builders. Nothing here knows about dialects.

pub mod builders;
pub mod conditions;
pub mod dml;
pub mod expr;
pub mod joins;
pub mod query;
pub mod select;
pub mod table;
pub mod values;

pub use builders::*;
pub use conditions::{CompareOp, Condition, Conditions, InValues, Logic};
pub use dml::{Delete, DeleteBuilder, SetItem, Update, UpdateBuilder};
pub use expr::{CaseWhen, Formula, FormulaOp, Function, Operand, keywords, val};
pub use joins::{Join, JoinBuilder, JoinType};
pub use query::{Query, QueryBuilder};
pub use select::{Direction, Limit, OrderBy, SelectItem};
pub use table::{Table, TableKind, TableRef};
pub use values::Value;
