//! Ergonomic builders for ezsql AST values.
//!
//! Every builder records the first invalid input it sees and reports it
//! from `build()`, so malformed queries fail at construction time.
//!
//! # Modules
//!
//! - `conditions` - WHERE / HAVING / ON chains
//! - `functions` - function calls and aggregate shortcuts
//! - `formula` - arithmetic formulas
//! - `case_when` - CASE WHEN expressions

pub mod case_when;
pub mod conditions;
pub mod formula;
pub mod functions;

pub use case_when::{CaseBuilder, case_when};
pub use conditions::ConditionBuilder;
pub use formula::FormulaBuilder;
pub use functions::{FunctionBuilder, avg, count, count_all, count_distinct, max, min, sum};
