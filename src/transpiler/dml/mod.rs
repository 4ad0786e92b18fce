//! Statement assembly.

pub mod count;
pub mod delete;
pub mod select;
pub mod update;
