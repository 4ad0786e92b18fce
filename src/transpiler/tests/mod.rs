//! Transpiler tests.

mod features;

use crate::metadata::{EntityInfo, StaticCatalog};
use crate::transpiler::{CompileOptions, Compiler, PlaceholderStyle};

/// `User` (table `user`) and `Org` (table `sys_org`).
fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with(
            EntityInfo::builder("User")
                .field("id", "id")
                .field("name", "name")
                .field("age", "age")
                .snake_field("userName")
                .snake_field("orgId")
                .build()
                .unwrap(),
        )
        .with(
            EntityInfo::builder("Org")
                .table("sys_org")
                .field("id", "id")
                .field("name", "name")
                .build()
                .unwrap(),
        )
}

/// Compiler that leaves identifiers unquoted, for readable expectations.
fn plain(catalog: &StaticCatalog) -> Compiler<'_> {
    Compiler::new(catalog).with_options(CompileOptions {
        escape_keywords: false,
        placeholder: PlaceholderStyle::Named,
    })
}
