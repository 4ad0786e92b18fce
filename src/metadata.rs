//! Entity metadata: which table an entity lives in and how its fields map
//! to columns.
//!
//! Discovering this metadata is the host's job; ezsql only consumes it
//! through [`EntityCatalog`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EzError, EzResult};

/// Row metadata of one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityInfo {
    pub name: String,
    pub table: String,
    /// Field name of the primary key
    pub primary_key: String,
    /// Field → column, in declaration order
    pub fields: Vec<(String, String)>,
}

impl EntityInfo {
    pub fn builder(name: impl Into<String>) -> EntityInfoBuilder {
        let name = name.into();
        EntityInfoBuilder {
            info: EntityInfo {
                table: to_snake_case(&name),
                name,
                primary_key: "id".to_string(),
                fields: Vec::new(),
            },
        }
    }

    pub fn column_of(&self, field: &str) -> EzResult<&str> {
        self.fields
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, c)| c.as_str())
            .ok_or_else(|| EzError::field_not_found(&self.name, field))
    }

    pub fn primary_key_column(&self) -> EzResult<&str> {
        self.column_of(&self.primary_key)
    }
}

#[derive(Debug, Clone)]
pub struct EntityInfoBuilder {
    info: EntityInfo,
}

impl EntityInfoBuilder {
    /// Table name; defaults to the snake_case entity name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.info.table = table.into();
        self
    }

    /// Primary key field; defaults to `id`.
    pub fn primary_key(mut self, field: impl Into<String>) -> Self {
        self.info.primary_key = field.into();
        self
    }

    /// Field with an explicit column name. Re-declaring a field replaces it.
    pub fn field(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        let field = field.into();
        let column = column.into();
        match self.info.fields.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = column,
            None => self.info.fields.push((field, column)),
        }
        self
    }

    /// Field whose column is its snake_case name (`userAge` → `user_age`).
    pub fn snake_field(self, field: &str) -> Self {
        let column = to_snake_case(field);
        self.field(field, column)
    }

    pub fn build(self) -> EzResult<EntityInfo> {
        if self.info.name.is_empty() {
            return Err(EzError::EmptyName("entity name"));
        }
        if self.info.table.is_empty() {
            return Err(EzError::EmptyName("entity table"));
        }
        self.info.primary_key_column()?;
        Ok(self.info)
    }
}

/// Lookup of entity metadata by entity name.
///
/// Implementations are shared between concurrent compilations and must be
/// safe to read from many threads.
pub trait EntityCatalog: Send + Sync {
    fn entity(&self, name: &str) -> EzResult<&EntityInfo>;

    fn field_to_column(&self, entity: &str, field: &str) -> EzResult<&str> {
        self.entity(entity)?.column_of(field)
    }

    fn primary_key_column(&self, entity: &str) -> EzResult<&str> {
        self.entity(entity)?.primary_key_column()
    }

    fn table_name(&self, entity: &str) -> EzResult<&str> {
        Ok(&self.entity(entity)?.table)
    }
}

/// Immutable in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entities: HashMap<String, Arc<EntityInfo>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, info: EntityInfo) -> Self {
        self.insert(info);
        self
    }

    pub fn insert(&mut self, info: EntityInfo) {
        self.entities.insert(info.name.clone(), Arc::new(info));
    }

    pub fn get(&self, name: &str) -> Option<Arc<EntityInfo>> {
        self.entities.get(name).cloned()
    }

    /// Entity names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityCatalog for StaticCatalog {
    fn entity(&self, name: &str) -> EzResult<&EntityInfo> {
        self.entities
            .get(name)
            .map(|e| e.as_ref())
            .ok_or_else(|| EzError::UnknownEntity(name.to_string()))
    }
}

/// `userAge` → `user_age`, `HTTPCode` → `http_code`
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if i > 0 && (prev_lower || (prev_upper && next_lower)) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> EntityInfo {
        EntityInfo::builder("User")
            .field("id", "id")
            .snake_field("userName")
            .field("sex", "gender")
            .build()
            .unwrap()
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("userAge"), "user_age");
        assert_eq!(to_snake_case("HTTPCode"), "http_code");
        assert_eq!(to_snake_case("UserRole"), "user_role");
        assert_eq!(to_snake_case("id"), "id");
    }

    #[test]
    fn test_field_lookup() {
        let catalog = StaticCatalog::new().with(user());
        assert_eq!(catalog.field_to_column("User", "userName").unwrap(), "user_name");
        assert_eq!(catalog.field_to_column("User", "sex").unwrap(), "gender");
        assert_eq!(catalog.table_name("User").unwrap(), "user");
        assert_eq!(catalog.primary_key_column("User").unwrap(), "id");
    }

    #[test]
    fn test_unresolved_lookups() {
        let catalog = StaticCatalog::new().with(user());
        let err = catalog.field_to_column("User", "age").unwrap_err();
        assert_eq!(err.to_string(), "field 'age' not found on entity 'User'");
        assert!(matches!(catalog.entity("Org"), Err(EzError::UnknownEntity(_))));
    }

    #[test]
    fn test_primary_key_must_be_mapped() {
        let err = EntityInfo::builder("Tag").field("name", "name").build().unwrap_err();
        assert!(matches!(err, EzError::FieldNotFound { .. }));
    }
}
