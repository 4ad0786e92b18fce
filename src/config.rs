//! `ezsql.toml` configuration.
//!
//! ```toml
//! dialect = "mysql"
//! escape_keywords = true
//! placeholder = "named"
//!
//! [[entity]]
//! name = "User"
//! table = "user"
//! snake_fields = ["userName", "orgId"]
//! [entity.fields]
//! id = "id"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EzError, EzResult};
use crate::metadata::{EntityInfo, StaticCatalog};
use crate::transpiler::{CompileOptions, DbType, PlaceholderStyle};

pub const CONFIG_FILE: &str = "ezsql.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default dialect tag
    pub dialect: String,
    pub escape_keywords: bool,
    pub placeholder: PlaceholderStyle,
    #[serde(rename = "entity")]
    pub entities: Vec<EntityConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: DbType::MySql.tag().to_string(),
            escape_keywords: true,
            placeholder: PlaceholderStyle::Named,
            entities: Vec::new(),
        }
    }
}

/// One `[[entity]]` table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityConfig {
    pub name: String,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub primary_key: Option<String>,
    /// Field → column
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Fields mapped to their snake_case name
    #[serde(default)]
    pub snake_fields: Vec<String>,
}

impl EntityConfig {
    pub fn to_info(&self) -> EzResult<EntityInfo> {
        let mut builder = EntityInfo::builder(&self.name);
        if let Some(table) = &self.table {
            builder = builder.table(table);
        }
        if let Some(pk) = &self.primary_key {
            builder = builder.primary_key(pk);
        }
        for (field, column) in &self.fields {
            builder = builder.field(field, column);
        }
        for field in &self.snake_fields {
            builder = builder.snake_field(field);
        }
        builder.build()
    }
}

impl Config {
    pub fn from_toml(text: &str) -> EzResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> EzResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// `./ezsql.toml`, then `<config dir>/ezsql/config.toml`.
    pub fn locate() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|d| d.join("ezsql").join("config.toml"))
            .filter(|p| p.exists())
    }

    /// Load from the first config file found, or fall back to defaults.
    pub fn load() -> EzResult<Self> {
        match Self::locate() {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::from_path(&path)
            }
            None => {
                debug!("No {} found, using defaults", CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    pub fn db_type(&self) -> EzResult<DbType> {
        self.dialect.parse()
    }

    pub fn options(&self) -> CompileOptions {
        CompileOptions {
            escape_keywords: self.escape_keywords,
            placeholder: self.placeholder,
        }
    }

    /// Entity catalog built from the `[[entity]]` tables.
    pub fn catalog(&self) -> EzResult<StaticCatalog> {
        let mut catalog = StaticCatalog::new();
        for entity in &self.entities {
            if catalog.get(&entity.name).is_some() {
                return Err(EzError::Config(format!(
                    "entity '{}' is declared more than once",
                    entity.name
                )));
            }
            catalog.insert(entity.to_info()?);
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::EntityCatalog;

    const SAMPLE: &str = r#"
dialect = "pg"
placeholder = "numbered"

[[entity]]
name = "User"
snake_fields = ["userName"]
[entity.fields]
id = "id"

[[entity]]
name = "Org"
table = "sys_org"
primary_key = "code"
[entity.fields]
code = "org_code"
"#;

    #[test]
    fn test_parse_config() {
        let config = Config::from_toml(SAMPLE).unwrap();
        assert_eq!(config.db_type().unwrap(), DbType::PostgreSql);
        assert!(config.escape_keywords);
        assert_eq!(config.options().placeholder, PlaceholderStyle::Numbered);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.table_name("User").unwrap(), "user");
        assert_eq!(catalog.field_to_column("User", "userName").unwrap(), "user_name");
        assert_eq!(catalog.primary_key_column("Org").unwrap(), "org_code");
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.db_type().unwrap(), DbType::MySql);
    }

    #[test]
    fn test_bad_config() {
        assert!(matches!(Config::from_toml("dialect = 3"), Err(EzError::Toml(_))));

        let dup = "[[entity]]\nname = \"A\"\nfields = { id = \"id\" }\n\
                   [[entity]]\nname = \"A\"\nfields = { id = \"id\" }\n";
        let config = Config::from_toml(dup).unwrap();
        assert!(matches!(config.catalog(), Err(EzError::Config(_))));

        let no_pk = "[[entity]]\nname = \"A\"\n";
        let config = Config::from_toml(no_pk).unwrap();
        assert!(matches!(config.catalog(), Err(EzError::FieldNotFound { .. })));
    }
}
