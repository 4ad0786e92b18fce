//! Parameter collection for one compilation.

use serde::{Deserialize, Serialize};

use crate::ast::Value;

/// How a bound value shows up in the SQL text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `:p0`, `:p1`, ... (names are always `p<index>`)
    #[default]
    Named,
    /// `$1`, `$2`, ...
    Numbered,
    /// `?`
    Positional,
}

/// Collects literal values in registration order and hands out placeholders.
///
/// One holder belongs to exactly one compilation. `into_parts` consumes it,
/// so a finished holder can not be fed into a second statement.
#[derive(Debug, Default)]
pub struct ParamHolder {
    style: PlaceholderStyle,
    names: Vec<String>,
    values: Vec<Value>,
}

impl ParamHolder {
    pub fn new(style: PlaceholderStyle) -> Self {
        Self {
            style,
            names: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Store `value` and return the placeholder token to splice into SQL.
    pub fn register(&mut self, value: Value) -> String {
        let index = self.values.len();
        let name = format!("p{}", index);
        let token = match self.style {
            PlaceholderStyle::Named => format!(":{}", name),
            PlaceholderStyle::Numbered => format!("${}", index + 1),
            PlaceholderStyle::Positional => "?".to_string(),
        };
        self.names.push(name);
        self.values.push(value);
        token
    }

    pub fn style(&self) -> PlaceholderStyle {
        self.style
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Parameter names, parallel to `values()`.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Value>) {
        (self.names, self.values)
    }
}
