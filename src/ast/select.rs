use serde::{Deserialize, Serialize};

use crate::ast::query::Scope;
use crate::ast::table::is_identifier;
use crate::ast::{Operand, Table, TableRef};
use crate::error::{EzError, EzResult};

/// One entry of the SELECT list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectItem {
    /// `t0.*`
    All { table: TableRef },
    /// `<operand> [AS alias]`
    Expr {
        operand: Operand,
        #[serde(default)]
        alias: Option<String>,
    },
}

impl SelectItem {
    pub fn all(table: &Table) -> Self {
        SelectItem::All {
            table: table.reference(),
        }
    }

    pub fn column(table: &Table, column: &str) -> Self {
        Self::operand(table.column(column))
    }

    /// Field of an entity table, aliased to the field name so rows map
    /// back onto the entity.
    pub fn field(table: &Table, field: &str) -> EzResult<Self> {
        Ok(Self::operand(table.field(field)?).alias(field))
    }

    pub fn operand(operand: impl Into<Operand>) -> Self {
        SelectItem::Expr {
            operand: operand.into(),
            alias: None,
        }
    }

    /// Set the output alias. No-op on `All`.
    pub fn alias(self, name: &str) -> Self {
        match self {
            SelectItem::Expr { operand, .. } => SelectItem::Expr {
                operand,
                alias: Some(name.to_string()),
            },
            all => all,
        }
    }

    pub(crate) fn check(&self, scope: &Scope) -> EzResult<()> {
        match self {
            SelectItem::All { table } => scope.resolve(table).map(|_| ()),
            SelectItem::Expr { operand, alias } => {
                if let Some(a) = alias {
                    if !is_identifier(a) {
                        return Err(EzError::InvalidIdentifier(a.clone()));
                    }
                }
                operand.check(scope)
            }
        }
    }
}

impl From<Operand> for SelectItem {
    fn from(op: Operand) -> Self {
        SelectItem::operand(op)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn keyword(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub operand: Operand,
    #[serde(default)]
    pub direction: Direction,
}

/// Row window: skip `skip` rows, return at most `size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    pub skip: u64,
    pub size: u64,
}

impl Limit {
    pub fn new(skip: u64, size: u64) -> EzResult<Self> {
        if size == 0 {
            return Err(EzError::InvalidLimit("size must be positive".to_string()));
        }
        Ok(Self { skip, size })
    }

    pub(crate) fn check(&self) -> EzResult<()> {
        Self::new(self.skip, self.size).map(|_| ())
    }

    /// 1-based page number.
    pub fn page(page: u64, page_size: u64) -> EzResult<Self> {
        if page == 0 {
            return Err(EzError::InvalidLimit("page numbers start at 1".to_string()));
        }
        let skip = (page - 1)
            .checked_mul(page_size)
            .ok_or_else(|| EzError::InvalidLimit(format!("page {} overflows", page)))?;
        Self::new(skip, page_size)
    }
}
