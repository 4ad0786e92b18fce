//! UPDATE and DELETE statements.

use serde::{Deserialize, Serialize};

use crate::ast::builders::ConditionBuilder;
use crate::ast::query::Scope;
use crate::ast::{Conditions, Operand, Table, TableKind, Value};
use crate::error::{EzError, EzResult};
use crate::metadata::EntityInfo;

/// `<target> = <value>` inside SET.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetItem {
    /// Column or field of the updated table
    pub target: Operand,
    pub value: Operand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub table: Table,
    pub set: Vec<SetItem>,
    #[serde(default, rename = "where")]
    pub filter: Conditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub table: Table,
    #[serde(default, rename = "where")]
    pub filter: Conditions,
}

fn writable(table: &Table) -> EzResult<()> {
    match table.kind {
        TableKind::Entity { .. } | TableKind::Db { .. } => Ok(()),
        _ => Err(EzError::NotWritable(table.alias.clone())),
    }
}

impl Update {
    pub fn builder(table: Table) -> UpdateBuilder {
        UpdateBuilder {
            update: Update {
                table,
                set: Vec::new(),
                filter: Conditions::default(),
            },
            error: None,
        }
    }

    pub fn validate(&self) -> EzResult<()> {
        self.table.check()?;
        writable(&self.table)?;
        if self.set.is_empty() {
            return Err(EzError::EmptyUpdate(self.table.alias.clone()));
        }
        let scope = Scope::new(vec![&self.table], None)?;
        for item in &self.set {
            match &item.target {
                Operand::Column { table, .. } | Operand::Field { table, .. }
                    if table.alias == self.table.alias => {}
                other => {
                    return Err(EzError::InvalidCondition(format!(
                        "SET target {} is not a column of '{}'",
                        other.describe(),
                        self.table.alias
                    )));
                }
            }
            item.target.check(&scope)?;
            item.value.check(&scope)?;
        }
        self.filter.check(&scope)
    }
}

impl Delete {
    pub fn builder(table: Table) -> DeleteBuilder {
        DeleteBuilder {
            delete: Delete {
                table,
                filter: Conditions::default(),
            },
            error: None,
        }
    }

    /// `DELETE ... WHERE <alias>.<pk> = :p0`
    pub fn by_id(entity: &EntityInfo, alias: &str, id: impl Into<Value>) -> EzResult<Delete> {
        let table = Table::entity(&entity.name, alias)?;
        let pk = table.field(&entity.primary_key)?;
        let id = id.into();
        Delete::builder(table).filter(|w| w.eq(pk, id)).build()
    }

    /// `DELETE ... WHERE <alias>.<pk> IN (:p0, ...)`
    pub fn by_ids<V: Into<Value>>(
        entity: &EntityInfo,
        alias: &str,
        ids: impl IntoIterator<Item = V>,
    ) -> EzResult<Delete> {
        let table = Table::entity(&entity.name, alias)?;
        let pk = table.field(&entity.primary_key)?;
        Delete::builder(table)
            .filter(|w| w.in_values(pk, ids))
            .build()
    }

    pub fn validate(&self) -> EzResult<()> {
        self.table.check()?;
        writable(&self.table)?;
        let scope = Scope::new(vec![&self.table], None)?;
        self.filter.check(&scope)
    }
}

#[derive(Debug)]
pub struct UpdateBuilder {
    update: Update,
    error: Option<EzError>,
}

impl UpdateBuilder {
    /// Apply `f` only when `sure` holds.
    pub fn when(self, sure: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if sure { f(self) } else { self }
    }

    pub fn set(mut self, target: Operand, value: impl Into<Operand>) -> Self {
        self.update.set.push(SetItem {
            target,
            value: value.into(),
        });
        self
    }

    pub fn set_column(self, column: &str, value: impl Into<Operand>) -> Self {
        let target = self.update.table.column(column);
        self.set(target, value)
    }

    pub fn set_field(mut self, field: &str, value: impl Into<Operand>) -> Self {
        match self.update.table.field(field) {
            Ok(target) => self.set(target, value),
            Err(e) => {
                self.error.get_or_insert(e);
                self
            }
        }
    }

    pub fn filter(mut self, f: impl FnOnce(ConditionBuilder) -> ConditionBuilder) -> Self {
        match f(ConditionBuilder::new()).build() {
            Ok(c) => self.update.filter.extend(c),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    pub fn build(self) -> EzResult<Update> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.update.validate()?;
        Ok(self.update)
    }
}

#[derive(Debug)]
pub struct DeleteBuilder {
    delete: Delete,
    error: Option<EzError>,
}

impl DeleteBuilder {
    pub fn filter(mut self, f: impl FnOnce(ConditionBuilder) -> ConditionBuilder) -> Self {
        match f(ConditionBuilder::new()).build() {
            Ok(c) => self.delete.filter.extend(c),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    pub fn build(self) -> EzResult<Delete> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.delete.validate()?;
        Ok(self.delete)
    }
}
