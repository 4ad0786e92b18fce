use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ast::builders::ConditionBuilder;
use crate::ast::{
    Conditions, Direction, Join, JoinBuilder, Limit, Operand, OrderBy, SelectItem, Table,
    TableKind, TableRef, Value,
};
use crate::error::{EzError, EzResult};
use crate::metadata::EntityInfo;

/// A complete SELECT query.
///
/// Built once through [`QueryBuilder`], immutable afterwards, and
/// compilable any number of times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub from: Table,
    #[serde(default)]
    pub distinct: bool,
    /// Empty means `<root alias>.*`
    #[serde(default)]
    pub select: Vec<SelectItem>,
    #[serde(default)]
    pub joins: Vec<Join>,
    #[serde(default, rename = "where")]
    pub filter: Conditions,
    #[serde(default)]
    pub group_by: Vec<Operand>,
    #[serde(default)]
    pub having: Conditions,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    #[serde(default)]
    pub limit: Option<Limit>,
}

impl Query {
    pub fn builder(from: Table) -> QueryBuilder {
        QueryBuilder {
            query: Query {
                from,
                distinct: false,
                select: Vec::new(),
                joins: Vec::new(),
                filter: Conditions::default(),
                group_by: Vec::new(),
                having: Conditions::default(),
                order_by: Vec::new(),
                limit: None,
            },
            error: None,
        }
    }

    /// `SELECT <alias>.* FROM <entity table> <alias> WHERE <alias>.<pk> = :p0`
    pub fn by_id(entity: &EntityInfo, alias: &str, id: impl Into<Value>) -> EzResult<Query> {
        let table = Table::entity(&entity.name, alias)?;
        let pk = table.field(&entity.primary_key)?;
        let id = id.into();
        Query::builder(table).filter(|w| w.eq(pk, id)).build()
    }

    /// `... WHERE <alias>.<pk> IN (:p0, :p1, ...)`
    pub fn by_ids<V: Into<Value>>(
        entity: &EntityInfo,
        alias: &str,
        ids: impl IntoIterator<Item = V>,
    ) -> EzResult<Query> {
        let table = Table::entity(&entity.name, alias)?;
        let pk = table.field(&entity.primary_key)?;
        Query::builder(table)
            .filter(|w| w.in_values(pk, ids))
            .build()
    }

    /// Every table rendered in FROM/JOIN, root first.
    pub fn tables(&self) -> Vec<&Table> {
        let mut out = vec![&self.from];
        for j in &self.joins {
            out.extend(j.tables());
        }
        out
    }

    /// Check the invariants builders enforce, e.g. after deserializing.
    pub fn validate(&self) -> EzResult<()> {
        self.check_in(None)
    }

    pub(crate) fn check_in(&self, outer: Option<&Scope>) -> EzResult<()> {
        let tables = self.tables();
        tables.iter().try_for_each(|t| t.check())?;
        if let Some(limit) = &self.limit {
            limit.check()?;
        }
        if let TableKind::Subquery(q) = &self.from.kind {
            q.check_in(outer)?;
        }
        let scope = Scope::new(tables, outer)?;
        // each ON only sees the tables joined up to that point
        let mut declared = vec![&self.from];
        self.joins
            .iter()
            .try_for_each(|j| j.check(&mut declared, outer))?;
        self.select.iter().try_for_each(|s| s.check(&scope))?;
        self.filter.check(&scope)?;
        self.group_by.iter().try_for_each(|g| g.check(&scope))?;
        self.having.check(&scope)?;
        self.order_by.iter().try_for_each(|o| o.operand.check(&scope))
    }
}

/// Table aliases visible to a query, chained to the enclosing query's
/// aliases for correlated subqueries.
pub(crate) struct Scope<'a> {
    /// alias -> declared entity
    tables: HashMap<&'a str, Option<&'a str>>,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(tables: Vec<&'a Table>, parent: Option<&'a Scope<'a>>) -> EzResult<Self> {
        let mut map = HashMap::with_capacity(tables.len());
        for t in tables {
            if map.insert(t.alias.as_str(), t.entity_name()).is_some() {
                return Err(EzError::DuplicateAlias(t.alias.clone()));
            }
        }
        Ok(Self { tables: map, parent })
    }

    /// Whether the referenced alias is an entity table.
    ///
    /// A reference that names an entity must name the one the alias was
    /// declared with; anything else is a reference to a table this query
    /// does not have.
    pub(crate) fn resolve(&self, table: &TableRef) -> EzResult<bool> {
        match self.tables.get(table.alias.as_str()) {
            Some(declared) => {
                if table.entity.is_some() && table.entity.as_deref() != *declared {
                    return Err(EzError::DanglingAlias(table.alias.clone()));
                }
                Ok(declared.is_some())
            }
            None => match self.parent {
                Some(p) => p.resolve(table),
                None => Err(EzError::DanglingAlias(table.alias.clone())),
            },
        }
    }
}

/// Builder for [`Query`]. The first error is reported by [`build`](Self::build).
#[derive(Debug)]
pub struct QueryBuilder {
    query: Query,
    error: Option<EzError>,
}

impl QueryBuilder {
    fn fail(mut self, e: EzError) -> Self {
        self.error.get_or_insert(e);
        self
    }

    /// Apply `f` only when `sure` holds.
    pub fn when(self, sure: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if sure { f(self) } else { self }
    }

    pub fn distinct(mut self) -> Self {
        self.query.distinct = true;
        self
    }

    pub fn select(mut self, item: impl Into<SelectItem>) -> Self {
        self.query.select.push(item.into());
        self
    }

    pub fn select_all(self, table: &Table) -> Self {
        self.select(SelectItem::all(table))
    }

    pub fn select_column(self, table: &Table, column: &str) -> Self {
        self.select(SelectItem::column(table, column))
    }

    pub fn select_field(self, table: &Table, field: &str) -> Self {
        match SelectItem::field(table, field) {
            Ok(item) => self.select(item),
            Err(e) => self.fail(e),
        }
    }

    pub fn join(mut self, join: JoinBuilder) -> Self {
        match join.build() {
            Ok(j) => {
                self.query.joins.push(j);
                self
            }
            Err(e) => self.fail(e),
        }
    }

    /// WHERE conditions; repeated calls are ANDed.
    pub fn filter(mut self, f: impl FnOnce(ConditionBuilder) -> ConditionBuilder) -> Self {
        match f(ConditionBuilder::new()).build() {
            Ok(c) => {
                self.query.filter.extend(c);
                self
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn group_by(mut self, operand: impl Into<Operand>) -> Self {
        self.query.group_by.push(operand.into());
        self
    }

    pub fn group_by_field(self, table: &Table, field: &str) -> Self {
        match table.field(field) {
            Ok(op) => self.group_by(op),
            Err(e) => self.fail(e),
        }
    }

    /// HAVING conditions; repeated calls are ANDed.
    pub fn having(mut self, f: impl FnOnce(ConditionBuilder) -> ConditionBuilder) -> Self {
        match f(ConditionBuilder::new()).build() {
            Ok(c) => {
                self.query.having.extend(c);
                self
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn order_by(mut self, operand: impl Into<Operand>, direction: Direction) -> Self {
        self.query.order_by.push(OrderBy {
            operand: operand.into(),
            direction,
        });
        self
    }

    pub fn order_asc(self, operand: impl Into<Operand>) -> Self {
        self.order_by(operand, Direction::Asc)
    }

    pub fn order_desc(self, operand: impl Into<Operand>) -> Self {
        self.order_by(operand, Direction::Desc)
    }

    pub fn limit(mut self, skip: u64, size: u64) -> Self {
        match Limit::new(skip, size) {
            Ok(l) => {
                self.query.limit = Some(l);
                self
            }
            Err(e) => self.fail(e),
        }
    }

    /// 1-based page of `page_size` rows.
    pub fn page(mut self, page: u64, page_size: u64) -> Self {
        match Limit::page(page, page_size) {
            Ok(l) => {
                self.query.limit = Some(l);
                self
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn build(self) -> EzResult<Query> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.query.validate()?;
        Ok(self.query)
    }

    /// Build a subquery that references tables of its enclosing query.
    /// Alias checks are deferred to the enclosing query's `build`.
    pub fn build_correlated(self) -> EzResult<Query> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.query),
        }
    }
}
