use serde::{Deserialize, Serialize};

use crate::ast::builders::ConditionBuilder;
use crate::ast::query::Scope;
use crate::ast::{Conditions, Table};
use crate::error::{EzError, EzResult};

/// Type of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
            JoinType::Right => "right",
            JoinType::Full => "full",
            JoinType::Cross => "cross",
        }
    }
}

/// A join of `table`, optionally followed by further joins rendered after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub join_type: JoinType,
    pub table: Table,
    /// `None` when no ON condition was ever given; `Some` with a vacant
    /// chain when every condition was skipped. Ignored for cross joins.
    #[serde(default)]
    pub on: Option<Conditions>,
    /// A join built with `sure = false` renders nothing.
    #[serde(default = "default_sure")]
    pub sure: bool,
    #[serde(default)]
    pub joins: Vec<Join>,
}

fn default_sure() -> bool {
    true
}

impl Join {
    pub fn builder(join_type: JoinType, table: Table) -> JoinBuilder {
        JoinBuilder {
            join: Join {
                join_type,
                table,
                on: None,
                sure: true,
                joins: Vec::new(),
            },
            error: None,
        }
    }

    pub fn inner(table: Table) -> JoinBuilder {
        Self::builder(JoinType::Inner, table)
    }

    pub fn left(table: Table) -> JoinBuilder {
        Self::builder(JoinType::Left, table)
    }

    pub fn right(table: Table) -> JoinBuilder {
        Self::builder(JoinType::Right, table)
    }

    pub fn full(table: Table) -> JoinBuilder {
        Self::builder(JoinType::Full, table)
    }

    pub fn cross(table: Table) -> JoinBuilder {
        Self::builder(JoinType::Cross, table)
    }

    /// Whether the join produces output: it is `sure` and, unless it is a
    /// cross join, has an ON condition that renders to something.
    pub fn is_active(&self) -> bool {
        self.sure
            && (self.join_type == JoinType::Cross
                || self.on.as_ref().is_some_and(|on| !on.is_vacant()))
    }

    /// A `sure` non-cross join must have been given an ON condition.
    fn check_on_given(&self) -> EzResult<()> {
        if self.sure && self.join_type != JoinType::Cross && self.on.is_none() {
            return Err(EzError::EmptyJoinCondition {
                kind: self.join_type.name(),
                alias: self.table.alias.clone(),
            });
        }
        Ok(())
    }

    /// Tables declared by this join and its nested joins, in render order.
    /// Inactive joins contribute nothing, nested joins included.
    pub fn tables(&self) -> Vec<&Table> {
        if !self.is_active() {
            return Vec::new();
        }
        let mut out = vec![&self.table];
        for j in &self.joins {
            out.extend(j.tables());
        }
        out
    }

    /// Checks the join against the tables declared before it plus its own
    /// table, then hands the grown list on to the nested joins.
    pub(crate) fn check<'a>(
        &'a self,
        declared: &mut Vec<&'a Table>,
        outer: Option<&Scope<'_>>,
    ) -> EzResult<()> {
        self.check_on_given()?;
        if !self.is_active() {
            return Ok(());
        }
        declared.push(&self.table);
        let scope = Scope::new(declared.clone(), outer)?;
        if let Some(q) = subquery_of(&self.table) {
            q.check_in(Some(&scope))?;
        }
        if self.join_type != JoinType::Cross {
            if let Some(on) = &self.on {
                on.check(&scope)?;
            }
        }
        self.joins
            .iter()
            .try_for_each(|j| j.check(declared, outer))
    }
}

fn subquery_of(table: &Table) -> Option<&crate::ast::Query> {
    match &table.kind {
        crate::ast::TableKind::Subquery(q) => Some(q),
        _ => None,
    }
}

/// Builder for [`Join`].
#[derive(Debug)]
pub struct JoinBuilder {
    join: Join,
    error: Option<EzError>,
}

impl JoinBuilder {
    /// Conditional inclusion: `sure = false` turns the join into a no-op.
    pub fn sure(mut self, sure: bool) -> Self {
        self.join.sure = sure;
        self
    }

    /// Add ON conditions; repeated calls are ANDed.
    pub fn on(mut self, f: impl FnOnce(ConditionBuilder) -> ConditionBuilder) -> Self {
        let b = f(ConditionBuilder::new());
        let attempted = b.attempted();
        match b.build() {
            Ok(c) if attempted => self
                .join
                .on
                .get_or_insert_with(Conditions::default)
                .extend(c),
            Ok(_) => {}
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Nested join rendered right after this one.
    pub fn join(mut self, join: JoinBuilder) -> Self {
        match join.build() {
            Ok(j) => self.join.joins.push(j),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Fails when a non-cross join never received an ON condition. A join
    /// whose conditions were all skipped by `when(false, ..)` is kept and
    /// silently omitted at render time.
    pub fn build(self) -> EzResult<Join> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.join.check_on_given()?;
        Ok(self.join)
    }
}
