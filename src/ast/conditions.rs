use serde::{Deserialize, Serialize};

use crate::ast::query::Scope;
use crate::ast::{Operand, Query, Value};
use crate::error::{EzError, EzResult};

/// How a condition attaches to its left sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl Logic {
    pub fn keyword(&self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }
}

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }
}

/// Right-hand side of IN / NOT IN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InValues {
    List(Vec<Operand>),
    Subquery(Box<Query>),
}

/// A node in a condition chain.
///
/// Every node carries the logical symbol joining it to the node before it;
/// the symbol of the first node in a chain is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// `<left> <op> <right>`
    Compare {
        logic: Logic,
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    /// `<operand> IS [NOT] NULL`
    Null {
        logic: Logic,
        operand: Operand,
        negated: bool,
    },
    /// `<operand> [NOT] IN (...)`
    In {
        logic: Logic,
        operand: Operand,
        negated: bool,
        values: InValues,
    },
    /// `<operand> [NOT] LIKE <pattern>`
    Like {
        logic: Logic,
        operand: Operand,
        negated: bool,
        pattern: Operand,
    },
    /// `<operand> [NOT] BETWEEN <min> AND <max>`
    Between {
        logic: Logic,
        operand: Operand,
        negated: bool,
        min: Operand,
        max: Operand,
    },
    /// Parenthesized sub-chain
    Group { logic: Logic, conditions: Conditions },
}

impl Condition {
    pub fn logic(&self) -> Logic {
        match self {
            Condition::Compare { logic, .. }
            | Condition::Null { logic, .. }
            | Condition::In { logic, .. }
            | Condition::Like { logic, .. }
            | Condition::Between { logic, .. }
            | Condition::Group { logic, .. } => *logic,
        }
    }

    pub(crate) fn check(&self, scope: &Scope) -> EzResult<()> {
        match self {
            Condition::Compare { left, op, right, .. } => {
                left.check(scope)?;
                right.check(scope)?;
                if matches!(right, Operand::Value(Value::Null))
                    && !matches!(op, CompareOp::Eq | CompareOp::Ne)
                {
                    return Err(EzError::InvalidCondition(format!(
                        "{} {} NULL",
                        left.describe(),
                        op.symbol()
                    )));
                }
                Ok(())
            }
            Condition::Null { operand, .. } => operand.check(scope),
            Condition::In {
                operand, values, ..
            } => {
                operand.check(scope)?;
                match values {
                    InValues::List(list) if list.is_empty() => {
                        Err(EzError::EmptyInValues(operand.describe()))
                    }
                    InValues::List(list) => list.iter().try_for_each(|v| v.check(scope)),
                    InValues::Subquery(q) => q.check_in(Some(scope)),
                }
            }
            Condition::Like {
                operand, pattern, ..
            } => {
                operand.check(scope)?;
                pattern.check(scope)
            }
            Condition::Between {
                operand, min, max, ..
            } => {
                operand.check(scope)?;
                min.check(scope)?;
                max.check(scope)
            }
            Condition::Group { conditions, .. } => conditions.check(scope),
        }
    }
}

/// A flat chain of conditions, folded left to right when rendered.
///
/// An empty chain renders to nothing, and the clause owning it is dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions(pub Vec<Condition>);

impl Conditions {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.0.iter()
    }

    /// True when the chain renders to nothing: it is empty or holds only
    /// groups that are themselves vacant.
    pub fn is_vacant(&self) -> bool {
        self.0.iter().all(|c| match c {
            Condition::Group { conditions, .. } => conditions.is_vacant(),
            _ => false,
        })
    }

    /// Append another chain; its first node keeps its own logic symbol.
    pub fn extend(&mut self, other: Conditions) {
        self.0.extend(other.0);
    }

    pub(crate) fn check(&self, scope: &Scope) -> EzResult<()> {
        self.0.iter().try_for_each(|c| c.check(scope))
    }
}
