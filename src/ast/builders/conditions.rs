//! Condition chain builder for WHERE / HAVING / ON / CASE branches.

use crate::ast::{CompareOp, Condition, Conditions, InValues, Logic, Operand, Query, Value};
use crate::error::{EzError, EzResult};

/// Builds a [`Conditions`] chain.
///
/// Leaves are appended with `AND` unless the previous call was [`or`](Self::or).
/// The first error is kept and reported by [`build`](Self::build).
///
/// ```ignore
/// let cond = ConditionBuilder::new()
///     .eq(user.column("name"), "Ann")
///     .or()
///     .group(|g| g.gt(user.column("age"), 18).lt(user.column("age"), 30))
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct ConditionBuilder {
    conditions: Vec<Condition>,
    next_logic: Logic,
    attempted: bool,
    error: Option<EzError>,
}

impl ConditionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the next condition with AND (the default).
    pub fn and(mut self) -> Self {
        self.next_logic = Logic::And;
        self
    }

    /// Attach the next condition with OR.
    pub fn or(mut self) -> Self {
        self.next_logic = Logic::Or;
        self
    }

    /// Apply `f` only when `sure` holds; otherwise the conditions it would
    /// add are skipped together with their pending connector.
    pub fn when(mut self, sure: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if sure {
            return f(self);
        }
        self.attempted = true;
        self.next_logic = Logic::And;
        self
    }

    fn push(mut self, make: impl FnOnce(Logic) -> EzResult<Condition>) -> Self {
        self.attempted = true;
        let logic = std::mem::take(&mut self.next_logic);
        if self.error.is_some() {
            return self;
        }
        match make(logic) {
            Ok(c) => self.conditions.push(c),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// `<left> <op> <right>`. A NULL literal on the right becomes
    /// `IS [NOT] NULL` for `=`/`<>` and is rejected for other operators.
    pub fn compare(self, left: impl Into<Operand>, op: CompareOp, right: impl Into<Operand>) -> Self {
        let left = left.into();
        let right = right.into();
        self.push(move |logic| {
            if matches!(right, Operand::Value(Value::Null)) {
                return match op {
                    CompareOp::Eq | CompareOp::Ne => Ok(Condition::Null {
                        logic,
                        operand: left,
                        negated: op == CompareOp::Ne,
                    }),
                    _ => Err(EzError::InvalidCondition(format!(
                        "{} {} NULL",
                        left.describe(),
                        op.symbol()
                    ))),
                };
            }
            Ok(Condition::Compare {
                logic,
                left,
                op,
                right,
            })
        })
    }

    pub fn eq(self, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        self.compare(left, CompareOp::Eq, right)
    }

    pub fn ne(self, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        self.compare(left, CompareOp::Ne, right)
    }

    pub fn gt(self, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        self.compare(left, CompareOp::Gt, right)
    }

    pub fn ge(self, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        self.compare(left, CompareOp::Ge, right)
    }

    pub fn lt(self, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        self.compare(left, CompareOp::Lt, right)
    }

    pub fn le(self, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        self.compare(left, CompareOp::Le, right)
    }

    pub fn is_null(self, operand: impl Into<Operand>) -> Self {
        let operand = operand.into();
        self.push(move |logic| {
            Ok(Condition::Null {
                logic,
                operand,
                negated: false,
            })
        })
    }

    pub fn is_not_null(self, operand: impl Into<Operand>) -> Self {
        let operand = operand.into();
        self.push(move |logic| {
            Ok(Condition::Null {
                logic,
                operand,
                negated: true,
            })
        })
    }

    fn in_list(self, operand: Operand, negated: bool, list: Vec<Operand>) -> Self {
        self.push(move |logic| {
            if list.is_empty() {
                return Err(EzError::EmptyInValues(operand.describe()));
            }
            Ok(Condition::In {
                logic,
                operand,
                negated,
                values: InValues::List(list),
            })
        })
    }

    /// `<operand> IN (:p0, :p1, ...)`; an empty set is an error.
    pub fn in_values<V: Into<Value>>(
        self,
        operand: impl Into<Operand>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let list = values.into_iter().map(|v| Operand::Value(v.into())).collect();
        self.in_list(operand.into(), false, list)
    }

    pub fn not_in_values<V: Into<Value>>(
        self,
        operand: impl Into<Operand>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let list = values.into_iter().map(|v| Operand::Value(v.into())).collect();
        self.in_list(operand.into(), true, list)
    }

    /// IN over arbitrary operands (columns, functions, ...).
    pub fn in_operands(self, operand: impl Into<Operand>, list: Vec<Operand>) -> Self {
        self.in_list(operand.into(), false, list)
    }

    pub fn in_subquery(self, operand: impl Into<Operand>, query: Query) -> Self {
        self.subquery(operand.into(), false, query)
    }

    pub fn not_in_subquery(self, operand: impl Into<Operand>, query: Query) -> Self {
        self.subquery(operand.into(), true, query)
    }

    fn subquery(self, operand: Operand, negated: bool, query: Query) -> Self {
        self.push(move |logic| {
            Ok(Condition::In {
                logic,
                operand,
                negated,
                values: InValues::Subquery(Box::new(query)),
            })
        })
    }

    pub fn like(self, operand: impl Into<Operand>, pattern: impl Into<Operand>) -> Self {
        self.like_impl(operand.into(), false, pattern.into())
    }

    pub fn not_like(self, operand: impl Into<Operand>, pattern: impl Into<Operand>) -> Self {
        self.like_impl(operand.into(), true, pattern.into())
    }

    fn like_impl(self, operand: Operand, negated: bool, pattern: Operand) -> Self {
        self.push(move |logic| {
            Ok(Condition::Like {
                logic,
                operand,
                negated,
                pattern,
            })
        })
    }

    pub fn between(
        self,
        operand: impl Into<Operand>,
        min: impl Into<Operand>,
        max: impl Into<Operand>,
    ) -> Self {
        self.between_impl(operand.into(), false, min.into(), max.into())
    }

    pub fn not_between(
        self,
        operand: impl Into<Operand>,
        min: impl Into<Operand>,
        max: impl Into<Operand>,
    ) -> Self {
        self.between_impl(operand.into(), true, min.into(), max.into())
    }

    fn between_impl(self, operand: Operand, negated: bool, min: Operand, max: Operand) -> Self {
        self.push(move |logic| {
            if min.is_null_value() || max.is_null_value() {
                return Err(EzError::InvalidCondition(format!(
                    "{} BETWEEN with NULL bound",
                    operand.describe()
                )));
            }
            Ok(Condition::Between {
                logic,
                operand,
                negated,
                min,
                max,
            })
        })
    }

    /// Parenthesized sub-chain built by `f`.
    pub fn group(self, f: impl FnOnce(ConditionBuilder) -> ConditionBuilder) -> Self {
        let inner = f(ConditionBuilder::new());
        self.push(move |logic| {
            let conditions = inner.build()?;
            Ok(Condition::Group { logic, conditions })
        })
    }

    /// Append an already built condition, re-attached with the pending connector.
    pub fn condition(self, condition: Condition) -> Self {
        self.push(move |logic| Ok(with_logic(condition, logic)))
    }

    /// Whether any condition was requested, including ones skipped by `when`.
    pub(crate) fn attempted(&self) -> bool {
        self.attempted
    }

    pub fn build(self) -> EzResult<Conditions> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(Conditions(self.conditions)),
        }
    }
}

fn with_logic(mut condition: Condition, new_logic: Logic) -> Condition {
    match &mut condition {
        Condition::Compare { logic, .. }
        | Condition::Null { logic, .. }
        | Condition::In { logic, .. }
        | Condition::Like { logic, .. }
        | Condition::Between { logic, .. }
        | Condition::Group { logic, .. } => *logic = new_logic,
    }
    condition
}

impl Operand {
    fn is_null_value(&self) -> bool {
        matches!(self, Operand::Value(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Table;

    fn user() -> Table {
        Table::entity("User", "t0").unwrap()
    }

    #[test]
    fn test_or_applies_to_next_only() {
        let t = user();
        let conds = ConditionBuilder::new()
            .eq(t.column("a"), 1)
            .or()
            .eq(t.column("b"), 2)
            .eq(t.column("c"), 3)
            .build()
            .unwrap();
        let logics: Vec<Logic> = conds.iter().map(|c| c.logic()).collect();
        assert_eq!(logics, vec![Logic::And, Logic::Or, Logic::And]);
    }

    #[test]
    fn test_eq_null_becomes_is_null() {
        let t = user();
        let conds = ConditionBuilder::new()
            .eq(t.column("a"), Value::Null)
            .ne(t.column("b"), Option::<i64>::None)
            .build()
            .unwrap();
        assert!(matches!(conds.0[0], Condition::Null { negated: false, .. }));
        assert!(matches!(conds.0[1], Condition::Null { negated: true, .. }));
    }

    #[test]
    fn test_gt_null_rejected() {
        let t = user();
        let err = ConditionBuilder::new()
            .gt(t.column("a"), Value::Null)
            .build()
            .unwrap_err();
        assert!(matches!(err, EzError::InvalidCondition(_)));
    }

    #[test]
    fn test_empty_in_rejected() {
        let t = user();
        let err = ConditionBuilder::new()
            .in_values(t.column("id"), Vec::<i64>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, EzError::EmptyInValues(_)));
    }

    #[test]
    fn test_when_false_skips_and_marks_attempted() {
        let t = user();
        let b = ConditionBuilder::new().when(false, |w| w.eq(t.column("a"), 1));
        assert!(b.attempted());
        assert!(b.build().unwrap().is_empty());
    }

    #[test]
    fn test_skipped_or_does_not_leak() {
        let t = user();
        let conds = ConditionBuilder::new()
            .eq(t.column("a"), 1)
            .or()
            .when(false, |w| w.eq(t.column("b"), 2))
            .eq(t.column("c"), 3)
            .build()
            .unwrap();
        assert_eq!(conds.len(), 2);
        assert_eq!(conds.0[1].logic(), Logic::And);
    }
}
