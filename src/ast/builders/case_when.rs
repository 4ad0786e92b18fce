//! CASE WHEN expression builders.

use super::conditions::ConditionBuilder;
use crate::ast::{CaseWhen, Conditions, Operand};
use crate::error::{EzError, EzResult};

/// Start a CASE WHEN expression
pub fn case_when() -> CaseBuilder {
    CaseBuilder::default()
}

impl CaseWhen {
    pub fn builder() -> CaseBuilder {
        CaseBuilder::default()
    }
}

/// Builder for CASE expressions
#[derive(Debug, Default)]
pub struct CaseBuilder {
    branches: Vec<(Conditions, Operand)>,
    otherwise: Option<Operand>,
    error: Option<EzError>,
}

impl CaseBuilder {
    /// Add a `WHEN <cond> THEN <then>` branch. The branch condition must
    /// not end up empty.
    pub fn when(
        mut self,
        cond: impl FnOnce(ConditionBuilder) -> ConditionBuilder,
        then: impl Into<Operand>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        match cond(ConditionBuilder::new()).build() {
            Ok(c) if c.is_vacant() => {
                self.error = Some(EzError::InvalidCondition(
                    "CASE branch without condition".to_string(),
                ))
            }
            Ok(c) => self.branches.push((c, then.into())),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Add ELSE clause
    pub fn otherwise(mut self, operand: impl Into<Operand>) -> Self {
        self.otherwise = Some(operand.into());
        self
    }

    pub fn build(self) -> EzResult<CaseWhen> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.branches.is_empty() {
            return Err(EzError::EmptyCaseWhen);
        }
        Ok(CaseWhen {
            branches: self.branches,
            otherwise: self.otherwise,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Table, val};

    #[test]
    fn test_case_when() {
        let t = Table::entity("User", "t0").unwrap();
        let cw = case_when()
            .when(|c| c.gt(t.column("age"), 17), val("adult"))
            .otherwise(val("minor"))
            .build()
            .unwrap();
        assert_eq!(cw.branches.len(), 1);
        assert!(cw.otherwise.is_some());
    }

    #[test]
    fn test_empty_case_rejected() {
        assert!(matches!(case_when().build(), Err(EzError::EmptyCaseWhen)));
    }

    #[test]
    fn test_skipped_branch_condition_rejected() {
        let t = Table::entity("User", "t0").unwrap();
        let err = case_when()
            .when(|c| c.when(false, |c| c.gt(t.column("age"), 17)), val(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, EzError::InvalidCondition(_)));
    }

    #[test]
    fn test_group_of_skipped_conditions_rejected() {
        let t = Table::entity("User", "t0").unwrap();
        let err = case_when()
            .when(|c| c.group(|g| g.when(false, |g| g.gt(t.column("age"), 17))), val(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, EzError::InvalidCondition(_)));
    }

    #[test]
    fn test_vacant_branch_rejected_at_query_build() {
        use crate::ast::{Conditions, Query, SelectItem};

        let t = Table::entity("User", "t0").unwrap();
        let cw = CaseWhen {
            branches: vec![(Conditions::default(), val(1))],
            otherwise: None,
        };
        let err = Query::builder(t)
            .select(SelectItem::operand(cw))
            .build()
            .unwrap_err();
        assert!(matches!(err, EzError::InvalidCondition(_)));
    }
}
