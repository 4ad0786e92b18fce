//! Arithmetic formula builder.

use crate::ast::{Formula, FormulaOp, Operand};

impl Formula {
    /// `Formula::builder(t.column("price")).mul(t.column("qty")).build()`
    pub fn builder(first: impl Into<Operand>) -> FormulaBuilder {
        FormulaBuilder {
            formula: Formula {
                first: first.into(),
                rest: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormulaBuilder {
    formula: Formula,
}

impl FormulaBuilder {
    pub fn push(mut self, op: FormulaOp, operand: impl Into<Operand>) -> Self {
        self.formula.rest.push((op, operand.into()));
        self
    }

    pub fn add(self, operand: impl Into<Operand>) -> Self {
        self.push(FormulaOp::Add, operand)
    }

    pub fn sub(self, operand: impl Into<Operand>) -> Self {
        self.push(FormulaOp::Sub, operand)
    }

    pub fn mul(self, operand: impl Into<Operand>) -> Self {
        self.push(FormulaOp::Mul, operand)
    }

    pub fn div(self, operand: impl Into<Operand>) -> Self {
        self.push(FormulaOp::Div, operand)
    }

    pub fn build(self) -> Formula {
        self.formula
    }
}

impl From<FormulaBuilder> for Operand {
    fn from(builder: FormulaBuilder) -> Self {
        builder.build().into()
    }
}
