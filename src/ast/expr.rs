use serde::{Deserialize, Serialize};

use crate::ast::query::Scope;
use crate::ast::table::is_identifier;
use crate::ast::{Conditions, TableRef, Value};
use crate::error::{EzError, EzResult};

/// Anything that renders to a scalar SQL fragment.
///
/// Function arguments, condition sides, select items, group-by and
/// order-by entries are all operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    /// Raw column of a table: `t0.name`
    Column {
        table: TableRef,
        column: String,
        #[serde(default)]
        distinct: bool,
    },
    /// Entity field, mapped to its column through entity metadata
    Field {
        table: TableRef,
        field: String,
        #[serde(default)]
        distinct: bool,
    },
    /// Nested function call
    Func(Box<Function>),
    /// Arithmetic formula
    Formula(Box<Formula>),
    /// Literal, always bound through a placeholder
    Value(Value),
    /// Raw SQL fragment emitted verbatim
    Keywords(String),
    /// CASE WHEN expression
    CaseWhen(Box<CaseWhen>),
}

impl Operand {
    pub fn value(value: impl Into<Value>) -> Self {
        Operand::Value(value.into())
    }

    pub fn keywords(sql: impl Into<String>) -> Self {
        Operand::Keywords(sql.into())
    }

    /// Short human-readable label used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Operand::Column { table, column, .. } => format!("{}.{}", table.alias, column),
            Operand::Field { table, field, .. } => format!("{}.{}", table.alias, field),
            Operand::Func(f) => format!("{}(..)", f.name),
            Operand::Formula(_) => "formula".to_string(),
            Operand::Value(v) => v.to_string(),
            Operand::Keywords(k) => k.clone(),
            Operand::CaseWhen(_) => "CASE".to_string(),
        }
    }

    fn is_distinct(&self) -> bool {
        matches!(
            self,
            Operand::Column { distinct: true, .. } | Operand::Field { distinct: true, .. }
        )
    }

    pub(crate) fn check(&self, scope: &Scope) -> EzResult<()> {
        if self.is_distinct() {
            return Err(EzError::MisplacedDistinct(self.describe()));
        }
        self.check_arg(scope)
    }

    /// Like `check`, but a distinct column or field is allowed: it renders
    /// as `DISTINCT <col>` inside the enclosing call.
    fn check_arg(&self, scope: &Scope) -> EzResult<()> {
        match self {
            Operand::Column { table, column, .. } => {
                if column.is_empty() {
                    return Err(EzError::EmptyName("column"));
                }
                if !is_identifier(column) {
                    return Err(EzError::InvalidIdentifier(column.clone()));
                }
                scope.resolve(table).map(|_| ())
            }
            Operand::Field { table, field, .. } => {
                if field.is_empty() {
                    return Err(EzError::EmptyName("field"));
                }
                if !scope.resolve(table)? || table.entity.is_none() {
                    return Err(EzError::FieldOnNonEntity {
                        alias: table.alias.clone(),
                        field: field.clone(),
                    });
                }
                Ok(())
            }
            Operand::Func(f) => f.check(scope),
            Operand::Formula(f) => f.check(scope),
            Operand::CaseWhen(c) => c.check(scope),
            Operand::Value(_) => Ok(()),
            Operand::Keywords(k) if k.trim().is_empty() => Err(EzError::EmptyName("keywords")),
            Operand::Keywords(_) => Ok(()),
        }
    }
}

/// Literal operand: `val("Ann")`
pub fn val(value: impl Into<Value>) -> Operand {
    Operand::value(value)
}

/// Raw SQL operand: `keywords("CURRENT_TIMESTAMP")`
pub fn keywords(sql: impl Into<String>) -> Operand {
    Operand::keywords(sql)
}

macro_rules! operand_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Value(v.into())
                }
            }
        )*
    };
}

operand_from_value!(
    Value,
    bool,
    i32,
    i64,
    u32,
    f64,
    &str,
    String,
    uuid::Uuid,
    chrono::NaiveDate,
    chrono::NaiveDateTime
);

/// `None` becomes a NULL value.
impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Value(v.map_or(Value::Null, Into::into))
    }
}

impl From<Function> for Operand {
    fn from(f: Function) -> Self {
        Operand::Func(Box::new(f))
    }
}

impl From<Formula> for Operand {
    fn from(f: Formula) -> Self {
        Operand::Formula(Box::new(f))
    }
}

impl From<CaseWhen> for Operand {
    fn from(c: CaseWhen) -> Self {
        Operand::CaseWhen(Box::new(c))
    }
}

/// A SQL function call: `NAME(arg, ...)`.
///
/// Arguments are operands, so each one is exactly one of column, field,
/// function, formula, value, keywords or case-when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    /// Default table for column/field arguments added by name only
    #[serde(default)]
    pub table: Option<TableRef>,
    #[serde(default)]
    pub args: Vec<Operand>,
}

impl Function {
    pub(crate) fn check(&self, scope: &Scope) -> EzResult<()> {
        if self.name.trim().is_empty() {
            return Err(EzError::EmptyName("function name"));
        }
        self.args.iter().try_for_each(|a| a.check_arg(scope))
    }
}

/// Arithmetic operator inside a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormulaOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl FormulaOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            FormulaOp::Add => "+",
            FormulaOp::Sub => "-",
            FormulaOp::Mul => "*",
            FormulaOp::Div => "/",
        }
    }
}

/// `(first op operand op operand ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub first: Operand,
    #[serde(default)]
    pub rest: Vec<(FormulaOp, Operand)>,
}

impl Formula {
    pub(crate) fn check(&self, scope: &Scope) -> EzResult<()> {
        self.first.check(scope)?;
        self.rest.iter().try_for_each(|(_, o)| o.check(scope))
    }
}

/// Searched CASE: `CASE WHEN <cond> THEN <operand> ... [ELSE <operand>] END`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseWhen {
    pub branches: Vec<(Conditions, Operand)>,
    #[serde(default)]
    pub otherwise: Option<Operand>,
}

impl CaseWhen {
    pub(crate) fn check(&self, scope: &Scope) -> EzResult<()> {
        if self.branches.is_empty() {
            return Err(EzError::EmptyCaseWhen);
        }
        for (cond, then) in &self.branches {
            if cond.is_vacant() {
                return Err(EzError::InvalidCondition(
                    "CASE branch without condition".to_string(),
                ));
            }
            cond.check(scope)?;
            then.check(scope)?;
        }
        match &self.otherwise {
            Some(o) => o.check(scope),
            None => Ok(()),
        }
    }
}
