//! Function call builders (COUNT, SUM, custom functions).

use crate::ast::{CaseWhen, Formula, Function, Operand, Table, TableRef, Value};
use crate::error::{EzError, EzResult};

impl Function {
    /// Start a function call; `name` is emitted verbatim.
    pub fn builder(name: impl Into<String>) -> FunctionBuilder {
        FunctionBuilder {
            function: Function {
                name: name.into(),
                table: None,
                args: Vec::new(),
            },
            error: None,
        }
    }
}

/// Builder for [`Function`].
#[derive(Debug)]
pub struct FunctionBuilder {
    function: Function,
    error: Option<EzError>,
}

impl FunctionBuilder {
    /// Default table for [`column`](Self::column) and [`field`](Self::field).
    pub fn table(mut self, table: &Table) -> Self {
        self.function.table = Some(table.reference());
        self
    }

    /// Apply `f` only when `sure` holds.
    pub fn when(self, sure: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if sure { f(self) } else { self }
    }

    pub fn arg(mut self, operand: impl Into<Operand>) -> Self {
        self.function.args.push(operand.into());
        self
    }

    fn try_arg(mut self, operand: EzResult<Operand>) -> Self {
        match operand {
            Ok(op) => self.function.args.push(op),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    pub fn column_arg(self, table: &Table, column: &str) -> Self {
        self.arg(table.column(column))
    }

    pub fn distinct_column_arg(self, table: &Table, column: &str) -> Self {
        self.arg(table.distinct_column(column))
    }

    pub fn field_arg(self, table: &Table, field: &str) -> Self {
        self.try_arg(table.field(field))
    }

    pub fn distinct_field_arg(self, table: &Table, field: &str) -> Self {
        self.try_arg(table.distinct_field(field))
    }

    /// Column of the default table.
    pub fn column(self, column: &str) -> Self {
        let op = self.default_table().map(|table| Operand::Column {
            table,
            column: column.to_string(),
            distinct: false,
        });
        self.try_arg(op)
    }

    /// Field of the default table, which must be an entity table.
    pub fn field(self, field: &str) -> Self {
        let op = self.default_table().and_then(|table| {
            if table.entity.is_none() {
                return Err(EzError::FieldOnNonEntity {
                    alias: table.alias,
                    field: field.to_string(),
                });
            }
            Ok(Operand::Field {
                table,
                field: field.to_string(),
                distinct: false,
            })
        });
        self.try_arg(op)
    }

    fn default_table(&self) -> EzResult<TableRef> {
        self.function
            .table
            .clone()
            .ok_or(EzError::EmptyName("function table"))
    }

    pub fn fun_arg(self, function: Function) -> Self {
        self.arg(function)
    }

    pub fn formula_arg(self, formula: Formula) -> Self {
        self.arg(formula)
    }

    pub fn value_arg(self, value: impl Into<Value>) -> Self {
        self.arg(Operand::Value(value.into()))
    }

    pub fn keywords_arg(self, sql: impl Into<String>) -> Self {
        self.arg(Operand::Keywords(sql.into()))
    }

    pub fn case_when_arg(self, case_when: CaseWhen) -> Self {
        self.arg(case_when)
    }

    pub fn build(self) -> EzResult<Function> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.function.name.trim().is_empty() {
            return Err(EzError::EmptyName("function name"));
        }
        Ok(self.function)
    }
}

fn single(name: &str, arg: Operand) -> Function {
    Function {
        name: name.to_string(),
        table: None,
        args: vec![arg],
    }
}

/// `COUNT(*)`
pub fn count_all() -> Function {
    single("COUNT", Operand::Keywords("*".to_string()))
}

/// `COUNT(<operand>)`
pub fn count(operand: impl Into<Operand>) -> Function {
    single("COUNT", operand.into())
}

/// `COUNT(DISTINCT <alias>.<column>)`
pub fn count_distinct(table: &Table, column: &str) -> Function {
    single("COUNT", table.distinct_column(column))
}

pub fn sum(operand: impl Into<Operand>) -> Function {
    single("SUM", operand.into())
}

pub fn avg(operand: impl Into<Operand>) -> Function {
    single("AVG", operand.into())
}

pub fn min(operand: impl Into<Operand>) -> Function {
    single("MIN", operand.into())
}

pub fn max(operand: impl Into<Operand>) -> Function {
    single("MAX", operand.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_rejected() {
        let err = Function::builder("  ").build().unwrap_err();
        assert!(matches!(err, EzError::EmptyName("function name")));
    }

    #[test]
    fn test_field_arg_on_db_table_rejected() {
        let t = Table::db("user", "u").unwrap();
        let err = Function::builder("MAX").field_arg(&t, "age").build().unwrap_err();
        assert!(matches!(err, EzError::FieldOnNonEntity { .. }));

        let err = Function::builder("MAX").table(&t).field("age").build().unwrap_err();
        assert!(matches!(err, EzError::FieldOnNonEntity { .. }));
    }

    #[test]
    fn test_default_table_columns() {
        let t = Table::entity("User", "t0").unwrap();
        let f = Function::builder("CONCAT")
            .table(&t)
            .column("first_name")
            .keywords_arg("' '")
            .field("lastName")
            .when(false, |b| b.value_arg(1))
            .build()
            .unwrap();
        assert_eq!(f.args.len(), 3);
        assert!(matches!(f.args[2], Operand::Field { .. }));
    }

    #[test]
    fn test_column_without_default_table() {
        let err = Function::builder("MAX").column("age").build().unwrap_err();
        assert!(matches!(err, EzError::EmptyName("function table")));
    }
}
