//! UPDATE statement builder.

use super::{normalize_where, BuiltQuery};
use crate::error::{DbError, DbResult};
use crate::value::{check_not_blank, Params, Value};

/// UPDATE builder: column assignments plus a raw WHERE condition with its
/// own bound parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateQuery {
    table: String,
    data: Params,
    condition: Option<String>,
    bound: Params,
}

impl UpdateQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Set one column assignment.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(column.into(), value.into());
        self
    }

    /// Merge a whole column/value map.
    pub fn set_all(mut self, data: Params) -> Self {
        self.data.extend(data);
        self
    }

    /// Set the raw WHERE condition. `WHERE` is prepended when missing.
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Bind a parameter used by the condition.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bound.insert(name.into(), value.into());
        self
    }

    /// Merge condition parameters.
    pub fn bind_all(mut self, params: Params) -> Self {
        self.bound.extend(params);
        self
    }

    /// Render the statement and its parameters. Data keys win over bound
    /// parameters when names collide.
    pub fn build(&self) -> DbResult<BuiltQuery> {
        check_not_blank("table", &self.table)?;
        if self.data.is_empty() {
            return Err(DbError::invalid_input("update data must not be empty"));
        }
        let condition = self
            .condition
            .as_deref()
            .ok_or_else(|| DbError::invalid_input("update requires a condition"))?;
        check_not_blank("condition", condition)?;

        let assignments: Vec<String> = self
            .data
            .keys()
            .map(|column| format!("{column} = :{column}"))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} {}",
            self.table,
            assignments.join(", "),
            normalize_where(condition)
        );

        let mut params = self.bound.clone();
        for (column, value) in &self.data {
            params.insert(column.clone(), value.clone());
        }

        Ok(BuiltQuery { sql, params })
    }
}
