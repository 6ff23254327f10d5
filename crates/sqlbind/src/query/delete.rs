//! DELETE statement builder.

use super::{normalize_where, BuiltQuery};
use crate::error::{DbError, DbResult};
use crate::value::{check_not_blank, Params, Value};

/// DELETE builder: a table plus a raw WHERE condition and its parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteQuery {
    table: String,
    condition: Option<String>,
    bound: Params,
}

impl DeleteQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
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

    /// Render the statement and its parameters.
    pub fn build(&self) -> DbResult<BuiltQuery> {
        check_not_blank("table", &self.table)?;
        let condition = self
            .condition
            .as_deref()
            .ok_or_else(|| DbError::invalid_input("delete requires a condition"))?;
        check_not_blank("condition", condition)?;

        let sql = format!(
            "DELETE FROM {} {}",
            self.table,
            normalize_where(condition)
        );

        Ok(BuiltQuery {
            sql,
            params: self.bound.clone(),
        })
    }
}
