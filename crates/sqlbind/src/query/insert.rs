//! INSERT statement builder.

use super::BuiltQuery;
use crate::error::{DbError, DbResult};
use crate::value::{check_not_blank, Params, Value};

/// Suffix appended to parameter names of ON DUPLICATE KEY UPDATE
/// assignments so they never collide with the insert parameters.
const DUPLICATE_KEY_SUFFIX: &str = "_duplicate_key_update";

/// INSERT builder. Every data key doubles as the column name and the
/// parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertQuery {
    table: String,
    data: Params,
    duplicate_key_update: Params,
}

impl InsertQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Set one column value.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(column.into(), value.into());
        self
    }

    /// Merge a whole column/value map.
    pub fn set_all(mut self, data: Params) -> Self {
        self.data.extend(data);
        self
    }

    /// Add an `ON DUPLICATE KEY UPDATE` assignment.
    pub fn on_duplicate_key_update(
        mut self,
        column: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.duplicate_key_update.insert(column.into(), value.into());
        self
    }

    /// Merge a whole map of `ON DUPLICATE KEY UPDATE` assignments.
    pub fn on_duplicate_key_update_all(mut self, data: Params) -> Self {
        self.duplicate_key_update.extend(data);
        self
    }

    /// Render the statement and its parameters.
    pub fn build(&self) -> DbResult<BuiltQuery> {
        check_not_blank("table", &self.table)?;
        if self.data.is_empty() {
            return Err(DbError::invalid_input("insert data must not be empty"));
        }

        let columns: Vec<&str> = self.data.keys().map(String::as_str).collect();
        let placeholders: Vec<String> = columns.iter().map(|c| format!(":{c}")).collect();
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        );
        let mut params = self.data.clone();

        if !self.duplicate_key_update.is_empty() {
            let assignments: Vec<String> = self
                .duplicate_key_update
                .keys()
                .map(|column| format!("{column} = :{column}{DUPLICATE_KEY_SUFFIX}"))
                .collect();
            sql.push_str(" ON DUPLICATE KEY UPDATE ");
            sql.push_str(&assignments.join(", "));
            for (column, value) in &self.duplicate_key_update {
                params.insert(format!("{column}{DUPLICATE_KEY_SUFFIX}"), value.clone());
            }
        }

        Ok(BuiltQuery { sql, params })
    }
}
