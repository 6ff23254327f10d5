//! SELECT statement builder.

use super::BuiltQuery;
use crate::criteria::Criteria;
use crate::error::{DbError, DbResult};
use crate::join::Join;
use crate::value::check_not_blank;
use serde::{Deserialize, Serialize};

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// SELECT builder: table, column list, criteria, joins, grouping, ordering
/// and paging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    table: String,
    /// None selects `*`; an explicit empty list is rejected at build time.
    columns: Option<Vec<String>>,
    criteria: Criteria,
    joins: Vec<Join>,
    group_by: Vec<String>,
    order_by: Vec<(String, Direction)>,
    limit: Option<i64>,
    offset: Option<i64>,
    qualify: Option<String>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Set an explicit column list. Without this the query selects `*`.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the filter tree compiled into the WHERE clause.
    pub fn criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Append a join, rendered verbatim between FROM and WHERE in call
    /// order.
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Append a GROUP BY column.
    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    /// Append an ORDER BY entry. Call order is preserved.
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push((column.into(), direction));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Qualify every criteria column reference with the given table or
    /// alias.
    pub fn qualify(mut self, table: impl Into<String>) -> Self {
        self.qualify = Some(table.into());
        self
    }

    /// Render the statement and its parameters.
    pub fn build(&self) -> DbResult<BuiltQuery> {
        check_not_blank("table", &self.table)?;
        let columns = match &self.columns {
            None => "*".to_string(),
            Some(list) if list.is_empty() => {
                return Err(DbError::invalid_input("column list must not be empty"));
            }
            Some(list) => list.join(", "),
        };

        let (condition, params) = self.criteria.compile(self.qualify.as_deref())?;

        let mut sql = format!("SELECT {columns} FROM {}", self.table);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_string());
        }
        if !condition.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
        }
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }
        if !self.order_by.is_empty() {
            let entries: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, direction)| format!("{column} {}", direction.as_str()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&entries.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        Ok(BuiltQuery { sql, params })
    }
}
