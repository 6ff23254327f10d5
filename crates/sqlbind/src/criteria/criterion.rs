//! Atomic filter conditions.
//!
//! A [`Criterion`] renders itself as a SQL boolean fragment with `:name`
//! placeholders and produces its own named parameters. Parameter base names
//! are derived from the column (dots replaced with underscores) plus a role
//! suffix where a variant binds more than one value.

use crate::error::{DbError, DbResult};
use crate::value::{Params, Value};

/// Wrapping mode for LIKE patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeMatch {
    /// Append a trailing `%`
    StartsWith,
    /// Prepend a leading `%`
    EndsWith,
    /// Wrap both sides with `%`
    Contains,
}

/// One atomic condition convertible to a SQL fragment plus parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    /// Owning table or alias; qualifies the rendered column when set.
    pub(crate) table: Option<String>,
    pub(crate) kind: CriterionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CriterionKind {
    /// `column OP :param`
    Compare {
        column: String,
        op: &'static str,
        value: Value,
    },
    /// `(column BETWEEN :param_lower_limit AND :param_upper_limit)`
    Between {
        column: String,
        lower: Value,
        upper: Value,
    },
    /// `column [NOT] LIKE :param`, value wrapped per [`LikeMatch`]
    Like {
        column: String,
        value: Value,
        mode: LikeMatch,
        negated: bool,
    },
    /// `column [NOT] IN (:param_1, ..., :param_n)`
    InList {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },
    /// `column IS [NOT] NULL`
    NullCheck { column: String, negated: bool },
    /// Raw SQL fragment with an explicit parameter map, passed through.
    Expression { sql: String, parameters: Params },
}

impl Criterion {
    fn compare(column: impl Into<String>, op: &'static str, value: impl Into<Value>) -> Self {
        Criterion {
            table: None,
            kind: CriterionKind::Compare {
                column: column.into(),
                op,
                value: value.into(),
            },
        }
    }

    /// `column = value`
    pub fn equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, "=", value)
    }

    /// `column != value`
    pub fn not_equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, "!=", value)
    }

    /// `column > value`
    pub fn greater_than(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, ">", value)
    }

    /// `column < value`
    pub fn less_than(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, "<", value)
    }

    /// `column >= value`
    pub fn greater_or_equal(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, ">=", value)
    }

    /// `column <= value`
    pub fn less_or_equal(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, "<=", value)
    }

    /// `(column BETWEEN lower AND upper)`
    pub fn between(
        column: impl Into<String>,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
    ) -> Self {
        Criterion {
            table: None,
            kind: CriterionKind::Between {
                column: column.into(),
                lower: lower.into(),
                upper: upper.into(),
            },
        }
    }

    /// `column LIKE pattern`, with the pattern wrapped in `%` per `mode`.
    pub fn like(column: impl Into<String>, value: impl Into<Value>, mode: LikeMatch) -> Self {
        Criterion {
            table: None,
            kind: CriterionKind::Like {
                column: column.into(),
                value: value.into(),
                mode,
                negated: false,
            },
        }
    }

    /// `column NOT LIKE pattern`
    pub fn not_like(column: impl Into<String>, value: impl Into<Value>, mode: LikeMatch) -> Self {
        Criterion {
            table: None,
            kind: CriterionKind::Like {
                column: column.into(),
                value: value.into(),
                mode,
                negated: true,
            },
        }
    }

    /// `column IN (values...)`. An empty value list is rejected.
    pub fn is_in(
        column: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> DbResult<Self> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(DbError::invalid_input("IN criterion requires at least one value"));
        }
        Ok(Criterion {
            table: None,
            kind: CriterionKind::InList {
                column: column.into(),
                values,
                negated: false,
            },
        })
    }

    /// `column NOT IN (values...)`. An empty value list is rejected.
    pub fn not_in(
        column: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> DbResult<Self> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(DbError::invalid_input(
                "NOT IN criterion requires at least one value",
            ));
        }
        Ok(Criterion {
            table: None,
            kind: CriterionKind::InList {
                column: column.into(),
                values,
                negated: true,
            },
        })
    }

    /// `column IS NULL`
    pub fn is_null(column: impl Into<String>) -> Self {
        Criterion {
            table: None,
            kind: CriterionKind::NullCheck {
                column: column.into(),
                negated: false,
            },
        }
    }

    /// `column IS NOT NULL`
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Criterion {
            table: None,
            kind: CriterionKind::NullCheck {
                column: column.into(),
                negated: true,
            },
        }
    }

    /// A raw SQL fragment with an explicit parameter map.
    ///
    /// The fragment is passed through verbatim; table qualification does
    /// not apply. Be careful with SQL injection when interpolating into it.
    pub fn expression(sql: impl Into<String>, parameters: Params) -> Self {
        Criterion {
            table: None,
            kind: CriterionKind::Expression {
                sql: sql.into(),
                parameters,
            },
        }
    }

    /// Set the owning table or alias; the rendered column reference becomes
    /// `table.column`.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub(crate) fn column(&self) -> Option<&str> {
        match &self.kind {
            CriterionKind::Compare { column, .. }
            | CriterionKind::Between { column, .. }
            | CriterionKind::Like { column, .. }
            | CriterionKind::InList { column, .. }
            | CriterionKind::NullCheck { column, .. } => Some(column),
            CriterionKind::Expression { .. } => None,
        }
    }

    /// Column reference as rendered: qualified when a table is in effect.
    /// A `qualify` passed down from compilation wins over the criterion's
    /// own table.
    fn column_ref(&self, column: &str, qualify: Option<&str>) -> String {
        match qualify.or(self.table.as_deref()) {
            Some(table) => format!("{table}.{column}"),
            None => column.to_string(),
        }
    }

    /// Parameter base name: the column with dots replaced by underscores.
    fn parameter_name(column: &str) -> String {
        column.replace('.', "_")
    }

    /// Render the SQL fragment for this criterion.
    pub fn render(&self, qualify: Option<&str>) -> String {
        match &self.kind {
            CriterionKind::Compare { column, op, .. } => {
                format!(
                    "{} {} :{}",
                    self.column_ref(column, qualify),
                    op,
                    Self::parameter_name(column)
                )
            }
            CriterionKind::Between { column, .. } => {
                let name = Self::parameter_name(column);
                format!(
                    "({} BETWEEN :{}_lower_limit AND :{}_upper_limit)",
                    self.column_ref(column, qualify),
                    name,
                    name
                )
            }
            CriterionKind::Like { column, negated, .. } => {
                format!(
                    "{} {} :{}",
                    self.column_ref(column, qualify),
                    if *negated { "NOT LIKE" } else { "LIKE" },
                    Self::parameter_name(column)
                )
            }
            CriterionKind::InList {
                column,
                values,
                negated,
            } => {
                let name = Self::parameter_name(column);
                let placeholders: Vec<String> = (1..=values.len())
                    .map(|index| format!(":{name}_{index}"))
                    .collect();
                format!(
                    "{} {} ({})",
                    self.column_ref(column, qualify),
                    if *negated { "NOT IN" } else { "IN" },
                    placeholders.join(", ")
                )
            }
            CriterionKind::NullCheck { column, negated } => {
                format!(
                    "{} {}",
                    self.column_ref(column, qualify),
                    if *negated { "IS NOT NULL" } else { "IS NULL" }
                )
            }
            CriterionKind::Expression { sql, .. } => sql.clone(),
        }
    }

    /// Produce the named parameters for this criterion, in placeholder
    /// order.
    pub fn parameters(&self) -> Params {
        let mut params = Params::new();
        match &self.kind {
            CriterionKind::Compare { column, value, .. } => {
                params.insert(Self::parameter_name(column), value.clone());
            }
            CriterionKind::Between {
                column,
                lower,
                upper,
            } => {
                let name = Self::parameter_name(column);
                params.insert(format!("{name}_lower_limit"), lower.clone());
                params.insert(format!("{name}_upper_limit"), upper.clone());
            }
            CriterionKind::Like {
                column,
                value,
                mode,
                ..
            } => {
                params.insert(Self::parameter_name(column), wrap_pattern(value, *mode));
            }
            CriterionKind::InList { column, values, .. } => {
                let name = Self::parameter_name(column);
                for (index, value) in values.iter().enumerate() {
                    params.insert(format!("{}_{}", name, index + 1), value.clone());
                }
            }
            CriterionKind::NullCheck { .. } => {}
            CriterionKind::Expression { parameters, .. } => {
                params = parameters.clone();
            }
        }
        params
    }
}

/// Wrap a LIKE value in `%` wildcards according to the match mode.
fn wrap_pattern(value: &Value, mode: LikeMatch) -> Value {
    let text = match value {
        Value::Text(s) => s.clone(),
        other => other.to_string(),
    };
    let wrapped = match mode {
        LikeMatch::Contains => format!("%{text}%"),
        LikeMatch::StartsWith => format!("{text}%"),
        LikeMatch::EndsWith => format!("%{text}"),
    };
    Value::Text(wrapped)
}
