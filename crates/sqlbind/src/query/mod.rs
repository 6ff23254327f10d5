//! SQL statement builders.
//!
//! One consuming builder per statement kind, each finishing with
//! [`build`](SelectQuery::build) to produce a [`BuiltQuery`]: the SQL text
//! plus its named parameters. Builders never talk to an executor; the
//! [`Db`](crate::Db) facade does that.

mod delete;
mod insert;
mod select;
mod update;

pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use select::{Direction, SelectQuery};
pub use update::UpdateQuery;

use crate::value::Params;

/// A finished statement: SQL text and the parameters to bind.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Params,
}

/// Prepend `WHERE` unless the condition already starts with it
/// (case-insensitive, whole keyword).
pub(crate) fn normalize_where(condition: &str) -> String {
    let trimmed = condition.trim();
    let has_keyword = trimmed
        .get(..5)
        .is_some_and(|head| head.eq_ignore_ascii_case("where"))
        && trimmed[5..]
            .chars()
            .next()
            .is_none_or(char::is_whitespace);
    if has_keyword {
        trimmed.to_string()
    } else {
        format!("WHERE {trimmed}")
    }
}

#[cfg(test)]
mod tests;
