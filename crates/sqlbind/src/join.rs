//! Join clauses appended between FROM and WHERE.

use crate::error::DbResult;
use crate::value::check_not_blank;
use std::fmt;

/// The join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Full => "FULL",
        }
    }
}

/// One join: a target table and a raw ON clause, rendered verbatim as
/// `<KIND> JOIN <table> ON <on_clause>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    kind: JoinKind,
    table: String,
    on_clause: String,
}

impl Join {
    pub fn new(
        kind: JoinKind,
        table: impl Into<String>,
        on_clause: impl Into<String>,
    ) -> DbResult<Self> {
        let table = table.into();
        let on_clause = on_clause.into();
        check_not_blank("join table", &table)?;
        check_not_blank("join ON clause", &on_clause)?;
        Ok(Self { kind, table, on_clause })
    }

    pub fn inner(table: impl Into<String>, on_clause: impl Into<String>) -> DbResult<Self> {
        Self::new(JoinKind::Inner, table, on_clause)
    }

    pub fn left(table: impl Into<String>, on_clause: impl Into<String>) -> DbResult<Self> {
        Self::new(JoinKind::Left, table, on_clause)
    }

    pub fn right(table: impl Into<String>, on_clause: impl Into<String>) -> DbResult<Self> {
        Self::new(JoinKind::Right, table, on_clause)
    }

    pub fn full(table: impl Into<String>, on_clause: impl Into<String>) -> DbResult<Self> {
        Self::new(JoinKind::Full, table, on_clause)
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} JOIN {} ON {}", self.kind.as_str(), self.table, self.on_clause)
    }
}
