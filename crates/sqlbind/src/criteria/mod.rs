//! Criteria trees: ordered filter structures compiled to boolean SQL.
//!
//! A [`Criteria`] is an ordered sequence of nodes: column/value sugar,
//! explicit [`Criterion`]s, parenthesized sub-trees, and AND/OR/XOR/NOT
//! tokens. [`Criteria::compile`] walks the tree and produces a single
//! condition string plus a flat, collision-free named-parameter map.
//!
//! # Example
//!
//! ```ignore
//! use sqlbind::{Criteria, Criterion, LikeMatch};
//!
//! let criteria = Criteria::new()
//!     .field("status", "active")
//!     .criterion(Criterion::like("name", "bob", LikeMatch::Contains))
//!     .or()
//!     .group(
//!         Criteria::new()
//!             .criterion(Criterion::greater_than("age", 18))
//!             .field("verified", true),
//!     );
//! let (condition, parameters) = criteria.compile(None)?;
//! ```

mod compile;
mod criterion;

pub(crate) use compile::replace_placeholder;
pub use criterion::{Criterion, LikeMatch};

use crate::error::DbResult;
use crate::value::{Params, Value};

/// Logical token joining sibling elements of a criteria tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
    Xor,
}

impl Connective {
    pub fn as_str(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
            Connective::Xor => "XOR",
        }
    }
}

/// One element of a criteria tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Sugar for an Equals criterion, or IS NULL when the value is null.
    Field(String, Value),
    /// An explicit criterion.
    Criterion(Criterion),
    /// A nested tree, rendered inside parentheses.
    Group(Criteria),
    /// Connective inserted between the previous and next rendered element.
    Connective(Connective),
    /// Prefixes the next rendered element with `NOT`.
    Not,
}

/// Ordered structure of criteria, sub-trees and connectives defining a full
/// filter expression. The default connective between consecutive elements
/// is `AND`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    nodes: Vec<Node>,
}

impl Criteria {
    /// Create an empty tree. An empty tree compiles to an empty condition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the tree contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Add `column = value` sugar (`column IS NULL` when the value is null).
    pub fn field(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.nodes.push(Node::Field(column.into(), value.into()));
        self
    }

    /// Add an explicit criterion.
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.nodes.push(Node::Criterion(criterion));
        self
    }

    /// Add a parenthesized sub-tree.
    pub fn group(mut self, criteria: Criteria) -> Self {
        self.nodes.push(Node::Group(criteria));
        self
    }

    /// Join the previous and next element with `AND` (the default).
    pub fn and(mut self) -> Self {
        self.nodes.push(Node::Connective(Connective::And));
        self
    }

    /// Join the previous and next element with `OR`.
    pub fn or(mut self) -> Self {
        self.nodes.push(Node::Connective(Connective::Or));
        self
    }

    /// Join the previous and next element with `XOR`.
    pub fn xor(mut self) -> Self {
        self.nodes.push(Node::Connective(Connective::Xor));
        self
    }

    /// Prefix the next element with `NOT`.
    pub fn not(mut self) -> Self {
        self.nodes.push(Node::Not);
        self
    }

    /// Append a node directly.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Compile the tree to `(condition, parameters)`.
    ///
    /// `qualify` prefixes every criterion's column reference with the given
    /// table or alias. An empty tree compiles to `("", {})`; the caller
    /// omits the WHERE clause in that case. The output never carries a
    /// leading or trailing connective, and parameter names are unique
    /// within one compilation (see [`compile`](self)).
    pub fn compile(&self, qualify: Option<&str>) -> DbResult<(String, Params)> {
        compile::compile(self, qualify)
    }
}

impl From<Criterion> for Criteria {
    fn from(criterion: Criterion) -> Self {
        Criteria::new().criterion(criterion)
    }
}

#[cfg(test)]
mod tests;
