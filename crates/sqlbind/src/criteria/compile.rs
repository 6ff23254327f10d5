//! The criteria-to-SQL compiler.
//!
//! Walks a criteria tree in order and accumulates a boolean condition
//! string plus a flat parameter map. A per-compilation registry keeps
//! parameter names unique: a repeated base name is renamed `base_<n>` and
//! the `:name` token inside the already-rendered fragment is rewritten in
//! place, anchored on a word boundary so `:status` never clobbers
//! `:status_2`.

use super::criterion::{Criterion, CriterionKind};
use super::{Criteria, Node};
use crate::error::{DbError, DbResult};
use crate::value::{Params, Value};
use std::collections::HashMap;

pub(crate) fn compile(criteria: &Criteria, qualify: Option<&str>) -> DbResult<(String, Params)> {
    let mut parameters = Params::new();
    let mut register: HashMap<String, usize> = HashMap::new();
    let condition = process(criteria.nodes(), &mut parameters, &mut register, qualify)?;
    Ok((condition, parameters))
}

fn process(
    nodes: &[Node],
    parameters: &mut Params,
    register: &mut HashMap<String, usize>,
    qualify: Option<&str>,
) -> DbResult<String> {
    let mut output = String::new();
    for node in nodes {
        match node {
            Node::Group(inner) => {
                if inner.is_empty() {
                    continue;
                }
                let sub = process(inner.nodes(), parameters, register, qualify)?;
                output.push('(');
                output.push_str(&sub);
                output.push_str(") AND ");
            }
            Node::Connective(connective) => {
                // Consecutive connective tokens collapse to the last one.
                // Only the tail is trimmed here; a leading token is still a
                // prefix of the accumulator and falls to the final trim.
                let trimmed = trim_trailing_connectives(&output);
                output.truncate(trimmed.len());
                if !output.is_empty() {
                    output.push(' ');
                }
                output.push_str(connective.as_str());
                output.push(' ');
            }
            Node::Not => {
                output.push_str("NOT ");
            }
            Node::Field(column, value) => {
                let criterion = if value.is_null() {
                    Criterion::is_null(column.clone())
                } else {
                    Criterion::equals(column.clone(), value.clone())
                };
                append_criterion(&criterion, &mut output, parameters, register, qualify)?;
            }
            Node::Criterion(criterion) => {
                // Equals with a null value is redirected to IS NULL, the
                // same rule the field sugar applies.
                if let CriterionKind::Compare {
                    op: "=",
                    value: Value::Null,
                    ..
                } = &criterion.kind
                {
                    let mut redirected = Criterion::is_null(
                        criterion.column().unwrap_or_default().to_string(),
                    );
                    redirected.table = criterion.table.clone();
                    append_criterion(&redirected, &mut output, parameters, register, qualify)?;
                } else {
                    append_criterion(criterion, &mut output, parameters, register, qualify)?;
                }
            }
        }
    }
    Ok(trim_connectives(&output).to_string())
}

fn append_criterion(
    criterion: &Criterion,
    output: &mut String,
    parameters: &mut Params,
    register: &mut HashMap<String, usize>,
    qualify: Option<&str>,
) -> DbResult<()> {
    let mut fragment = criterion.render(qualify);
    for (name, value) in criterion.parameters() {
        let count = register.entry(name.clone()).or_insert(0);
        *count += 1;
        let mut final_name = if *count > 1 {
            format!("{}_{}", name, *count - 1)
        } else {
            name.clone()
        };
        // A renamed `status_1` can still collide with a name another
        // criterion emitted directly, such as an IN list's `status_1`.
        // Keep bumping until the name is free.
        while parameters.contains_key(&final_name) {
            *count += 1;
            final_name = format!("{}_{}", name, *count - 1);
        }
        if final_name != name {
            fragment = rewrite_parameter(&fragment, &name, &final_name)?;
        }
        parameters.insert(final_name, value);
    }
    output.push_str(&fragment);
    output.push_str(" AND ");
    Ok(())
}

/// Rename every word-boundary-anchored `:old` token in `fragment` to
/// `:new`. Finding no rewritable occurrence means the rendered fragment
/// and its parameter list disagree, which is a compiler bug.
fn rewrite_parameter(fragment: &str, old: &str, new: &str) -> DbResult<String> {
    let (rewritten, replaced) = replace_placeholder(fragment, old, &format!(":{new}"));
    if replaced == 0 {
        return Err(DbError::logic(format!(
            "no rewritable occurrence of parameter ':{old}' in fragment '{fragment}'"
        )));
    }
    Ok(rewritten)
}

/// Replace every `:name` token in `sql` with `replacement`, anchored on the
/// character immediately following the token: comma, whitespace,
/// parenthesis, or end of string. Returns the rewritten text and the number
/// of replacements.
pub(crate) fn replace_placeholder(sql: &str, name: &str, replacement: &str) -> (String, usize) {
    let token = format!(":{name}");
    let mut out = String::with_capacity(sql.len());
    let mut rest = sql;
    let mut replaced = 0;
    while let Some(pos) = rest.find(&token) {
        let after = &rest[pos + token.len()..];
        let at_boundary = match after.chars().next() {
            None => true,
            Some(c) => c == ',' || c == '(' || c == ')' || c.is_whitespace(),
        };
        out.push_str(&rest[..pos]);
        if at_boundary {
            out.push_str(replacement);
            replaced += 1;
        } else {
            out.push_str(&token);
        }
        rest = after;
    }
    out.push_str(rest);
    (out, replaced)
}

/// Strip leading and trailing connective tokens and surrounding
/// whitespace. Token-aware: a trailing `XOR` is removed whole, never
/// half-stripped into `X`.
fn trim_connectives(subject: &str) -> &str {
    let mut out = subject.trim();
    loop {
        let mut trimmed = false;
        for connective in ["AND", "XOR", "OR"] {
            if let Some(rest) = out.strip_prefix(connective) {
                if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                    out = rest.trim_start();
                    trimmed = true;
                }
            }
            if let Some(rest) = out.strip_suffix(connective) {
                if rest.is_empty() || rest.ends_with(char::is_whitespace) {
                    out = rest.trim_end();
                    trimmed = true;
                }
            }
        }
        if !trimmed {
            return out;
        }
    }
}

/// Like [`trim_connectives`] but trims the tail only, so the result stays
/// a prefix of the input and `String::truncate` applies.
fn trim_trailing_connectives(subject: &str) -> &str {
    let mut out = subject.trim_end();
    loop {
        let mut trimmed = false;
        for connective in ["AND", "XOR", "OR"] {
            if let Some(rest) = out.strip_suffix(connective) {
                if rest.is_empty() || rest.ends_with(char::is_whitespace) {
                    out = rest.trim_end();
                    trimmed = true;
                }
            }
        }
        if !trimmed {
            return out;
        }
    }
}
