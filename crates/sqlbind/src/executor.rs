//! The prepared-statement capability the facade executes through.
//!
//! The library builds SQL with named `:name` placeholders and hands it to
//! an implementation of [`StatementExecutor`]. Drivers are out of scope;
//! callers adapt their connection type to these two traits.

use crate::error::DbResult;
use crate::value::{Row, Value};

/// A prepared statement: bind named parameters, execute, fetch.
pub trait Statement {
    /// Bind one named parameter. The name may be given with or without the
    /// leading `:`.
    fn bind(&mut self, name: &str, value: Value);

    /// Execute the statement. `Ok(false)` means the driver reported a
    /// non-exceptional failure; the facade turns it into an execution
    /// error carrying the SQL text.
    fn execute(&mut self) -> DbResult<bool>;

    /// Fetch every row of the result set.
    fn fetch_all(&mut self) -> DbResult<Vec<Row>>;

    /// Fetch the next row, if any.
    fn fetch_one(&mut self) -> DbResult<Option<Row>>;

    /// Rows affected by the last execution.
    fn affected_rows(&self) -> u64;
}

/// Connection-level capability: prepare statements, manage the single
/// transaction, quote strings.
pub trait StatementExecutor {
    type Statement: Statement;

    fn prepare(&mut self, sql: &str) -> DbResult<Self::Statement>;

    fn begin(&mut self) -> DbResult<()>;
    fn commit(&mut self) -> DbResult<()>;
    fn rollback(&mut self) -> DbResult<()>;
    fn in_transaction(&self) -> bool;

    /// Identifier generated by the last INSERT, optionally scoped to a
    /// named sequence.
    fn last_insert_id(&mut self, sequence: Option<&str>) -> DbResult<i64>;

    /// Quote a string literal for diagnostic output. The default wraps in
    /// single quotes and doubles embedded quotes.
    fn quote(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}

/// Normalize a parameter name to carry the `:` prefix.
pub(crate) fn prefixed(name: &str) -> String {
    if name.starts_with(':') {
        name.to_string()
    } else {
        format!(":{name}")
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory executor recording every statement and replaying queued
    //! result pages.

    use super::*;
    use crate::error::DbError;
    use crate::value::Params;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Executed {
        pub(crate) sql: String,
        pub(crate) params: Params,
    }

    #[derive(Debug, Default)]
    pub(crate) struct MockState {
        pub(crate) executed: Vec<Executed>,
        pub(crate) results: VecDeque<Vec<Row>>,
        /// Any prepared SQL containing this substring fails to execute.
        pub(crate) fail_on: Option<String>,
        pub(crate) in_transaction: bool,
        pub(crate) tx_log: Vec<&'static str>,
        pub(crate) last_insert_id: i64,
        pub(crate) affected: u64,
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct MockExecutor {
        pub(crate) state: Rc<RefCell<MockState>>,
    }

    impl MockExecutor {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn queue_result(&self, rows: Vec<Row>) {
            self.state.borrow_mut().results.push_back(rows);
        }

        pub(crate) fn fail_on(&self, fragment: &str) {
            self.state.borrow_mut().fail_on = Some(fragment.to_string());
        }

        pub(crate) fn executed_sql(&self) -> Vec<String> {
            self.state
                .borrow()
                .executed
                .iter()
                .map(|e| e.sql.clone())
                .collect()
        }
    }

    pub(crate) struct MockStatement {
        sql: String,
        bound: Params,
        page: Option<Vec<Row>>,
        state: Rc<RefCell<MockState>>,
    }

    impl Statement for MockStatement {
        fn bind(&mut self, name: &str, value: Value) {
            self.bound.insert(prefixed(name), value);
        }

        fn execute(&mut self) -> DbResult<bool> {
            let mut state = self.state.borrow_mut();
            if let Some(fragment) = &state.fail_on {
                if self.sql.contains(fragment.as_str()) {
                    return Ok(false);
                }
            }
            state.executed.push(Executed {
                sql: self.sql.clone(),
                params: self.bound.clone(),
            });
            self.page = Some(state.results.pop_front().unwrap_or_default());
            Ok(true)
        }

        fn fetch_all(&mut self) -> DbResult<Vec<Row>> {
            Ok(self.page.take().unwrap_or_default())
        }

        fn fetch_one(&mut self) -> DbResult<Option<Row>> {
            match self.page.as_mut() {
                Some(rows) if !rows.is_empty() => Ok(Some(rows.remove(0))),
                _ => Ok(None),
            }
        }

        fn affected_rows(&self) -> u64 {
            self.state.borrow().affected
        }
    }

    impl StatementExecutor for MockExecutor {
        type Statement = MockStatement;

        fn prepare(&mut self, sql: &str) -> DbResult<Self::Statement> {
            Ok(MockStatement {
                sql: sql.to_string(),
                bound: Params::new(),
                page: None,
                state: Rc::clone(&self.state),
            })
        }

        fn begin(&mut self) -> DbResult<()> {
            let mut state = self.state.borrow_mut();
            if state.in_transaction {
                return Err(DbError::invalid_state("transaction already active"));
            }
            state.in_transaction = true;
            state.tx_log.push("begin");
            Ok(())
        }

        fn commit(&mut self) -> DbResult<()> {
            let mut state = self.state.borrow_mut();
            state.in_transaction = false;
            state.tx_log.push("commit");
            Ok(())
        }

        fn rollback(&mut self) -> DbResult<()> {
            let mut state = self.state.borrow_mut();
            state.in_transaction = false;
            state.tx_log.push("rollback");
            Ok(())
        }

        fn in_transaction(&self) -> bool {
            self.state.borrow().in_transaction
        }

        fn last_insert_id(&mut self, _sequence: Option<&str>) -> DbResult<i64> {
            Ok(self.state.borrow().last_insert_id)
        }
    }
}
