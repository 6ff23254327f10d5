//! The database facade: builds statements, runs them through the
//! executor, and keeps last-statement bookkeeping for diagnostics.

use crate::criteria::{replace_placeholder, Criteria};
use crate::error::{DbError, DbResult};
use crate::executor::{prefixed, Statement, StatementExecutor};
use crate::query::{DeleteQuery, Direction, InsertQuery, SelectQuery, UpdateQuery};
use crate::value::{Params, Row, Value};
use std::collections::VecDeque;

/// Facade over a [`StatementExecutor`].
///
/// Owns the connection-level executor, tracks the last executed statement
/// for [`affected_rows`](Db::affected_rows) and
/// [`last_query`](Db::last_query), and enforces the one-transaction rule.
pub struct Db<E: StatementExecutor> {
    executor: E,
    last_statement: Option<E::Statement>,
    last_sql: Option<String>,
    last_params: Params,
}

impl<E: StatementExecutor> Db<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            last_statement: None,
            last_sql: None,
            last_params: Params::new(),
        }
    }

    /// Access the underlying executor.
    pub fn executor(&mut self) -> &mut E {
        &mut self.executor
    }

    fn run(&mut self, sql: &str, params: &Params) -> DbResult<E::Statement> {
        tracing::debug!(%sql, "executing statement");
        let mut statement = self.executor.prepare(sql)?;
        for (name, value) in params {
            statement.bind(&prefixed(name), value.clone());
        }
        let ok = statement.execute()?;
        self.last_sql = Some(sql.to_string());
        self.last_params = params.clone();
        if !ok {
            // Bookkeeping still points at the failed statement, the same
            // way last_sql does.
            self.last_statement = Some(statement);
            return Err(DbError::execution(sql, "driver reported failure"));
        }
        Ok(statement)
    }

    fn run_and_store(&mut self, sql: &str, params: &Params) -> DbResult<()> {
        let statement = self.run(sql, params)?;
        self.last_statement = Some(statement);
        Ok(())
    }

    // ==================== queries ====================

    /// Run a built SELECT and fetch every row.
    pub fn select(&mut self, query: &SelectQuery) -> DbResult<Vec<Row>> {
        let built = query.build()?;
        self.fetch_all(&built.sql, built.params)
    }

    /// Fetch rows of `table` matching `criteria`, columns qualified with
    /// the table name, with optional ordering and paging.
    pub fn find_by(
        &mut self,
        table: &str,
        criteria: Criteria,
        order_by: &[(&str, Direction)],
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> DbResult<Vec<Row>> {
        let mut query = SelectQuery::new(table).criteria(criteria).qualify(table);
        for (column, direction) in order_by {
            query = query.order_by(*column, *direction);
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        if let Some(offset) = offset {
            query = query.offset(offset);
        }
        self.select(&query)
    }

    /// Like [`find_by`](Db::find_by) but fetches at most one row.
    pub fn find_one_by(
        &mut self,
        table: &str,
        criteria: Criteria,
        order_by: &[(&str, Direction)],
    ) -> DbResult<Option<Row>> {
        let mut query = SelectQuery::new(table).criteria(criteria).qualify(table);
        for (column, direction) in order_by {
            query = query.order_by(*column, *direction);
        }
        let built = query.limit(1).build()?;
        let mut statement = self.run(&built.sql, &built.params)?;
        let row = statement.fetch_one()?;
        self.last_statement = Some(statement);
        Ok(row)
    }

    /// Fetch every row of `table`, optionally ordered.
    pub fn find_all(&mut self, table: &str, order_by: &[(&str, Direction)]) -> DbResult<Vec<Row>> {
        let mut query = SelectQuery::new(table);
        for (column, direction) in order_by {
            query = query.order_by(*column, *direction);
        }
        self.select(&query)
    }

    /// Count rows of `table` matching the optional criteria.
    pub fn count(&mut self, table: &str, criteria: Option<Criteria>) -> DbResult<i64> {
        let query = SelectQuery::new(table)
            .columns(["COUNT(*)"])
            .criteria(criteria.unwrap_or_default())
            .qualify(table);
        let built = query.build()?;
        let mut statement = self.run(&built.sql, &built.params)?;
        let row = statement.fetch_one()?;
        self.last_statement = Some(statement);
        row.as_ref()
            .and_then(|r| r.values().next())
            .and_then(Value::as_i64)
            .ok_or_else(|| DbError::execution(&built.sql, "COUNT query returned no value"))
    }

    /// Run raw SQL and fetch every row.
    pub fn fetch_all(&mut self, sql: &str, params: Params) -> DbResult<Vec<Row>> {
        let mut statement = self.run(sql, &params)?;
        let rows = statement.fetch_all()?;
        self.last_statement = Some(statement);
        Ok(rows)
    }

    /// Run raw SQL and fetch the first row, if any.
    pub fn fetch_first_row(&mut self, sql: &str, params: Params) -> DbResult<Option<Row>> {
        let mut statement = self.run(sql, &params)?;
        let row = statement.fetch_one()?;
        self.last_statement = Some(statement);
        Ok(row)
    }

    /// Run raw SQL and fetch the first column of the first row, if any.
    pub fn fetch_first_column(&mut self, sql: &str, params: Params) -> DbResult<Option<Value>> {
        let row = self.fetch_first_row(sql, params)?;
        Ok(row.and_then(|r| r.values().next().cloned()))
    }

    /// Run a non-query statement.
    pub fn execute(&mut self, sql: &str, params: Params) -> DbResult<()> {
        self.run_and_store(sql, &params)
    }

    // ==================== mutations ====================

    /// Insert one row, optionally with ON DUPLICATE KEY UPDATE
    /// assignments.
    pub fn insert(
        &mut self,
        table: &str,
        data: Params,
        on_duplicate_key_update: Option<Params>,
    ) -> DbResult<()> {
        let mut query = InsertQuery::new(table).set_all(data);
        if let Some(assignments) = on_duplicate_key_update {
            query = query.on_duplicate_key_update_all(assignments);
        }
        let built = query.build()?;
        self.run_and_store(&built.sql, &built.params)
    }

    /// Update rows matching a raw condition.
    pub fn update(
        &mut self,
        table: &str,
        data: Params,
        condition: &str,
        params: Params,
    ) -> DbResult<()> {
        let built = UpdateQuery::new(table)
            .set_all(data)
            .condition(condition)
            .bind_all(params)
            .build()?;
        self.run_and_store(&built.sql, &built.params)
    }

    /// Delete rows matching a raw condition.
    pub fn delete(&mut self, table: &str, condition: &str, params: Params) -> DbResult<()> {
        let built = DeleteQuery::new(table)
            .condition(condition)
            .bind_all(params)
            .build()?;
        self.run_and_store(&built.sql, &built.params)
    }

    // ==================== transactions ====================

    /// Open a transaction. At most one may be active per connection.
    pub fn begin_transaction(&mut self) -> DbResult<()> {
        if self.executor.in_transaction() {
            return Err(DbError::invalid_state("a transaction is already active"));
        }
        self.executor.begin()
    }

    pub fn commit_transaction(&mut self) -> DbResult<()> {
        if !self.executor.in_transaction() {
            return Err(DbError::invalid_state("no active transaction to commit"));
        }
        self.executor.commit()
    }

    pub fn rollback_transaction(&mut self) -> DbResult<()> {
        if !self.executor.in_transaction() {
            return Err(DbError::invalid_state("no active transaction to roll back"));
        }
        self.executor.rollback()
    }

    pub fn has_active_transaction(&self) -> bool {
        self.executor.in_transaction()
    }

    // ==================== bookkeeping ====================

    /// Identifier generated by the last INSERT.
    pub fn last_insert_id(&mut self, sequence: Option<&str>) -> DbResult<i64> {
        self.executor.last_insert_id(sequence)
    }

    /// Rows affected by the last executed statement.
    pub fn affected_rows(&self) -> DbResult<u64> {
        self.last_statement
            .as_ref()
            .map(Statement::affected_rows)
            .ok_or_else(|| DbError::invalid_state("no statement has been executed yet"))
    }

    /// The last executed SQL, optionally with bound values substituted
    /// back into the `:name` placeholders.
    ///
    /// Diagnostic only: the substituted text must never be executed.
    pub fn last_query(&self, with_parameters: bool) -> DbResult<String> {
        let sql = self
            .last_sql
            .as_deref()
            .ok_or_else(|| DbError::invalid_state("no statement has been executed yet"))?;
        if !with_parameters {
            return Ok(sql.to_string());
        }
        let quote = |s: &str| self.executor.quote(s);
        let mut rebuilt = sql.to_string();
        for (name, value) in &self.last_params {
            let name = name.strip_prefix(':').unwrap_or(name);
            let literal = value.to_debug_literal(&quote);
            let (next, _) = replace_placeholder(&rebuilt, name, &literal);
            rebuilt = next;
        }
        Ok(rebuilt)
    }

    // ==================== iteration ====================

    /// Iterate rows of `table` matching `criteria`, one page at a time.
    pub fn iterate(
        &mut self,
        table: &str,
        criteria: Criteria,
        order_by: &[(&str, Direction)],
        batch_size: i64,
    ) -> DbResult<RowIter<'_, E>> {
        let mut query = SelectQuery::new(table).criteria(criteria).qualify(table);
        for (column, direction) in order_by {
            query = query.order_by(*column, *direction);
        }
        let built = query.build()?;
        self.iterate_query(&built.sql, built.params, batch_size)
    }

    /// Iterate the rows of an arbitrary SELECT, one page at a time.
    pub fn iterate_query(
        &mut self,
        sql: &str,
        params: Params,
        batch_size: i64,
    ) -> DbResult<RowIter<'_, E>> {
        if batch_size <= 0 {
            return Err(DbError::invalid_input("batch size must be positive"));
        }
        Ok(RowIter {
            db: self,
            sql: sql.to_string(),
            params,
            batch_size,
            page: 0,
            buffer: VecDeque::new(),
            finished: false,
        })
    }

    // ==================== many-to-many ====================

    /// Reconcile a link table so `owning_id` is linked to exactly
    /// `desired_inverse_ids`.
    ///
    /// Duplicates in the desired list are ignored. When nothing changes,
    /// no mutation runs and no transaction is opened. Otherwise the DELETE
    /// and INSERTs run inside a transaction opened here only when none is
    /// active; a self-opened transaction is rolled back on failure, a
    /// caller-owned one is left untouched.
    pub fn sync_many_to_many(
        &mut self,
        link_table: &str,
        owning_column: &str,
        inverse_column: &str,
        owning_id: Value,
        desired_inverse_ids: &[Value],
    ) -> DbResult<()> {
        let query = SelectQuery::new(link_table)
            .columns([inverse_column])
            .criteria(Criteria::new().field(owning_column, owning_id.clone()));
        let rows = self.select(&query)?;
        let current: Vec<Value> = rows
            .iter()
            .filter_map(|row| row.values().next().cloned())
            .collect();

        let mut desired: Vec<Value> = Vec::new();
        for id in desired_inverse_ids {
            if !desired.contains(id) {
                desired.push(id.clone());
            }
        }
        let to_delete: Vec<&Value> = current.iter().filter(|id| !desired.contains(id)).collect();
        let to_add: Vec<&Value> = desired.iter().filter(|id| !current.contains(id)).collect();
        if to_delete.is_empty() && to_add.is_empty() {
            return Ok(());
        }

        let opened = !self.executor.in_transaction();
        if opened {
            self.begin_transaction()?;
        }
        let result = self.apply_link_changes(
            link_table,
            owning_column,
            inverse_column,
            &owning_id,
            &to_delete,
            &to_add,
        );
        match result {
            Ok(()) => {
                if opened {
                    self.commit_transaction()?;
                }
                Ok(())
            }
            Err(err) => {
                if opened {
                    if let Err(rollback_err) = self.executor.rollback() {
                        tracing::warn!(
                            error = %rollback_err,
                            "rollback after failed link-table sync also failed"
                        );
                    }
                }
                Err(err)
            }
        }
    }

    fn apply_link_changes(
        &mut self,
        link_table: &str,
        owning_column: &str,
        inverse_column: &str,
        owning_id: &Value,
        to_delete: &[&Value],
        to_add: &[&Value],
    ) -> DbResult<()> {
        if !to_delete.is_empty() {
            let placeholders: Vec<String> = (0..to_delete.len())
                .map(|i| format!(":inverse_id_delete_{i}"))
                .collect();
            let sql = format!(
                "DELETE FROM {link_table} WHERE {owning_column} = :owning_id \
                 AND {inverse_column} IN ({})",
                placeholders.join(", ")
            );
            let mut params = Params::new();
            params.insert("owning_id".to_string(), owning_id.clone());
            for (i, id) in to_delete.iter().enumerate() {
                params.insert(format!("inverse_id_delete_{i}"), (*id).clone());
            }
            self.run_and_store(&sql, &params)?;
        }
        for (i, id) in to_add.iter().enumerate() {
            let sql = format!(
                "INSERT INTO {link_table} ({owning_column}, {inverse_column}) \
                 VALUES (:owning_id, :inverse_id_insert_{i})"
            );
            let mut params = Params::new();
            params.insert("owning_id".to_string(), owning_id.clone());
            params.insert(format!("inverse_id_insert_{i}"), (*id).clone());
            self.run_and_store(&sql, &params)?;
        }
        Ok(())
    }
}

/// Lazy, forward-only page-at-a-time row iterator.
///
/// Each exhausted buffer triggers one more fetch with
/// `LIMIT batch OFFSET page*batch`; iteration ends only once a fetched
/// page comes back empty, so a short page is yielded in full first.
pub struct RowIter<'a, E: StatementExecutor> {
    db: &'a mut Db<E>,
    sql: String,
    params: Params,
    batch_size: i64,
    page: i64,
    buffer: VecDeque<Row>,
    finished: bool,
}

impl<E: StatementExecutor> Iterator for RowIter<'_, E> {
    type Item = DbResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.buffer.pop_front() {
                return Some(Ok(row));
            }
            if self.finished {
                return None;
            }
            let sql = format!(
                "{} LIMIT {} OFFSET {}",
                self.sql,
                self.batch_size,
                self.page * self.batch_size
            );
            match self.db.fetch_all(&sql, self.params.clone()) {
                Ok(rows) => {
                    if rows.is_empty() {
                        self.finished = true;
                        return None;
                    }
                    self.page += 1;
                    self.buffer.extend(rows);
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
