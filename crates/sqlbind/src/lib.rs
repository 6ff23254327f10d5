//! # sqlbind
//!
//! A criteria-based SQL query builder with named parameters.
//!
//! ## Features
//!
//! - **Criteria trees**: nested AND/OR/XOR/NOT filter structures compiled
//!   to parenthesized boolean SQL plus a collision-free `:name` parameter
//!   map
//! - **Statement builders**: SELECT/INSERT/UPDATE/DELETE assembled from
//!   structured inputs (columns, joins, group-by, order-by, limit/offset)
//! - **Executor seam**: statements run through a small prepared-statement
//!   trait the caller implements for their driver
//! - **Paged iteration**: lazy LIMIT/OFFSET row iteration over large
//!   result sets
//! - **Link-table sync**: many-to-many reconciliation with a guarded
//!   transaction
//!
//! ## Quick look
//!
//! ```ignore
//! use sqlbind::{Criteria, Criterion, Db, Direction, LikeMatch, SelectQuery};
//!
//! let query = SelectQuery::new("users")
//!     .criteria(
//!         Criteria::new()
//!             .field("status", "active")
//!             .criterion(Criterion::like("name", "bob", LikeMatch::Contains)),
//!     )
//!     .order_by("created_at", Direction::Desc)
//!     .limit(10);
//!
//! let mut db = Db::new(my_executor);
//! let rows = db.select(&query)?;
//! ```

pub mod config;
pub mod criteria;
pub mod db;
pub mod error;
pub mod executor;
pub mod join;
pub mod query;
pub mod time;
pub mod value;

pub use config::ConnectOptions;
pub use criteria::{Connective, Criteria, Criterion, LikeMatch, Node};
pub use db::{Db, RowIter};
pub use error::{DbError, DbResult};
pub use executor::{Statement, StatementExecutor};
pub use join::{Join, JoinKind};
pub use query::{BuiltQuery, DeleteQuery, Direction, InsertQuery, SelectQuery, UpdateQuery};
pub use time::parse_date_time;
pub use value::{Params, Row, Value};
