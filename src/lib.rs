//! # tinyquery
//!
//! One-line, parameterized CRUD calls against a SQLite database.
//!
//! Instead of hand-writing SQL for every insert, update, delete, count and
//! select, callers name a table, columns and a condition; tinyquery builds
//! the statement with `?` placeholders, binds the values, runs it and hands
//! back a [`WriteQueryResult`], a count or a [`ResultSet`].
//!
//! Values always travel through placeholders. Table names, column names and
//! [`TrustedSql`] fragments (conditions, ORDER BY text, raw statements) are
//! written into the SQL as-is and must never carry untrusted input.
//!
//! Operations that touch every row must say so: [`Scope::All`] for updates
//! and counts, [`RowId::All`] for deletes.

mod builders;
mod decode;
mod error;
mod fragment;
mod result_set;
pub mod statement;
mod tiny_query;
mod value;

pub use builders::SelectBuilder;
pub use error::{Error, ErrorKind, Result};
pub use fragment::{Limit, RowId, Scope, TrustedSql};
pub use result_set::{ResultRow, ResultSet};
pub use tiny_query::{TinyQuery, WriteQueryResult};
pub use tinyquery_conn::ConnectionConfig;
pub use value::{IntoTypeTags, TypeTag, Value, bind_tagged, parse_tag_list, parse_tags};
