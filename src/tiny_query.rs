use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::sqlite::SqliteConnection;
use sqlx::{Column, Either, Statement as _};
use tinyquery_conn::{ConnectionConfig, SqliteConnectionHandle};
use tracing::{debug, error, trace, warn};

use crate::builders::SelectBuilder;
use crate::decode::decode_rows;
use crate::fragment::{RowId, Scope, TrustedSql};
use crate::result_set::ResultSet;
use crate::statement::{self, Statement};
use crate::value::{IntoTypeTags, Value, bind_tagged, bind_value};
use crate::{Error, Result};

/// Result returned from write operations (e.g. INSERT, UPDATE, DELETE).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteQueryResult {
   /// The number of rows affected by the write operation.
   pub rows_affected: u64,
   /// The last inserted row ID (SQLite ROWID).
   ///
   /// Only meaningful for INSERT operations on tables with a ROWID.
   pub last_insert_id: i64,
}

/// Handle for one-line CRUD operations against a single SQLite connection.
///
/// Each operation builds its SQL, prepares it, binds the values, executes it
/// and normalizes the result. Nothing is retried.
///
/// Cloning is cheap; clones share the connection and the
/// [`last_insert_id`](Self::last_insert_id) slot.
///
/// # Example
///
/// ```no_run
/// use tinyquery::{ConnectionConfig, Scope, TinyQuery, TrustedSql, Value};
///
/// # async fn demo() -> tinyquery::Result<()> {
/// let db = TinyQuery::connect(ConnectionConfig::new("app.db")).await?;
///
/// db.insert("users", &["name", "age"], vec![Value::from("Ada"), Value::from(30)])
///    .await?;
/// let id = db.last_insert_id();
///
/// let user = db
///    .select_one("users", TrustedSql::new("id = ?"), vec![Value::from(id)])
///    .await?;
/// let adults = db.count("users", Scope::filter("age >= 18")).await?;
///
/// db.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TinyQuery {
   conn: Arc<SqliteConnectionHandle>,
   last_insert_id: Arc<AtomicI64>,
}

impl TinyQuery {
   /// Open the database described by `config`.
   pub async fn connect(config: ConnectionConfig) -> Result<Self> {
      let conn = SqliteConnectionHandle::connect(config).await?;

      Ok(Self {
         conn: Arc::new(conn),
         last_insert_id: Arc::new(AtomicI64::new(0)),
      })
   }

   /// Open the database or terminate the process.
   ///
   /// A connection failure prints a diagnostic and exits with status 1;
   /// there is no retry and no partially constructed handle.
   pub async fn open_or_exit(config: ConnectionConfig) -> Self {
      match Self::connect(config).await {
         Ok(db) => db,
         Err(e) => {
            error!("Failed establishing database connection: {}", e);
            eprintln!("Failed establishing database connection... ({})", e);
            std::process::exit(1);
         }
      }
   }

   /// Row id recorded by the most recent successful insert, 0 before any.
   pub fn last_insert_id(&self) -> i64 {
      self.last_insert_id.load(Ordering::SeqCst)
   }

   /// Insert one row, binding `values` to `columns` in order.
   ///
   /// On success the new row id is also recorded as
   /// [`last_insert_id`](Self::last_insert_id).
   pub async fn insert(
      &self,
      table: &str,
      columns: &[&str],
      values: Vec<Value>,
   ) -> Result<WriteQueryResult> {
      let statement = statement::insert(table, columns, values)?;
      let result = self.write("insert", statement).await?;

      self
         .last_insert_id
         .store(result.last_insert_id, Ordering::SeqCst);
      Ok(result)
   }

   /// [`insert`](Self::insert) with type tags and untyped values.
   ///
   /// `tags` is a joined string (`"si"`) or a list (`["s", "i"]`).
   pub async fn insert_tagged(
      &self,
      table: &str,
      columns: &[&str],
      tags: impl IntoTypeTags,
      values: Vec<JsonValue>,
   ) -> Result<WriteQueryResult> {
      let values = bind_tagged(tags, values)?;
      self.insert(table, columns, values).await
   }

   /// Update `columns` on the rows in `scope`. [`Scope::All`] updates every row.
   pub async fn update(
      &self,
      table: &str,
      columns: &[&str],
      scope: Scope,
      values: Vec<Value>,
   ) -> Result<WriteQueryResult> {
      let statement = statement::update(table, columns, &scope, values)?;
      self.write("update", statement).await
   }

   /// [`update`](Self::update) with type tags and untyped values.
   pub async fn update_tagged(
      &self,
      table: &str,
      columns: &[&str],
      scope: Scope,
      tags: impl IntoTypeTags,
      values: Vec<JsonValue>,
   ) -> Result<WriteQueryResult> {
      let values = bind_tagged(tags, values)?;
      self.update(table, columns, scope, values).await
   }

   /// Delete the row with the given `id`, or every row for [`RowId::All`].
   pub async fn delete_by_id(
      &self,
      table: &str,
      id: impl Into<RowId>,
   ) -> Result<WriteQueryResult> {
      let statement = statement::delete_by_id(table, id.into());
      self.write("delete_by_id", statement).await
   }

   /// Delete every row matching `condition`.
   pub async fn delete_where(
      &self,
      table: &str,
      condition: TrustedSql,
   ) -> Result<WriteQueryResult> {
      let statement = statement::delete_where(table, &condition)?;
      self.write("delete_where", statement).await
   }

   /// Count rows in `scope` by their `id` column.
   ///
   /// A statement that matches nothing yields `Ok(0)`; a statement that cannot
   /// run yields an error.
   pub async fn count(&self, table: &str, scope: Scope) -> Result<i64> {
      let statement = statement::count(table, &scope)?;

      let mut conn = self.conn.acquire().await?;
      prepare(&mut conn, &statement).await?;

      debug!("Executing count: {}", statement.sql);
      let count = sqlx::query_scalar::<_, i64>(&statement.sql)
         .fetch_one(&mut *conn)
         .await
         .map_err(|source| execute_failed("count", &statement.sql, source))?;

      trace!("count returned {}", count);
      Ok(count)
   }

   /// Select rows from `table`.
   ///
   /// Returns a builder; set `.order_by()`, `.limit()` and `.offset()` and
   /// await it.
   pub fn select_many(&self, table: &str) -> SelectBuilder {
      SelectBuilder::new(self.clone(), table.to_string(), None)
   }

   /// Select rows from `table` matching `condition`.
   pub fn select_many_where(&self, table: &str, condition: TrustedSql) -> SelectBuilder {
      SelectBuilder::new(self.clone(), table.to_string(), Some(condition))
   }

   /// Select at most one row matching `condition`.
   ///
   /// `values` bind to the `?` placeholders inside `condition`. The statement
   /// ends in `LIMIT 1`, so extra matches are dropped rather than reported.
   pub async fn select_one(
      &self,
      table: &str,
      condition: TrustedSql,
      values: Vec<Value>,
   ) -> Result<ResultSet> {
      let statement = statement::select_one(table, &condition, values)?;
      self.fetch("select_one", statement).await
   }

   /// [`select_one`](Self::select_one) with type tags and untyped values.
   pub async fn select_one_tagged(
      &self,
      table: &str,
      condition: TrustedSql,
      tags: impl IntoTypeTags,
      values: Vec<JsonValue>,
   ) -> Result<ResultSet> {
      let values = bind_tagged(tags, values)?;
      self.select_one(table, condition, values).await
   }

   /// Run a statement exactly as written.
   pub async fn execute(&self, sql: TrustedSql) -> Result<WriteQueryResult> {
      self.write("execute", statement::raw(&sql)).await
   }

   /// Close the connection. Every later operation fails with
   /// `DatabaseClosed`.
   pub async fn close(&self) -> Result<()> {
      self.conn.close().await?;
      Ok(())
   }

   /// Whether [`close`](Self::close) has been called on this handle or a clone.
   pub fn is_closed(&self) -> bool {
      self.conn.is_closed()
   }

   async fn write(
      &self,
      operation: &'static str,
      statement: Statement,
   ) -> Result<WriteQueryResult> {
      let mut conn = self.conn.acquire().await?;
      prepare(&mut conn, &statement).await?;

      let Statement { sql, values } = statement;
      debug!("Executing {}: {} ({} bound)", operation, sql, values.len());

      let mut q = sqlx::query(&sql);
      for value in values {
         q = bind_value(q, value);
      }

      let result = q
         .execute(&mut *conn)
         .await
         .map_err(|source| execute_failed(operation, &sql, source))?;

      let result = WriteQueryResult {
         rows_affected: result.rows_affected(),
         last_insert_id: result.last_insert_rowid(),
      };
      trace!("{} affected {} row(s)", operation, result.rows_affected);
      Ok(result)
   }

   pub(crate) async fn fetch(
      &self,
      operation: &'static str,
      statement: Statement,
   ) -> Result<ResultSet> {
      let mut conn = self.conn.acquire().await?;
      let columns = prepare(&mut conn, &statement).await?;

      let Statement { sql, values } = statement;
      debug!("Executing {}: {} ({} bound)", operation, sql, values.len());

      let mut q = sqlx::query(&sql);
      for value in values {
         q = bind_value(q, value);
      }

      let rows = q
         .fetch_all(&mut *conn)
         .await
         .map_err(|source| execute_failed(operation, &sql, source))?;

      trace!("{} returned {} row(s)", operation, rows.len());
      Ok(ResultSet::new(columns, decode_rows(rows)?))
   }
}

/// Prepare `statement` and check its placeholders against its values.
///
/// Returns the statement's column names.
async fn prepare(conn: &mut SqliteConnection, statement: &Statement) -> Result<Vec<String>> {
   let prepared = sqlx::Executor::prepare(&mut *conn, statement.sql.as_str())
      .await
      .map_err(|source| {
         warn!("Failed to prepare `{}`: {}", statement.sql, source);
         Error::Prepare {
            sql: statement.sql.clone(),
            source,
         }
      })?;

   let placeholders = match prepared.parameters() {
      Some(Either::Left(types)) => Some(types.len()),
      Some(Either::Right(count)) => Some(count),
      None => None,
   };

   if let Some(placeholders) = placeholders
      && placeholders != statement.values.len()
   {
      return Err(Error::PlaceholderMismatch {
         placeholders,
         values: statement.values.len(),
      });
   }

   Ok(
      prepared
         .columns()
         .iter()
         .map(|column| column.name().to_string())
         .collect(),
   )
}

fn execute_failed(operation: &str, sql: &str, source: sqlx::Error) -> Error {
   warn!("{} failed: {}", operation, source);
   Error::Execute {
      sql: sql.to_string(),
      source,
   }
}
