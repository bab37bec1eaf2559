//! Builder for multi-row selects

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use crate::Error;
use crate::fragment::{Limit, TrustedSql};
use crate::result_set::ResultSet;
use crate::statement;
use crate::tiny_query::TinyQuery;

/// Builder for SELECT queries returning multiple rows
///
/// ```no_run
/// # use tinyquery::{Limit, TinyQuery, TrustedSql};
/// # async fn demo(db: TinyQuery) -> tinyquery::Result<()> {
/// // SELECT * FROM posts ORDER BY id DESC LIMIT ?, ?   bind: (20, 10)
/// let page = db
///    .select_many("posts")
///    .order_by(TrustedSql::new("id DESC"))
///    .limit(Limit::Rows(10))
///    .offset(20)
///    .await?;
/// # Ok(())
/// # }
/// ```
pub struct SelectBuilder {
   db: TinyQuery,
   table: String,
   condition: Option<TrustedSql>,
   order: Option<TrustedSql>,
   limit: Limit,
   offset: u64,
}

impl SelectBuilder {
   pub(crate) fn new(db: TinyQuery, table: String, condition: Option<TrustedSql>) -> Self {
      Self {
         db,
         table,
         condition,
         order: None,
         limit: Limit::All,
         offset: 0,
      }
   }

   /// Sort the rows, e.g. `id DESC` or `RANDOM()`
   pub fn order_by(mut self, order: TrustedSql) -> Self {
      self.order = Some(order);
      self
   }

   /// Return at most this many rows. [`Limit::All`] (the default) returns
   /// every row and ignores the offset.
   pub fn limit(mut self, limit: impl Into<Limit>) -> Self {
      self.limit = limit.into();
      self
   }

   /// Skip this many rows before returning any. Only applies with a row limit.
   pub fn offset(mut self, offset: u64) -> Self {
      self.offset = offset;
      self
   }

   /// Execute the query and return all matching rows
   pub async fn execute(self) -> Result<ResultSet, Error> {
      let operation = if self.condition.is_some() {
         "select_many_where"
      } else {
         "select_many"
      };

      let statement = statement::select_many(
         &self.table,
         self.condition.as_ref(),
         self.order.as_ref(),
         self.limit,
         self.offset,
      )?;

      self.db.fetch(operation, statement).await
   }
}

impl IntoFuture for SelectBuilder {
   type Output = Result<ResultSet, Error>;
   type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

   fn into_future(self) -> Self::IntoFuture {
      Box::pin(self.execute())
   }
}
