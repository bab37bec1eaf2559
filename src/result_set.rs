//! Rows returned by select-style operations

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// One decoded row, columns in result order.
pub type ResultRow = IndexMap<String, JsonValue>;

/// Rows returned by a select, fetched in full before the call returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
   columns: Vec<String>,
   rows: Vec<ResultRow>,
}

impl ResultSet {
   pub(crate) fn new(columns: Vec<String>, rows: Vec<ResultRow>) -> Self {
      Self { columns, rows }
   }

   /// Column names of the statement, available even when no row matched.
   pub fn columns(&self) -> &[String] {
      &self.columns
   }

   pub fn num_rows(&self) -> usize {
      self.rows.len()
   }

   pub fn is_empty(&self) -> bool {
      self.rows.is_empty()
   }

   pub fn rows(&self) -> &[ResultRow] {
      &self.rows
   }

   pub fn first(&self) -> Option<&ResultRow> {
      self.rows.first()
   }

   pub fn iter(&self) -> std::slice::Iter<'_, ResultRow> {
      self.rows.iter()
   }

   pub fn into_rows(self) -> Vec<ResultRow> {
      self.rows
   }
}

impl IntoIterator for ResultSet {
   type Item = ResultRow;
   type IntoIter = std::vec::IntoIter<ResultRow>;

   fn into_iter(self) -> Self::IntoIter {
      self.rows.into_iter()
   }
}

impl<'a> IntoIterator for &'a ResultSet {
   type Item = &'a ResultRow;
   type IntoIter = std::slice::Iter<'a, ResultRow>;

   fn into_iter(self) -> Self::IntoIter {
      self.rows.iter()
   }
}
