//! Trusted SQL fragments and row-selection markers.
//!
//! Table names, column names, conditions and ORDER BY text are written into
//! the statement exactly as given; only [`Value`](crate::Value)s go through
//! placeholders. [`TrustedSql`] marks text the caller vouches for, and it has
//! no `From<&str>` so raw text cannot slip in where a bound value was meant.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Raw SQL text interpolated verbatim into a statement.
///
/// Never build one from user input; put user input in bound values and refer
/// to it with `?` inside the fragment instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedSql(String);

impl TrustedSql {
   pub fn new(sql: impl Into<String>) -> Self {
      Self(sql.into())
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }

   pub fn is_blank(&self) -> bool {
      self.0.trim().is_empty()
   }
}

impl fmt::Display for TrustedSql {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(&self.0)
   }
}

/// Which rows an update or count applies to.
///
/// Affecting every row must be spelled out as [`Scope::All`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
   All,
   Where(TrustedSql),
}

impl Scope {
   /// Shorthand for `Scope::Where(TrustedSql::new(condition))`.
   pub fn filter(condition: impl Into<String>) -> Self {
      Scope::Where(TrustedSql::new(condition))
   }
}

/// Target of a delete by id.
///
/// [`RowId::All`] deletes every row in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowId {
   All,
   Id(i64),
}

impl From<i64> for RowId {
   fn from(id: i64) -> Self {
      RowId::Id(id)
   }
}

/// Maximum number of rows a multi-select returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Limit {
   /// No LIMIT clause; the offset is ignored.
   #[default]
   All,
   Rows(u64),
}

impl From<u64> for Limit {
   fn from(rows: u64) -> Self {
      Limit::Rows(rows)
   }
}

/// Parses the textual form: `*` or an empty string for [`Limit::All`], a
/// non-negative integer for [`Limit::Rows`].
impl FromStr for Limit {
   type Err = Error;

   fn from_str(s: &str) -> Result<Self> {
      match s.trim() {
         "" | "*" => Ok(Limit::All),
         rows => rows
            .parse::<u64>()
            .map(Limit::Rows)
            .map_err(|_| Error::InvalidLimit(rows.to_string())),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_limit_from_str() {
      assert_eq!("*".parse::<Limit>().unwrap(), Limit::All);
      assert_eq!("".parse::<Limit>().unwrap(), Limit::All);
      assert_eq!(" 25 ".parse::<Limit>().unwrap(), Limit::Rows(25));
      assert!("-1".parse::<Limit>().is_err());
      assert!("ten".parse::<Limit>().is_err());
   }

   #[test]
   fn test_blank_fragment() {
      assert!(TrustedSql::new("  ").is_blank());
      assert!(!TrustedSql::new("id = ?").is_blank());
      assert_eq!(TrustedSql::new("id DESC").to_string(), "id DESC");
   }

   #[test]
   fn test_scope_filter() {
      assert_eq!(
         Scope::filter("age < 18"),
         Scope::Where(TrustedSql::new("age < 18"))
      );
      assert_eq!(RowId::from(5), RowId::Id(5));
   }
}
