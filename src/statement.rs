//! SQL text generation for the CRUD operations.
//!
//! Every function here is pure: it turns a table, columns and fragments into
//! a [`Statement`] whose `sql` uses `?` placeholders and whose `values` line up
//! with those placeholders left to right. Identifiers and [`TrustedSql`]
//! fragments are copied into the text verbatim.

use crate::fragment::{Limit, RowId, Scope, TrustedSql};
use crate::value::Value;
use crate::{Error, Result};

/// SQL text plus the values for its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
   pub sql: String,
   pub values: Vec<Value>,
}

impl Statement {
   fn new(sql: String, values: Vec<Value>) -> Self {
      Self { sql, values }
   }
}

/// `?, ?, ..., ?` with `count` markers.
pub(crate) fn placeholders(count: usize) -> String {
   vec!["?"; count].join(", ")
}

fn check_columns(operation: &'static str, columns: &[&str], values: &[Value]) -> Result<()> {
   if columns.is_empty() {
      return Err(Error::EmptyColumns { operation });
   }
   if columns.len() != values.len() {
      return Err(Error::ColumnValueMismatch {
         columns: columns.len(),
         values: values.len(),
      });
   }
   Ok(())
}

fn where_clause(operation: &'static str, condition: &TrustedSql) -> Result<String> {
   if condition.is_blank() {
      return Err(Error::EmptyCondition { operation });
   }
   Ok(format!(" WHERE {}", condition))
}

fn scope_clause(operation: &'static str, scope: &Scope) -> Result<String> {
   match scope {
      Scope::All => Ok(String::new()),
      Scope::Where(condition) => where_clause(operation, condition),
   }
}

/// `INSERT INTO <table> (<c1>, ..., <cN>) VALUES (?, ..., ?)`
pub fn insert(table: &str, columns: &[&str], values: Vec<Value>) -> Result<Statement> {
   check_columns("insert", columns, &values)?;

   let sql = format!(
      "INSERT INTO {} ({}) VALUES ({})",
      table,
      columns.join(", "),
      placeholders(columns.len())
   );
   Ok(Statement::new(sql, values))
}

/// `UPDATE <table> SET <c1> = ?, ..., <cN> = ? [WHERE <condition>]`
pub fn update(
   table: &str,
   columns: &[&str],
   scope: &Scope,
   values: Vec<Value>,
) -> Result<Statement> {
   check_columns("update", columns, &values)?;

   let assignments = columns
      .iter()
      .map(|column| format!("{} = ?", column))
      .collect::<Vec<_>>()
      .join(", ");

   let sql = format!(
      "UPDATE {} SET {}{}",
      table,
      assignments,
      scope_clause("update", scope)?
   );
   Ok(Statement::new(sql, values))
}

/// `DELETE FROM <table> [WHERE id = ?]`
///
/// [`RowId::All`] leaves out the WHERE clause and empties the table.
pub fn delete_by_id(table: &str, id: RowId) -> Statement {
   match id {
      RowId::All => Statement::new(format!("DELETE FROM {}", table), Vec::new()),
      RowId::Id(id) => Statement::new(
         format!("DELETE FROM {} WHERE id = ?", table),
         vec![Value::Integer(id)],
      ),
   }
}

/// `DELETE FROM <table> WHERE <condition>`
pub fn delete_where(table: &str, condition: &TrustedSql) -> Result<Statement> {
   let sql = format!(
      "DELETE FROM {}{}",
      table,
      where_clause("delete_where", condition)?
   );
   Ok(Statement::new(sql, Vec::new()))
}

/// `SELECT COUNT(id) FROM <table> [WHERE <condition>]`
pub fn count(table: &str, scope: &Scope) -> Result<Statement> {
   let sql = format!(
      "SELECT COUNT(id) FROM {}{}",
      table,
      scope_clause("count", scope)?
   );
   Ok(Statement::new(sql, Vec::new()))
}

/// `SELECT * FROM <table> [WHERE <condition>] [ORDER BY <order>] [LIMIT ?, ?]`
///
/// The LIMIT placeholders are bound as `(offset, limit)`. With
/// [`Limit::All`] there is no LIMIT clause and `offset` is ignored.
pub fn select_many(
   table: &str,
   condition: Option<&TrustedSql>,
   order: Option<&TrustedSql>,
   limit: Limit,
   offset: u64,
) -> Result<Statement> {
   let mut sql = format!("SELECT * FROM {}", table);
   let mut values = Vec::new();

   if let Some(condition) = condition {
      sql.push_str(&where_clause("select_many_where", condition)?);
   }

   if let Some(order) = order {
      if order.is_blank() {
         return Err(Error::EmptyOrder);
      }
      sql.push_str(" ORDER BY ");
      sql.push_str(order.as_str());
   }

   if let Limit::Rows(rows) = limit {
      sql.push_str(" LIMIT ?, ?");
      values.push(Value::Integer(clamp_to_i64(offset)));
      values.push(Value::Integer(clamp_to_i64(rows)));
   }

   Ok(Statement::new(sql, values))
}

/// `SELECT * FROM <table> WHERE <condition> LIMIT 1`
///
/// `values` are bound to the condition's own placeholders.
pub fn select_one(table: &str, condition: &TrustedSql, values: Vec<Value>) -> Result<Statement> {
   let sql = format!(
      "SELECT * FROM {}{} LIMIT 1",
      table,
      where_clause("select_one", condition)?
   );
   Ok(Statement::new(sql, values))
}

/// Raw statement text, passed through unchanged.
pub fn raw(sql: &TrustedSql) -> Statement {
   Statement::new(sql.as_str().to_owned(), Vec::new())
}

// SQLite integers are signed 64-bit
fn clamp_to_i64(n: u64) -> i64 {
   i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
   use super::*;

   fn sql(condition: &str) -> TrustedSql {
      TrustedSql::new(condition)
   }

   #[test]
   fn test_placeholders() {
      assert_eq!(placeholders(1), "?");
      assert_eq!(placeholders(3), "?, ?, ?");
   }

   #[test]
   fn test_insert() {
      let stmt = insert(
         "users",
         &["name", "age"],
         vec![Value::from("Ada"), Value::from(30)],
      )
      .unwrap();

      assert_eq!(stmt.sql, "INSERT INTO users (name, age) VALUES (?, ?)");
      assert_eq!(stmt.values, vec![Value::from("Ada"), Value::from(30)]);
   }

   #[test]
   fn test_insert_single_column() {
      let stmt = insert("tags", &["label"], vec![Value::from("rust")]).unwrap();
      assert_eq!(stmt.sql, "INSERT INTO tags (label) VALUES (?)");
   }

   #[test]
   fn test_insert_placeholder_count_matches_columns() {
      let columns = ["a", "b", "c", "d", "e"];
      let values = (0..5_i64).map(Value::from).collect();
      let stmt = insert("t", &columns, values).unwrap();
      assert_eq!(stmt.sql.matches('?').count(), columns.len());
   }

   #[test]
   fn test_insert_rejects_bad_shapes() {
      assert!(matches!(
         insert("t", &[], vec![]),
         Err(Error::EmptyColumns { operation: "insert" })
      ));
      assert!(matches!(
         insert("t", &["a", "b"], vec![Value::from(1)]),
         Err(Error::ColumnValueMismatch {
            columns: 2,
            values: 1
         })
      ));
   }

   #[test]
   fn test_update_with_condition() {
      let stmt = update(
         "metadata",
         &["content", "author"],
         &Scope::filter("name = 'site'"),
         vec![Value::from("hello"), Value::from("ada")],
      )
      .unwrap();

      assert_eq!(
         stmt.sql,
         "UPDATE metadata SET content = ?, author = ? WHERE name = 'site'"
      );
   }

   #[test]
   fn test_update_all_rows() {
      let stmt = update("users", &["status"], &Scope::All, vec![Value::from(1)]).unwrap();
      assert_eq!(stmt.sql, "UPDATE users SET status = ?");
   }

   #[test]
   fn test_update_rejects_blank_condition() {
      let err = update("users", &["status"], &Scope::filter(" "), vec![Value::from(1)]);
      assert!(matches!(err, Err(Error::EmptyCondition { operation: "update" })));
   }

   #[test]
   fn test_delete_by_id() {
      let stmt = delete_by_id("files", RowId::Id(5));
      assert_eq!(stmt.sql, "DELETE FROM files WHERE id = ?");
      assert_eq!(stmt.values, vec![Value::Integer(5)]);

      let stmt = delete_by_id("unverified_accounts", RowId::All);
      assert_eq!(stmt.sql, "DELETE FROM unverified_accounts");
      assert!(stmt.values.is_empty());
   }

   #[test]
   fn test_delete_where() {
      let stmt = delete_where("comments", &sql("author = 'ada'")).unwrap();
      assert_eq!(stmt.sql, "DELETE FROM comments WHERE author = 'ada'");

      assert!(matches!(
         delete_where("comments", &sql("")),
         Err(Error::EmptyCondition { .. })
      ));
   }

   #[test]
   fn test_count() {
      assert_eq!(
         count("comments", &Scope::All).unwrap().sql,
         "SELECT COUNT(id) FROM comments"
      );
      assert_eq!(
         count("users", &Scope::filter("age < 18")).unwrap().sql,
         "SELECT COUNT(id) FROM users WHERE age < 18"
      );
   }

   #[test]
   fn test_select_many_all_rows_ignores_offset() {
      let stmt = select_many("posts", None, Some(&sql("id DESC")), Limit::All, 10).unwrap();
      assert_eq!(stmt.sql, "SELECT * FROM posts ORDER BY id DESC");
      assert!(stmt.values.is_empty());

      let stmt = select_many("posts", None, None, Limit::All, 10).unwrap();
      assert_eq!(stmt.sql, "SELECT * FROM posts");
   }

   #[test]
   fn test_select_many_binds_offset_then_limit() {
      let stmt = select_many("posts", None, Some(&sql("id ASC")), Limit::Rows(5), 10).unwrap();
      assert_eq!(stmt.sql, "SELECT * FROM posts ORDER BY id ASC LIMIT ?, ?");
      assert_eq!(stmt.values, vec![Value::Integer(10), Value::Integer(5)]);

      let stmt = select_many("posts", None, None, Limit::Rows(5), 0).unwrap();
      assert_eq!(stmt.sql, "SELECT * FROM posts LIMIT ?, ?");
   }

   #[test]
   fn test_select_many_where_clause_order() {
      let stmt = select_many(
         "registered_users",
         Some(&sql("username = 'john'")),
         Some(&sql("id DESC")),
         Limit::Rows(5),
         0,
      )
      .unwrap();

      assert_eq!(
         stmt.sql,
         "SELECT * FROM registered_users WHERE username = 'john' ORDER BY id DESC LIMIT ?, ?"
      );
   }

   #[test]
   fn test_select_many_rejects_blank_fragments() {
      assert!(matches!(
         select_many("t", Some(&sql("")), None, Limit::All, 0),
         Err(Error::EmptyCondition { .. })
      ));
      assert!(matches!(
         select_many("t", None, Some(&sql(" ")), Limit::All, 0),
         Err(Error::EmptyOrder)
      ));
   }

   #[test]
   fn test_select_one() {
      let stmt = select_one("comments", &sql("id = ?"), vec![Value::from(1)]).unwrap();
      assert_eq!(stmt.sql, "SELECT * FROM comments WHERE id = ? LIMIT 1");
      assert_eq!(stmt.values, vec![Value::Integer(1)]);
   }

   #[test]
   fn test_raw_passthrough() {
      let text = "UPDATE posts SET views = views + 1 WHERE id = 3";
      assert_eq!(raw(&sql(text)).sql, text);
   }

   #[test]
   fn test_limit_clamps_to_sqlite_integer() {
      let stmt = select_many("t", None, None, Limit::Rows(u64::MAX), 0).unwrap();
      assert_eq!(stmt.values[1], Value::Integer(i64::MAX));
   }
}
