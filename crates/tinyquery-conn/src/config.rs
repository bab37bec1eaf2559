//! Configuration for the SQLite connection handle

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Configuration for a [`SqliteConnectionHandle`](crate::SqliteConnectionHandle)
///
/// # Examples
///
/// ```
/// use tinyquery_conn::ConnectionConfig;
/// use std::time::Duration;
///
/// // Point at a database file, keep the remaining defaults
/// let config = ConnectionConfig::new("app.db");
///
/// // Override a single field
/// let config = ConnectionConfig {
///     busy_timeout: Duration::from_secs(1),
///     ..ConnectionConfig::new("app.db")
/// };
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
   /// Path to the database file
   pub database: PathBuf,

   /// Create the database file (and its parent directories) when missing
   ///
   /// Default: true
   pub create_if_missing: bool,

   /// How long a statement waits on a locked database before failing
   ///
   /// Default: 5 seconds
   pub busy_timeout: Duration,

   /// Enforce `FOREIGN KEY` constraints on this connection
   ///
   /// Default: true
   pub foreign_keys: bool,
}

impl ConnectionConfig {
   /// Configuration for the database at `database` with default options.
   pub fn new(database: impl Into<PathBuf>) -> Self {
      Self {
         database: database.into(),
         ..Default::default()
      }
   }
}

impl Default for ConnectionConfig {
   fn default() -> Self {
      Self {
         database: PathBuf::new(),
         create_if_missing: true,
         busy_timeout: Duration::from_secs(5),
         foreign_keys: true,
      }
   }
}
