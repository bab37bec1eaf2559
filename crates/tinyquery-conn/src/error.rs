//! Error types for tinyquery-conn

use std::path::PathBuf;

use thiserror::Error;

/// Errors that may occur while opening, using or closing a connection handle
#[derive(Error, Debug)]
pub enum Error {
   /// The connection to the database could not be established
   #[error("failed establishing database connection to {}: {source}", .database.display())]
   Connect {
      database: PathBuf,
      #[source]
      source: sqlx::Error,
   },

   /// IO error when preparing the database location. Standard library IO
   /// errors are converted to this variant.
   #[error("IO error: {0}")]
   Io(#[from] std::io::Error),

   /// Error from the sqlx library while closing the connection
   #[error("Sqlx error: {0}")]
   Sqlx(#[from] sqlx::Error),

   /// Connection has been closed and cannot be used
   #[error("Database has been closed")]
   DatabaseClosed,
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
