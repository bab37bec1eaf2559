/// Result type alias for tinyquery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`].
///
/// Lets callers tell a programming mistake (argument shape, prepare failure)
/// apart from a legitimate runtime failure of a well-formed statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
   /// Opening, using or closing the connection failed.
   Connection,
   /// Arguments did not have the shape the operation requires.
   ArgumentShape,
   /// The generated SQL could not be prepared.
   Prepare,
   /// A prepared statement failed while executing or decoding.
   Execute,
}

/// Error types for tinyquery operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from the connection handle.
   #[error(transparent)]
   Connection(#[from] tinyquery_conn::Error),

   /// Insert and update need at least one column.
   #[error("{operation} requires at least one column")]
   EmptyColumns { operation: &'static str },

   /// Column count does not match value count.
   #[error("{columns} columns but {values} values")]
   ColumnValueMismatch { columns: usize, values: usize },

   /// Type-tag count does not match value count.
   #[error("{tags} type tags but {values} values")]
   TagValueMismatch { tags: usize, values: usize },

   /// Type tag outside `s`, `i`, `d`, `b`.
   #[error("unknown type tag '{0}': expected one of s, i, d, b")]
   UnknownTypeTag(char),

   /// A tag list entry that is not exactly one character.
   #[error("type tag '{0}' must be exactly one character")]
   MalformedTypeTag(String),

   /// Value does not fit the type its tag declares.
   #[error("value at position {position} is {found}, which does not fit type tag '{tag}'")]
   WrongValueKind {
      position: usize,
      tag: char,
      found: &'static str,
   },

   /// A condition fragment is required but was blank.
   #[error("{operation} requires a non-empty condition")]
   EmptyCondition { operation: &'static str },

   /// An ORDER BY fragment was supplied but was blank.
   #[error("order fragment must not be empty")]
   EmptyOrder,

   /// Limit text that is neither `*` nor a non-negative integer.
   #[error("invalid limit '{0}': expected '*' or a non-negative integer")]
   InvalidLimit(String),

   /// Prepared statement placeholder count does not match value count.
   #[error("statement has {placeholders} placeholders but {values} values were supplied")]
   PlaceholderMismatch { placeholders: usize, values: usize },

   /// The generated SQL could not be prepared.
   #[error("failed to prepare `{sql}`: {source}")]
   Prepare {
      sql: String,
      #[source]
      source: sqlx::Error,
   },

   /// The prepared statement failed to execute.
   #[error("failed to execute `{sql}`: {source}")]
   Execute {
      sql: String,
      #[source]
      source: sqlx::Error,
   },

   /// A returned column could not be decoded.
   #[error("failed to decode column '{column}': {source}")]
   Decode {
      column: String,
      #[source]
      source: sqlx::error::BoxDynError,
   },

   /// SQLite type that cannot be mapped to JSON.
   #[error("unsupported datatype: {0}")]
   UnsupportedDatatype(String),
}

impl Error {
   /// Category of this error.
   pub fn kind(&self) -> ErrorKind {
      match self {
         Error::Connection(_) => ErrorKind::Connection,
         Error::EmptyColumns { .. }
         | Error::ColumnValueMismatch { .. }
         | Error::TagValueMismatch { .. }
         | Error::UnknownTypeTag(_)
         | Error::MalformedTypeTag(_)
         | Error::WrongValueKind { .. }
         | Error::EmptyCondition { .. }
         | Error::EmptyOrder
         | Error::InvalidLimit(_)
         | Error::PlaceholderMismatch { .. } => ErrorKind::ArgumentShape,
         Error::Prepare { .. } => ErrorKind::Prepare,
         Error::Execute { .. } | Error::Decode { .. } | Error::UnsupportedDatatype(_) => {
            ErrorKind::Execute
         }
      }
   }

   /// Extract a structured error code from the error type.
   ///
   /// Driver errors that carry a SQLite result code are reported as
   /// `SQLITE_<code>`.
   pub fn error_code(&self) -> String {
      match self {
         Error::Connection(tinyquery_conn::Error::DatabaseClosed) => "DATABASE_CLOSED".to_string(),
         Error::Connection(_) => "CONNECTION_ERROR".to_string(),
         Error::EmptyColumns { .. } => "EMPTY_COLUMNS".to_string(),
         Error::ColumnValueMismatch { .. } => "COLUMN_VALUE_MISMATCH".to_string(),
         Error::TagValueMismatch { .. } => "TAG_VALUE_MISMATCH".to_string(),
         Error::UnknownTypeTag(_) => "UNKNOWN_TYPE_TAG".to_string(),
         Error::MalformedTypeTag(_) => "MALFORMED_TYPE_TAG".to_string(),
         Error::WrongValueKind { .. } => "WRONG_VALUE_KIND".to_string(),
         Error::EmptyCondition { .. } => "EMPTY_CONDITION".to_string(),
         Error::EmptyOrder => "EMPTY_ORDER".to_string(),
         Error::InvalidLimit(_) => "INVALID_LIMIT".to_string(),
         Error::PlaceholderMismatch { .. } => "PLACEHOLDER_MISMATCH".to_string(),
         Error::Prepare { source, .. } => {
            sqlite_code(source).unwrap_or_else(|| "PREPARE_FAILED".to_string())
         }
         Error::Execute { source, .. } => {
            sqlite_code(source).unwrap_or_else(|| "EXECUTE_FAILED".to_string())
         }
         Error::Decode { .. } => "DECODE_FAILED".to_string(),
         Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE".to_string(),
      }
   }
}

fn sqlite_code(err: &sqlx::Error) -> Option<String> {
   err.as_database_error()
      .and_then(|db_err| db_err.code())
      .map(|code| format!("SQLITE_{}", code))
}
