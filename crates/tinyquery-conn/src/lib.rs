//! # tinyquery-conn
//!
//! The connection handle underneath `tinyquery`: exactly one SQLx SQLite
//! connection with an explicit open/close lifecycle.
//!
//! ## Core Types
//!
//! - **[`SqliteConnectionHandle`]**: Owns the connection and its open/closed state
//! - **[`ConnectionGuard`]**: RAII guard giving one statement exclusive use of the connection
//! - **[`ConnectionConfig`]**: Database path and connect options
//! - **[`Error`]**: Error type for connection operations
//!
//! ## Architecture
//!
//! - **Single connection**: No pooling; statements on one handle are serialized
//! - **Explicit close**: Acquiring after `close()` fails with [`Error::DatabaseClosed`]

mod config;
mod database;
mod error;

// Re-export public types
pub use config::ConnectionConfig;
pub use database::{ConnectionGuard, SqliteConnectionHandle};
pub use error::{Error, Result};
