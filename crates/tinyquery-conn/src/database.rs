//! SQLite connection handle with an explicit open/close lifecycle

use std::fs::create_dir_all;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};

/// One live SQLite session shared by every operation issued through it.
///
/// ## State Management
///
/// - **`conn`**: The single connection, `None` once closed. The mutex
///   serializes statements so only one is ever in flight.
/// - **`closed`**: Prevents use after the handle has been closed
/// - **`path`**: Database file path, kept for diagnostics
///
/// ## Usage Pattern
///
/// ```text
/// 1. Connect (fails if the database cannot be opened)
/// 2. Acquire the connection for each statement; the guard releases it on drop
/// 3. Close explicitly when done; later acquisitions fail with DatabaseClosed
/// ```
#[derive(Debug)]
pub struct SqliteConnectionHandle {
   conn: Mutex<Option<SqliteConnection>>,
   closed: AtomicBool,
   path: PathBuf,
}

impl SqliteConnectionHandle {
   /// Open a connection to the database described by `config`.
   pub async fn connect(config: ConnectionConfig) -> Result<Self> {
      if config.create_if_missing
         && let Some(parent) = config.database.parent()
         && !parent.as_os_str().is_empty()
      {
         create_dir_all(parent)?;
      }

      let options = SqliteConnectOptions::new()
         .filename(&config.database)
         .create_if_missing(config.create_if_missing)
         .busy_timeout(config.busy_timeout)
         .foreign_keys(config.foreign_keys);

      let conn = options.connect().await.map_err(|source| Error::Connect {
         database: config.database.clone(),
         source,
      })?;

      debug!("Opened connection to {}", config.database.display());

      Ok(Self {
         conn: Mutex::new(Some(conn)),
         closed: AtomicBool::new(false),
         path: config.database,
      })
   }

   /// Acquire exclusive use of the connection for one statement.
   ///
   /// Waits while another statement holds the connection.
   pub async fn acquire(&self) -> Result<ConnectionGuard<'_>> {
      if self.is_closed() {
         return Err(Error::DatabaseClosed);
      }

      let slot = self.conn.lock().await;
      MutexGuard::try_map(slot, |conn| conn.as_mut())
         .map(|inner| ConnectionGuard { inner })
         .map_err(|_| Error::DatabaseClosed)
   }

   /// Close the connection. Closing an already closed handle is an error.
   pub async fn close(&self) -> Result<()> {
      if self.closed.swap(true, Ordering::SeqCst) {
         return Err(Error::DatabaseClosed);
      }

      let conn = self.conn.lock().await.take();
      if let Some(conn) = conn {
         conn.close().await?;
      }

      debug!("Closed connection to {}", self.path.display());
      Ok(())
   }

   /// Whether [`close`](Self::close) has been called
   pub fn is_closed(&self) -> bool {
      self.closed.load(Ordering::SeqCst)
   }

   /// Path of the database file this handle was opened on
   pub fn path(&self) -> &Path {
      &self.path
   }
}

/// Exclusive access to the handle's connection, released on drop.
///
/// Derefs to [`SqliteConnection`], so `&mut *guard` can be handed to any
/// sqlx executor.
#[must_use = "if unused the connection is released immediately"]
pub struct ConnectionGuard<'a> {
   inner: MappedMutexGuard<'a, SqliteConnection>,
}

impl Deref for ConnectionGuard<'_> {
   type Target = SqliteConnection;

   fn deref(&self) -> &Self::Target {
      &self.inner
   }
}

impl DerefMut for ConnectionGuard<'_> {
   fn deref_mut(&mut self) -> &mut Self::Target {
      &mut self.inner
   }
}
