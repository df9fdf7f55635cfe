//! Connection management for the history file

use crate::{schema, DbResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

/// Handle on the history database.
///
/// rusqlite connections are synchronous and not Sync, so the connection
/// lives behind a mutex and async callers hop through `spawn_blocking`.
/// Cloning shares the same connection.
#[derive(Clone)]
pub struct HistoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl HistoryStore {
    /// Open the history file, creating it and the schema as needed
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(&path)?;
        conn.execute_batch(schema::CREATE_HISTORY_TABLE)?;
        info!(path = %path.as_ref().display(), "History database ready");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("history store lock poisoned")
    }
}
