pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;
pub mod store;

pub use store::Store;

use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A unique column (student id, email) already holds this value.
    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error("database lock poisoned")]
    Lock,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// SQLite-backed entity store. One connection behind a mutex; every
/// read-modify-write happens under the same lock.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Process-lifetime store: everything is gone on restart.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        migrations::run(&conn)?;

        info!("In-memory database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|_| DbError::Lock)?;
        f(&conn)
    }
}
