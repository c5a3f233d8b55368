//! Sinkswitch Database - SQLite session state store.
//!
//! System settings live in `cfg_system` (the active session id among
//! them); per-session values live in `session_data`. Session writes are
//! mirrored into `cfg_system` so other readers of the system settings see
//! the current output and renderer flags.

pub mod error;
pub mod migrations;
pub mod queries;
pub mod schema;
pub mod session;

pub use error::{DbError, DbResult};
pub use session::SqliteSession;

use directories::ProjectDirs;
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// How long to wait for another process holding the database lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database handle for Sinkswitch.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at a specific path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open_at(path: PathBuf) -> DbResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!(?path, "Opening database");
        let conn = Connection::open(&path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let mut db = Self { conn };
        db.run_migrations()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn open_in_memory() -> DbResult<Self> {
        debug!("Opening in-memory database");
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let mut db = Self { conn };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the default database path.
    ///
    /// # Errors
    /// Returns an error if no data directory can be determined.
    pub fn default_path() -> DbResult<PathBuf> {
        let dirs =
            ProjectDirs::from("org", "sinkswitch", "Sinkswitch").ok_or(DbError::NoDataDir)?;
        Ok(dirs.data_dir().join("sinkswitch.db"))
    }

    /// Run database migrations.
    fn run_migrations(&mut self) -> DbResult<()> {
        migrations::run(&mut self.conn)
    }
}
