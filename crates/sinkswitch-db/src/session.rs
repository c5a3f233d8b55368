//! SQLite-backed sessions.
//!
//! Reads run as single autocommit statements, so an open session holds no
//! lock while device commands run. Writes are buffered and committed in
//! one immediate transaction by [`SqliteSession::close`]; dropping the
//! session discards them.

use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use sinkswitch_core::error::StoreResult;
use sinkswitch_core::session::Session;
use tracing::debug;

use crate::Database;
use crate::error::DbResult;
use crate::queries::{read_system_value, write_system_value};

/// A session opened from a [`Database`].
#[derive(Debug)]
pub struct SqliteSession<'a> {
    conn: &'a mut Connection,
    id: String,
    pending: Vec<(String, String)>,
}

impl Database {
    /// Open a session, registering the id if it is not known yet.
    ///
    /// # Errors
    /// Returns an error if the session row cannot be written.
    pub fn open_session(&mut self, id: &str) -> DbResult<SqliteSession<'_>> {
        let created =
            self.conn.execute("INSERT OR IGNORE INTO sessions (id) VALUES (?)", params![id])?;
        if created == 0 {
            self.conn.execute(
                "UPDATE sessions SET last_access = datetime('now') WHERE id = ?",
                params![id],
            )?;
        }
        debug!(session = %id, created = created > 0, "Session opened");

        Ok(SqliteSession { conn: &mut self.conn, id: id.to_string(), pending: Vec::new() })
    }
}

impl SqliteSession<'_> {
    /// Commit the session's writes.
    ///
    /// # Errors
    /// Returns an error if the write lock cannot be taken or the commit fails.
    pub fn close(self) -> DbResult<()> {
        if self.pending.is_empty() {
            debug!(session = %self.id, "Session closed");
            return Ok(());
        }

        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        for (name, value) in &self.pending {
            tx.execute(
                r"INSERT INTO session_data (session_id, param, value) VALUES (?, ?, ?)
                  ON CONFLICT(session_id, param) DO UPDATE SET
                    value = excluded.value,
                    updated_at = datetime('now')",
                params![self.id, name, value],
            )?;
            write_system_value(&tx, name, value)?;
        }
        tx.commit()?;

        debug!(session = %self.id, writes = self.pending.len(), "Session closed");
        Ok(())
    }

    fn read(&self, name: &str) -> DbResult<Option<String>> {
        if let Some((_, value)) = self.pending.iter().find(|(field, _)| field == name) {
            return Ok(Some(value.clone()));
        }

        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM session_data WHERE session_id = ? AND param = ?",
                params![self.id, name],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(v) => Ok(Some(v)),
            None => read_system_value(self.conn, name),
        }
    }

    fn write(&mut self, name: &str, value: &str) {
        match self.pending.iter_mut().find(|(field, _)| field == name) {
            Some((_, slot)) => *slot = value.to_string(),
            None => self.pending.push((name.to_string(), value.to_string())),
        }
        debug!(session = %self.id, param = name, value, "Session field staged");
    }
}

impl Session for SqliteSession<'_> {
    fn id(&self) -> &str {
        &self.id
    }

    fn read_field(&self, name: &str) -> StoreResult<Option<String>> {
        Ok(self.read(name)?)
    }

    fn write_field(&mut self, name: &str, value: &str) -> StoreResult<()> {
        self.write(name, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn db_with_session(id: &str) -> Database {
        let db = Database::open_in_memory().unwrap();
        db.create_session(id).unwrap();
        db.set_active_session(id).unwrap();
        db
    }

    #[test]
    fn test_open_unknown_session_registers_it() {
        let mut db = Database::open_in_memory().unwrap();
        assert!(!db.session_exists("k3j2h1").unwrap());

        let session = db.open_session("k3j2h1").unwrap();
        assert_eq!(session.id(), "k3j2h1");
        assert_eq!(session.read_field("audioout").unwrap().as_deref(), Some("Local"));
        drop(session);

        assert!(db.session_exists("k3j2h1").unwrap());
    }

    #[test]
    fn test_read_falls_back_to_system_settings() {
        let mut db = db_with_session("s1");
        let session = db.open_session("s1").unwrap();

        assert_eq!(session.read_field("audioout").unwrap().as_deref(), Some("Local"));
        assert!(session.read_field("missing").unwrap().is_none());
    }

    #[test]
    fn test_write_then_close_persists_and_mirrors() {
        let mut db = db_with_session("s1");

        let mut session = db.open_session("s1").unwrap();
        session.write_field("audioout", "Bluetooth").unwrap();
        assert_eq!(session.read_field("audioout").unwrap().as_deref(), Some("Bluetooth"));
        session.close().unwrap();

        assert_eq!(db.system_value("audioout").unwrap().as_deref(), Some("Bluetooth"));

        let session = db.open_session("s1").unwrap();
        assert_eq!(session.read_field("audioout").unwrap().as_deref(), Some("Bluetooth"));
    }

    #[test]
    fn test_drop_without_close_discards_writes() {
        let mut db = db_with_session("s1");

        {
            let mut session = db.open_session("s1").unwrap();
            session.write_field("btsvc", "1").unwrap();
        }

        assert_eq!(db.system_value("btsvc").unwrap().as_deref(), Some("0"));
    }

    #[test]
    fn test_session_values_are_per_session() {
        let mut db = db_with_session("a");
        db.create_session("b").unwrap();

        let mut a = db.open_session("a").unwrap();
        a.write_field("note", "from-a").unwrap();
        a.close().unwrap();

        // Overwrite the mirrored system value so the fallback differs
        db.set_system_value("note", "system").unwrap();

        let a = db.open_session("a").unwrap();
        assert_eq!(a.read_field("note").unwrap().as_deref(), Some("from-a"));
        drop(a);

        let b = db.open_session("b").unwrap();
        assert_eq!(b.read_field("note").unwrap().as_deref(), Some("system"));
    }

    #[test]
    fn test_open_session_does_not_block_other_writers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.db");
        let mut db = Database::open_at(path.clone()).unwrap();
        db.create_session("s1").unwrap();

        let other = Connection::open(&path).unwrap();
        other.busy_timeout(Duration::from_millis(200)).unwrap();

        let mut session = db.open_session("s1").unwrap();
        assert_eq!(session.read_field("audioout").unwrap().as_deref(), Some("Local"));

        // The player UI writes while device commands are running
        other
            .execute("UPDATE cfg_system SET value = 'Bluetooth' WHERE param = 'audioout'", [])
            .unwrap();
        other.execute("UPDATE cfg_system SET value = '1' WHERE param = 'upnpsvc'", []).unwrap();

        session.write_field("audioout", "Local").unwrap();
        session.close().unwrap();

        assert_eq!(db.system_value("audioout").unwrap().as_deref(), Some("Local"));
        assert_eq!(db.system_value("upnpsvc").unwrap().as_deref(), Some("1"));
    }
}
