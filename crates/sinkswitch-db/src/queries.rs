//! Database query functions.

use rusqlite::{Connection, OptionalExtension, params};

use crate::{Database, DbResult};

/// System setting holding the active session id.
pub const SESSION_ID_PARAM: &str = "sessionid";

/// Read a system setting. NULL and missing both read as `None`.
pub(crate) fn read_system_value(conn: &Connection, param: &str) -> DbResult<Option<String>> {
    let value: Option<Option<String>> = conn
        .query_row(
            "SELECT value FROM cfg_system WHERE param = ? ORDER BY id LIMIT 1",
            params![param],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value.flatten())
}

/// Write a system setting, inserting it if absent.
pub(crate) fn write_system_value(conn: &Connection, param: &str, value: &str) -> DbResult<()> {
    let updated =
        conn.execute("UPDATE cfg_system SET value = ? WHERE param = ?", params![value, param])?;
    if updated == 0 {
        conn.execute("INSERT INTO cfg_system (param, value) VALUES (?, ?)", params![param, value])?;
    }
    Ok(())
}

pub(crate) fn session_exists(conn: &Connection, id: &str) -> DbResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sessions WHERE id = ?)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

impl Database {
    /// Get the active session id, `None` if unset or empty.
    pub fn active_session_id(&self) -> DbResult<Option<String>> {
        let id = read_system_value(&self.conn, SESSION_ID_PARAM)?;
        Ok(id.filter(|s| !s.trim().is_empty()))
    }

    /// Mark a session as the active one.
    pub fn set_active_session(&self, id: &str) -> DbResult<()> {
        write_system_value(&self.conn, SESSION_ID_PARAM, id)
    }

    /// Check whether a session exists.
    pub fn session_exists(&self, id: &str) -> DbResult<bool> {
        session_exists(&self.conn, id)
    }

    /// Create a session if it does not exist yet.
    pub fn create_session(&self, id: &str) -> DbResult<()> {
        self.conn.execute("INSERT OR IGNORE INTO sessions (id) VALUES (?)", params![id])?;
        Ok(())
    }

    /// Read a system setting.
    pub fn system_value(&self, param: &str) -> DbResult<Option<String>> {
        read_system_value(&self.conn, param)
    }

    /// Write a system setting.
    pub fn set_system_value(&self, param: &str, value: &str) -> DbResult<()> {
        write_system_value(&self.conn, param, value)
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    #[test]
    fn test_no_active_session_by_default() {
        let db = test_db();
        assert!(db.active_session_id().unwrap().is_none());
    }

    #[test]
    fn test_set_active_session() {
        let db = test_db();
        db.set_active_session("abc123").unwrap();
        assert_eq!(db.active_session_id().unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_blank_session_id_is_none() {
        let db = test_db();
        db.set_active_session("   ").unwrap();
        assert!(db.active_session_id().unwrap().is_none());
    }

    #[test]
    fn test_create_session_is_idempotent() {
        let db = test_db();
        assert!(!db.session_exists("s1").unwrap());

        db.create_session("s1").unwrap();
        db.create_session("s1").unwrap();

        assert!(db.session_exists("s1").unwrap());
    }

    #[test]
    fn test_system_value_upsert() {
        let db = test_db();
        assert_eq!(db.system_value("audioout").unwrap().as_deref(), Some("Local"));

        db.set_system_value("audioout", "Bluetooth").unwrap();
        assert_eq!(db.system_value("audioout").unwrap().as_deref(), Some("Bluetooth"));

        assert!(db.system_value("volknob").unwrap().is_none());
        db.set_system_value("volknob", "30").unwrap();
        assert_eq!(db.system_value("volknob").unwrap().as_deref(), Some("30"));
    }
}
