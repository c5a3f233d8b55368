//! Database schema definition.

/// Initial schema (version 1).
pub const SCHEMA_V1: &str = r"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- System-wide settings, including the active session id
CREATE TABLE IF NOT EXISTS cfg_system (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    param TEXT NOT NULL UNIQUE,
    value TEXT
);

-- Known sessions
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    last_access TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Per-session values
CREATE TABLE IF NOT EXISTS session_data (
    session_id TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
    param TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (session_id, param)
);

CREATE INDEX IF NOT EXISTS idx_session_data_session ON session_data(session_id);
";

/// Default data to insert after schema creation.
///
/// Written so it is safe on an existing player database where `param` may
/// not be declared unique.
pub const DEFAULT_DATA: &str = r"
INSERT INTO cfg_system (param, value)
    SELECT d.param, d.value FROM (
        SELECT 'sessionid' AS param, '' AS value
        UNION ALL SELECT 'audioout', 'Local'
        UNION ALL SELECT 'btsvc', '0'
        UNION ALL SELECT 'airplaysvc', '0'
        UNION ALL SELECT 'upnpsvc', '0'
    ) d
    WHERE NOT EXISTS (SELECT 1 FROM cfg_system c WHERE c.param = d.param);
";
