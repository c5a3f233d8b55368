//! Session-scoped key/value state.
//!
//! A session is opened for one invocation, read and written through the
//! [`Session`] trait, then closed by its owner. Controllers never open or
//! close sessions themselves.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Field holding the active output.
pub const AUDIO_OUT_FIELD: &str = "audioout";

/// An open session in the state store.
pub trait Session {
    /// Session identifier.
    fn id(&self) -> &str;

    /// Read a field, `None` if it was never written.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    fn read_field(&self, name: &str) -> StoreResult<Option<String>>;

    /// Write a field, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    fn write_field(&mut self, name: &str, value: &str) -> StoreResult<()>;
}

/// In-memory session store.
///
/// Writes made through a [`MemorySession`] become visible to other
/// sessions only when it is closed, matching the SQLite store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session if it does not exist yet.
    pub fn create_session(&self, id: &str) {
        self.sessions.lock().entry(id.to_string()).or_default();
    }

    /// Check whether a session exists.
    #[must_use]
    pub fn session_exists(&self, id: &str) -> bool {
        self.sessions.lock().contains_key(id)
    }

    /// Read a committed field without opening the session.
    #[must_use]
    pub fn field(&self, id: &str, name: &str) -> Option<String> {
        self.sessions.lock().get(id).and_then(|fields| fields.get(name).cloned())
    }

    /// Open an existing session.
    ///
    /// # Errors
    /// Returns [`StoreError::SessionNotFound`] if the session does not exist.
    pub fn open(&self, id: &str) -> StoreResult<MemorySession<'_>> {
        let fields = self
            .sessions
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::SessionNotFound(id.to_string()))?;

        Ok(MemorySession { store: self, id: id.to_string(), fields, pending: Vec::new() })
    }
}

/// A session opened from a [`MemoryStore`].
///
/// Dropping it without calling [`MemorySession::close`] discards its writes.
#[derive(Debug)]
pub struct MemorySession<'a> {
    store: &'a MemoryStore,
    id: String,
    fields: HashMap<String, String>,
    pending: Vec<(String, String)>,
}

impl MemorySession<'_> {
    /// Number of writes not yet committed.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Commit pending writes to the store.
    pub fn close(self) {
        let mut sessions = self.store.sessions.lock();
        let fields = sessions.entry(self.id.clone()).or_default();
        debug!(session = %self.id, writes = self.pending.len(), "Closing session");
        for (name, value) in self.pending {
            fields.insert(name, value);
        }
    }
}

impl Session for MemorySession<'_> {
    fn id(&self) -> &str {
        &self.id
    }

    fn read_field(&self, name: &str) -> StoreResult<Option<String>> {
        Ok(self.fields.get(name).cloned())
    }

    fn write_field(&mut self, name: &str, value: &str) -> StoreResult<()> {
        self.fields.insert(name.to_string(), value.to_string());
        self.pending.push((name.to_string(), value.to_string()));
        Ok(())
    }
}
