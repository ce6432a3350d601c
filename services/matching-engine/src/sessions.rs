//! Session registry and authentication surface
//!
//! Tracks connected sessions and the principal each one authenticated as.
//! The credential check is a plain equality comparison against the stored
//! password; a real verifier would slot in behind the same interface.

use dashmap::DashMap;
use types::ids::SessionId;

#[derive(Debug, Default)]
struct SessionState {
    principal: Option<String>,
}

/// Concurrent registry of credentials and live session state.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    credentials: DashMap<String, String>,
    sessions: DashMap<SessionId, SessionState>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace a user credential.
    pub fn add_user(&self, user: impl Into<String>, password: impl Into<String>) {
        self.credentials.insert(user.into(), password.into());
    }

    /// Record a new transport connection in the `connected` state.
    pub fn connect(&self, session: SessionId) {
        self.sessions.insert(session, SessionState::default());
        tracing::debug!(session = session.as_u64(), "session connected");
    }

    /// Attempt to authenticate a session.
    ///
    /// A repeated login on an already-authenticated session is permitted
    /// and replaces the principal.
    pub fn login(&self, session: SessionId, user: &str, password: &str) -> bool {
        let ok = self
            .credentials
            .get(user)
            .map(|stored| stored.value() == password)
            .unwrap_or(false);
        if ok {
            self.sessions.entry(session).or_default().principal = Some(user.to_string());
            tracing::info!(session = session.as_u64(), user, "session authenticated");
        } else {
            tracing::warn!(session = session.as_u64(), user, "authentication failed");
        }
        ok
    }

    /// Whether the session holds an authenticated principal.
    pub fn is_authenticated(&self, session: SessionId) -> bool {
        self.sessions
            .get(&session)
            .map(|state| state.principal.is_some())
            .unwrap_or(false)
    }

    /// The principal the session authenticated as, if any.
    pub fn principal(&self, session: SessionId) -> Option<String> {
        self.sessions
            .get(&session)
            .and_then(|state| state.principal.clone())
    }

    /// Drop all state for a closed session.
    pub fn disconnect(&self, session: SessionId) {
        self.sessions.remove(&session);
        tracing::debug!(session = session.as_u64(), "session closed");
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
