//! Fill fan-out to session outbound queues
//!
//! Maps each registered session to a bounded fill channel owned by that
//! session's writer. Delivery never blocks the matcher: a full queue
//! forcibly disconnects the lagging session, a closed one is pruned
//! silently, and an unregistered session is simply skipped.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use types::fill::Fill;
use types::ids::SessionId;

/// Registry of per-session outbound fill channels.
#[derive(Debug, Default)]
pub struct FillNotifier {
    channels: DashMap<SessionId, mpsc::Sender<Fill>>,
}

impl FillNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace the outbound channel for a session.
    pub fn register(&self, session: SessionId, outbound: mpsc::Sender<Fill>) {
        self.channels.insert(session, outbound);
    }

    /// Remove a session's channel; undelivered fills are dropped with it.
    pub fn unregister(&self, session: SessionId) {
        self.channels.remove(&session);
    }

    pub fn is_registered(&self, session: SessionId) -> bool {
        self.channels.contains_key(&session)
    }

    /// Deliver one fill to the maker's session and, if different, the
    /// taker's session.
    pub fn notify(&self, fill: &Fill) {
        self.deliver(fill.maker_session, fill);
        if fill.taker_session != fill.maker_session {
            self.deliver(fill.taker_session, fill);
        }
    }

    fn deliver(&self, session: SessionId, fill: &Fill) {
        let Some(outbound) = self.channels.get(&session) else {
            return;
        };
        match outbound.try_send(fill.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                // Dropping the sender closes the session's writer, which
                // tears the connection down.
                drop(outbound);
                self.channels.remove(&session);
                tracing::warn!(
                    session = session.as_u64(),
                    "outbound fill queue full, disconnecting session"
                );
            }
            Err(TrySendError::Closed(_)) => {
                drop(outbound);
                self.channels.remove(&session);
            }
        }
    }
}
