//! # cbot-memory
//!
//! In-process conversation history, scoped per session. Each session owns an
//! ordered turn sequence behind a shared async lock; turns from one session
//! are never visible to another. Nothing is persisted across restarts.

use std::collections::HashMap;
use std::sync::Arc;

use cbot_core::ChatTurn;
use tokio::sync::RwLock;
use tracing::debug;

type SessionMap = HashMap<String, Vec<ChatTurn>>;

/// Session-keyed conversation store. Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<SessionMap>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(SessionMap::new())),
        }
    }

    /// Appends a turn to the session's history, creating the session on
    /// first use.
    pub async fn append(&self, session_id: &str, turn: ChatTurn) {
        let mut sessions = self.sessions.write().await;
        let history = sessions.entry(session_id.to_string()).or_default();
        history.push(turn);
        debug!(
            session_id = %session_id,
            turns = history.len(),
            "appended conversation turn"
        );
    }

    /// The session's full ordered history; empty for an unknown session.
    pub async fn history(&self, session_id: &str) -> Vec<ChatTurn> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned().unwrap_or_default()
    }

    /// Whether the session has no turns yet.
    pub async fn is_empty(&self, session_id: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).map_or(true, Vec::is_empty)
    }

    /// Drops the session's history.
    pub async fn clear(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
    }

    /// Number of sessions with at least one turn.
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
