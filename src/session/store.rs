//! In-memory session store
//!
//! Each session sits behind its own async mutex, so turns of one session
//! run one at a time while different sessions proceed independently.

use super::Session;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, session_id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&session_id).cloned()
    }

    pub async fn get_or_create(&self, session_id: Uuid) -> SharedSession {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(&session_id) {
                return session.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id)
            .or_insert_with(|| {
                info!(session_id = %session_id, "Session created");
                Arc::new(Mutex::new(Session::new(session_id)))
            })
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
