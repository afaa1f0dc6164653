use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use civic_agent::agent::Agent;
use civic_agent::schemes::SchemeStore;
use civic_agent::translate::Language;

/// One chat exchange, kept for display only.
#[derive(Debug, Clone)]
pub struct AgentTurn {
    pub query: String,
    pub language: Language,
    pub reply: String,
    pub asked_at: DateTime<Utc>,
}

/// Turns kept per session; older ones fall off the front.
pub const MAX_TURNS: usize = 20;

/// Everything one user's chat owns. Never shared between users.
#[derive(Debug, Default)]
pub struct ChatSession {
    pub transcript: VecDeque<AgentTurn>,
}

impl ChatSession {
    pub fn record(&mut self, query: &str, language: Language, reply: &str) {
        if self.transcript.len() == MAX_TURNS {
            self.transcript.pop_front();
        }
        self.transcript.push_back(AgentTurn {
            query: query.to_string(),
            language,
            reply: reply.to_string(),
            asked_at: Utc::now(),
        });
    }
}

/// Per-user sessions keyed by Discord user id.
///
/// Handlers hold the session lock for the whole interaction, so a user's
/// messages are answered one at a time.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<u64, Arc<Mutex<ChatSession>>>>,
}

impl SessionStore {
    pub async fn session(&self, user_id: u64) -> Arc<Mutex<ChatSession>> {
        let mut sessions = self.sessions.lock().await;
        sessions.entry(user_id).or_default().clone()
    }

    /// Drop a user's transcript.
    pub async fn reset(&self, user_id: u64) {
        self.sessions.lock().await.remove(&user_id);
    }
}

pub struct AppState {
    pub store: Arc<SchemeStore>,
    pub agent: Arc<Agent>,
    pub sessions: SessionStore,
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::default();
        store
            .session(1)
            .await
            .lock()
            .await
            .record("health schemes?", Language::English, "PM-JAY");

        assert_eq!(store.session(1).await.lock().await.transcript.len(), 1);
        assert!(store.session(2).await.lock().await.transcript.is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_only_that_user() {
        let store = SessionStore::default();
        for user in [1, 2] {
            let session = store.session(user).await;
            session.lock().await.record("q", Language::Hindi, "a");
        }

        store.reset(1).await;

        assert!(store.session(1).await.lock().await.transcript.is_empty());
        assert_eq!(store.session(2).await.lock().await.transcript.len(), 1);
    }

    #[test]
    fn test_transcript_keeps_latest_turns() {
        let mut session = ChatSession::default();
        for i in 0..MAX_TURNS + 5 {
            session.record(&format!("question {i}"), Language::English, "answer");
        }
        assert_eq!(session.transcript.len(), MAX_TURNS);
        assert_eq!(session.transcript.front().unwrap().query, "question 5");
        assert_eq!(
            session.transcript.back().unwrap().query,
            format!("question {}", MAX_TURNS + 4)
        );
    }
}
