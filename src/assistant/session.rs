// src/assistant/session.rs
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::{LanguageModel, ModelError, Turn};

/// Accumulated turns of one user's conversation.
#[derive(Debug, Clone)]
pub struct ChatSession {
    turns: Vec<Turn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Send `text` with the prior turns as context. The exchange is only
    /// kept if the model answers.
    pub async fn send_message(
        &mut self,
        model: &dyn LanguageModel,
        instructions: &str,
        text: &str,
    ) -> Result<String, ModelError> {
        self.turns.push(Turn::user(text));
        match model.generate(instructions, &self.turns).await {
            Ok(reply) => {
                self.turns.push(Turn::model(&reply));
                Ok(reply)
            }
            Err(e) => {
                self.turns.pop();
                Err(e)
            }
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedSession = Arc<Mutex<ChatSession>>;

/// One open session per email. The per-session mutex serializes questions
/// from the same user.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SharedSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session and whether it was created by this call.
    pub async fn get_or_create(&self, email: &str) -> (SharedSession, bool) {
        if let Some(session) = self.sessions.read().await.get(email) {
            return (session.clone(), false);
        }

        let mut sessions = self.sessions.write().await;
        // another request may have created it between the two locks
        if let Some(session) = sessions.get(email) {
            return (session.clone(), false);
        }
        let session = Arc::new(Mutex::new(ChatSession::new()));
        sessions.insert(email.to_string(), session.clone());
        (session, true)
    }

    /// Drop the user's session. Returns whether one existed.
    pub async fn reset(&self, email: &str) -> bool {
        self.sessions.write().await.remove(email).is_some()
    }

    /// Remove `session` for `email`, unless it was already replaced by a
    /// newer one.
    pub async fn discard(&self, email: &str, session: &SharedSession) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get(email) {
            Some(current) if Arc::ptr_eq(current, session) => {
                sessions.remove(email);
                true
            }
            _ => false,
        }
    }

    pub async fn contains(&self, email: &str) -> bool {
        self.sessions.read().await.contains_key(email)
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::testing::ScriptedModel;

    #[tokio::test]
    async fn test_get_or_create_returns_same_session() {
        let store = SessionStore::new();
        let (first, created) = store.get_or_create("ana@example.com").await;
        assert!(created);
        let (second, created) = store.get_or_create("ana@example.com").await;
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.active_sessions().await, 1);
    }

    #[tokio::test]
    async fn test_reset_reports_whether_memory_existed() {
        let store = SessionStore::new();
        assert!(!store.reset("ana@example.com").await);

        store.get_or_create("ana@example.com").await;
        assert!(store.reset("ana@example.com").await);
        assert!(!store.contains("ana@example.com").await);
    }

    #[tokio::test]
    async fn test_discard_leaves_newer_session_alone() {
        let store = SessionStore::new();
        let (old, _) = store.get_or_create("ana@example.com").await;
        store.reset("ana@example.com").await;
        let (fresh, _) = store.get_or_create("ana@example.com").await;

        assert!(!store.discard("ana@example.com", &old).await);
        assert!(store.contains("ana@example.com").await);
        assert!(store.discard("ana@example.com", &fresh).await);
        assert!(!store.contains("ana@example.com").await);
    }

    #[tokio::test]
    async fn test_turns_accumulate_only_on_success() {
        let model = ScriptedModel::new(vec![
            Ok("Come verduras".to_string()),
            Err(ModelError::EmptyResponse),
            Ok("Bebe agua".to_string()),
        ]);
        let mut session = ChatSession::new();

        session.send_message(&model, "rules", "consejo").await.unwrap();
        assert_eq!(session.turns().len(), 2);

        assert!(session.send_message(&model, "rules", "otro").await.is_err());
        assert_eq!(session.turns().len(), 2);

        session.send_message(&model, "rules", "y ahora").await.unwrap();
        assert_eq!(session.turns().len(), 4);
        // the third call saw both earlier turns plus the new question
        assert_eq!(model.seen_turn_counts(), vec![1, 3, 3]);
    }
}
