// src/store/memory.rs
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::models::{auth::User, chat::ChatRecord};

/// Process-local store. Used when no `DATABASE_URL` is configured; contents
/// are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    chats: RwLock<Vec<ChatRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(StoreError::Duplicate(email.to_string()));
        }

        let user = User {
            id: users.len() as i32 + 1,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(email.to_string(), user.clone());
        Ok(user)
    }

    async fn record_chat(
        &self,
        email: &str,
        user_message: &str,
        model_response: &str,
    ) -> Result<ChatRecord, StoreError> {
        let mut chats = self.chats.write().await;
        let record = ChatRecord {
            id: chats.len() as i32 + 1,
            user_email: email.to_string(),
            user_message: user_message.to_string(),
            model_response: model_response.to_string(),
            created_at: Utc::now(),
        };
        chats.push(record.clone());
        Ok(record)
    }

    async fn chat_history(&self, email: &str, limit: i64) -> Result<Vec<ChatRecord>, StoreError> {
        let chats = self.chats.read().await;
        Ok(chats
            .iter()
            .rev()
            .filter(|record| record.user_email == email)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
