// src/store/mod.rs
//! Persistence for users and chat history.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{auth::User, chat::ChatRecord};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("A user with email {0} already exists")]
    Duplicate(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] if the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn record_chat(
        &self,
        email: &str,
        user_message: &str,
        model_response: &str,
    ) -> Result<ChatRecord, StoreError>;

    /// Most recent exchanges first.
    async fn chat_history(&self, email: &str, limit: i64) -> Result<Vec<ChatRecord>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    fn backend_name(&self) -> &'static str;
}
