// src/assistant/mod.rs
//! Nutrition assistant: per-user conversations with a remote language model.

pub mod instructions;
pub mod session;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::store::{Store, StoreError};

pub use instructions::NUTRIAPP_INSTRUCTIONS;
pub use session::{ChatSession, SessionStore};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("HTTP error calling language model: {0}")]
    Http(reqwest::Error),
    #[error("Language model API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Prompt blocked by the language model: {0}")]
    Blocked(String),
    #[error("Language model returned no text")]
    EmptyResponse,
    #[error("Failed to decode language model response: {0}")]
    Decode(#[from] serde_json::Error),
}

// reqwest errors carry the request URL; drop it before the error goes anywhere
impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        ModelError::Http(err.without_url())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// A hosted conversational model: text turns in, reply text out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, system_instruction: &str, turns: &[Turn]) -> Result<String, ModelError>;

    fn model_name(&self) -> &str;
}

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Assistant {
    model: Arc<dyn LanguageModel>,
    sessions: SessionStore,
    instructions: String,
}

impl Assistant {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            sessions: SessionStore::new(),
            instructions: NUTRIAPP_INSTRUCTIONS.to_string(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Answer `text` in the user's conversation and persist the exchange.
    /// Any failure drops the conversation so the next question starts fresh.
    pub async fn ask(&self, store: &dyn Store, email: &str, text: &str) -> Result<String, AssistantError> {
        let (session, created) = self.sessions.get_or_create(email).await;
        if created {
            tracing::info!(user = %email, model = %self.model_name(), "💬 opened chat session");
        }

        let mut guard = session.lock().await;
        let outcome = match guard
            .send_message(self.model.as_ref(), &self.instructions, text)
            .await
        {
            Ok(reply) => store
                .record_chat(email, text, &reply)
                .await
                .map(|_| reply)
                .map_err(AssistantError::from),
            Err(e) => Err(AssistantError::from(e)),
        };
        drop(guard);

        if let Err(e) = &outcome {
            tracing::error!(user = %email, error = %e, "chat turn failed, discarding session");
        }
        if outcome.is_err() {
            self.sessions.discard(email, &session).await;
        }
        outcome
    }

    pub async fn reset(&self, email: &str) -> bool {
        let existed = self.sessions.reset(email).await;
        if existed {
            tracing::info!(user = %email, "🧹 chat session reset");
        }
        existed
    }
}
