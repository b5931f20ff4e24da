// src/test_support.rs
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::assistant::{testing::ScriptedModel, Assistant, ModelError};
use crate::config::Config;
use crate::models::{auth::User, chat::ChatRecord};
use crate::store::{MemoryStore, Store, StoreError};
use crate::{app, AppState};

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("test-secret".to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn state_with_replies(replies: Vec<Result<String, ModelError>>) -> Arc<AppState> {
    let assistant = Assistant::new(Arc::new(ScriptedModel::new(replies)));
    Arc::new(AppState::new(
        test_config(),
        Arc::new(MemoryStore::new()),
        Some(assistant),
    ))
}

/// Delegates to a `MemoryStore` but cannot save chat exchanges.
#[derive(Default)]
pub struct UnwritableHistoryStore {
    inner: MemoryStore,
}

#[async_trait]
impl Store for UnwritableHistoryStore {
    async fn find_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.inner.find_user(email).await
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        self.inner.create_user(email, password_hash).await
    }

    async fn record_chat(&self, _: &str, _: &str, _: &str) -> Result<ChatRecord, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn chat_history(&self, email: &str, limit: i64) -> Result<Vec<ChatRecord>, StoreError> {
        self.inner.chat_history(email, limit).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }

    fn backend_name(&self) -> &'static str {
        "unwritable"
    }
}

pub fn state_with_store(store: Arc<dyn Store>, replies: Vec<Result<String, ModelError>>) -> Arc<AppState> {
    let assistant = Assistant::new(Arc::new(ScriptedModel::new(replies)));
    Arc::new(AppState::new(test_config(), store, Some(assistant)))
}

pub fn state_without_assistant() -> Arc<AppState> {
    Arc::new(AppState::new(test_config(), Arc::new(MemoryStore::new()), None))
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    bearer: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn post_json(state: &Arc<AppState>, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app(state.clone()), Method::POST, uri, Some(body), None).await
}

pub async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    send(app(state.clone()), Method::GET, uri, None, None).await
}
