// lib.rs - NutriApp backend: auth, nutrition assistant and calorie regression
pub mod assistant;
pub mod config;
pub mod db;
pub mod error;
pub mod gemini_client;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod regression;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::assistant::Assistant;
use crate::config::Config;
use crate::regression::ModelRegistry;
use crate::store::Store;

// AppState owns everything shared between requests: the store, the
// assistant with its session map, and the calorie model registry
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub assistant: Option<Assistant>,
    pub regression: ModelRegistry,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>, assistant: Option<Assistant>) -> Self {
        Self {
            config,
            store,
            assistant,
            regression: ModelRegistry::new(),
        }
    }
}

/// All routes with logging and a permissive CORS policy.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(handlers::status::status_routes())
        .merge(handlers::auth::auth_routes())
        .merge(handlers::chat::chat_routes())
        .merge(handlers::ml::ml_routes())
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
