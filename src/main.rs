use std::sync::Arc;

use nutriapp_backend::assistant::Assistant;
use nutriapp_backend::config::Config;
use nutriapp_backend::gemini_client::GeminiClient;
use nutriapp_backend::store::{MemoryStore, PgStore, Store};
use nutriapp_backend::{app, db, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging()?;

    let config = Config::load()?;
    log_startup(&config);

    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(db_url) => {
            tracing::info!("Connecting to PostgreSQL...");
            let pool = db::create_pool(db_url, config.db_max_connections).await?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set. Users and chat history will be kept in memory only.");
            Arc::new(MemoryStore::new())
        }
    };

    let assistant = match config.gemini_api_key.clone() {
        Some(api_key) => {
            tracing::info!("Initializing Gemini AI client ({})...", config.gemini_model);
            let mut client = GeminiClient::new(api_key, config.gemini_model.clone());
            if let Some(base_url) = config.gemini_base_url.as_deref() {
                client = client.with_base_url(base_url);
            }
            Some(Assistant::new(Arc::new(client)))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not found. /preguntar will answer 503.");
            None
        }
    };

    let bind_address = config.bind_address();
    let shared_state = Arc::new(AppState::new(config, store, assistant));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(
        listener,
        app(shared_state).into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("NutriApp backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

const DEFAULT_FILTER: &str = "info,nutriapp_backend=debug,sqlx=warn,hyper=warn";

/// RUST_LOG overrides the default filter; LOG_FORMAT=json switches to JSON lines.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(DEFAULT_FILTER)?,
    };

    let fmt_layer = match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => fmt::layer().json().with_current_span(true).boxed(),
        _ => fmt::layer().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
    Ok(())
}

fn log_startup(config: &Config) {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = if cfg!(debug_assertions) { "development" } else { "production" },
        "🥗 NutriApp backend starting up"
    );
    tracing::info!(
        database = config.database_url.is_some(),
        gemini = config.gemini_api_key.is_some(),
        model = %config.gemini_model,
        bind = %config.bind_address(),
        "configuration loaded"
    );
    if config.uses_default_jwt_secret() {
        tracing::warn!("JWT_SECRET not set, using an insecure development secret");
    }
}
