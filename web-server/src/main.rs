//! PhishGuard Web Server
//!
//! HTTP front for the URL classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    PHISHGUARD WEB                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────────────────────────────┐   │
//! │  │  Router    │──►│  Detector (phishguard-core)      │   │
//! │  │  (Axum)    │   │  extract → classify → history    │   │
//! │  └────────────┘   └────────────────┬─────────────────┘   │
//! │                                    ▼                     │
//! │                         ┌────────────────────┐           │
//! │                         │  Model manifest    │           │
//! │                         │  (loaded once)     │           │
//! │                         └────────────────────┘           │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use phishguard_core::Detector;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    init_tracing(&config);

    tracing::info!("PhishGuard web server starting...");
    tracing::info!("Model manifest: {}", config.detector.model_path.display());

    // No model, no service
    let detector = Detector::from_config(&config.detector).with_context(|| {
        format!(
            "failed to load model from {}",
            config.detector.model_path.display()
        )
    })?;

    let state = AppState {
        detector: Arc::new(detector),
        config: config.clone(),
    };

    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_log_filter().into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<Detector>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/", post(handlers::classify::submit_form))
        .route("/api/v1/classify", post(handlers::classify::classify))
        .route("/api/v1/history", get(handlers::history::list))
        .route("/api/v1/model", get(handlers::model::info))
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
