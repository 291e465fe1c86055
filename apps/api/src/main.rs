mod auth;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod screening;
mod state;
mod timeline;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::FirebaseAuthVerifier;
use crate::config::Config;
use crate::extraction::PdfTextExtractor;
use crate::llm_client::GeminiClient;
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;
use crate::timeline::TimelineAnalyzer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    let llm = GeminiClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let auth = FirebaseAuthVerifier::new(config.firebase_api_key.clone())?;
    info!("Firebase token verifier initialized");

    let timeline = TimelineAnalyzer::new(
        config.timeline_overlap_mode,
        config.timeline_gap_threshold_days,
    );
    info!(
        "Timeline analyzer: {:?} overlaps, gap threshold {} days",
        timeline.mode, timeline.gap_threshold_days
    );

    let state = AppState {
        llm: Arc::new(llm),
        auth: Arc::new(auth),
        extractor: Arc::new(PdfTextExtractor),
        timeline,
    };

    let cors = cors_layer(&config.allowed_origins)?;
    info!("CORS origins: {:?}", config.allowed_origins);

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
