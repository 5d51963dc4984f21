use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;

use crate::config::Config;
use webhook_verifier::{verify_webhook, WebhookGuard};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load()?;
    let verification = config.verification();
    verification
        .validate()
        .context("VERIFIER_SECRET must be set")?;

    let guard = WebhookGuard::new(verification).with_body_limit(config.body_limit);

    let app = Router::new()
        .route("/webhook", post(handle_webhook))
        .route_layer(middleware::from_fn_with_state(guard, verify_webhook))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Server starting on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_webhook(headers: HeaderMap, body: Bytes) -> StatusCode {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown");
    info!(
        "Accepted webhook: {} bytes, content-type {}",
        body.len(),
        content_type
    );
    StatusCode::OK
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now()
    }))
}
