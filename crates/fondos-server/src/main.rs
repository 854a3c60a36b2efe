//! Fondos Fulfillment Server
//!
//! Axum-based server exposing the two fulfillment entry points: the
//! storefront claim endpoint and the Mercado Pago webhook.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fondos_core::Pipeline;
use fondos_runtime::{MercadoPagoClient, SheetsInventoryStore, SmtpMailer};

use crate::handlers::{claim, health_check, payment_webhook};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let production = std::env::var("APP_ENV").is_ok_and(|v| v == "production");
    if production {
        tracing::info!("✓ Production environment - using MP_TOKEN_PROD");
    } else {
        tracing::warn!("⚠ Sandbox environment - using MP_TOKEN_SANDBOX");
    }

    // Live integrations
    let gateway = Arc::new(MercadoPagoClient::from_env()?);
    let store = Arc::new(SheetsInventoryStore::from_env()?);
    let mailer = Arc::new(SmtpMailer::from_env()?);

    let pipeline = Arc::new(Pipeline::new(gateway, store, mailer));
    let state = AppState { pipeline, production };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/claim", post(claim))
        .route("/webhook/payments", post(payment_webhook))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 fondos server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health           - Health check");
    tracing::info!("  POST /api/claim        - Claim purchased fondos");
    tracing::info!("  POST /webhook/payments - Mercado Pago webhook");

    axum::serve(listener, app).await?;

    Ok(())
}
