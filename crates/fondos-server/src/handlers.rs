//! HTTP Handlers
//!
//! Two entry points over the one fulfillment pipeline. The claim endpoint
//! answers the buyer's client with conventional status codes; the webhook
//! endpoint answers the payment provider with 200 for every outcome so the
//! provider never re-delivers an event it should drop.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use fondos_core::{FondosError, Outcome, QuantitySource};

use crate::state::AppState;

/// Canned notification id Mercado Pago sends when a webhook URL is tested
/// from its dashboard.
const TEST_PAYMENT_ID: &str = "123456";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub production: bool,
}

/// Claim request, sent by the storefront after checkout
#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub celular: String,
    pub cantidad: u32,
    pub id_pago: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub status: &'static str,
    pub mensaje: String,
}

impl ApiResponse {
    fn ok(mensaje: impl Into<String>) -> Self {
        Self { status: "ok", mensaje: mensaje.into() }
    }

    fn pendiente(payment_status: &str) -> Self {
        Self { status: "pendiente", mensaje: format!("Pago con estado: {payment_status}") }
    }

    fn error(mensaje: impl Into<String>) -> Self {
        Self { status: "error", mensaje: mensaje.into() }
    }
}

/// Webhook body: `{"data": {"id": ...}}`, id may arrive as number or string.
#[derive(Debug, Deserialize)]
struct WebhookBody {
    #[serde(default)]
    data: Option<WebhookData>,
}

#[derive(Debug, Deserialize)]
struct WebhookData {
    #[serde(default)]
    id: Option<serde_json::Value>,
}

fn extract_payment_id(body: &str) -> Option<String> {
    let parsed: WebhookBody = serde_json::from_str(body).ok()?;
    match parsed.data?.id? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        production: state.production,
    })
}

/// Claim endpoint, invoked by the buyer's client with a declared quantity.
///
/// The declared quantity is cross-checked against the paid amount inside the
/// pipeline; a mismatch is rejected with 400.
pub async fn claim(
    State(state): State<AppState>,
    payload: Result<Json<ClaimRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse>) {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Claim body rejected");
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Body no es JSON válido")),
            );
        }
    };

    if payload.id_pago.trim().is_empty() {
        let err = FondosError::MissingPaymentId;
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(err.user_message())));
    }

    let outcome = state
        .pipeline
        .fulfill(
            &payload.id_pago,
            Some(&payload.celular),
            QuantitySource::Claimed(payload.cantidad),
        )
        .await;

    match outcome {
        Ok(Outcome::Fulfilled { .. }) => (
            StatusCode::OK,
            Json(ApiResponse::ok("Fondos asignados y correo enviado ✅")),
        ),
        Ok(Outcome::Pending { status }) => {
            (StatusCode::OK, Json(ApiResponse::pendiente(&status)))
        }
        Err(e) if e.is_validation() => {
            tracing::warn!(id_pago = %payload.id_pago, error = %e, "Claim rejected");
            (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.user_message())))
        }
        Err(e) => {
            tracing::error!(id_pago = %payload.id_pago, error = %e, "Claim failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::error(e.user_message())))
        }
    }
}

/// Payment-provider webhook.
///
/// Always answers 200: a non-success status would make the provider retry
/// delivery of events that are permanently invalid or already handled. The
/// raw body is taken as a `String` so empty and non-JSON payloads land here
/// instead of in an extractor rejection.
pub async fn payment_webhook(
    State(state): State<AppState>,
    body: String,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(payment_id) = extract_payment_id(&body) else {
        tracing::warn!("Webhook without usable payment id");
        return (
            StatusCode::OK,
            Json(ApiResponse::error(FondosError::MissingPaymentId.user_message())),
        );
    };

    if payment_id == TEST_PAYMENT_ID {
        tracing::info!("Webhook test notification acknowledged");
        return (StatusCode::OK, Json(ApiResponse::ok("Notificación de prueba recibida")));
    }

    match state
        .pipeline
        .fulfill(&payment_id, None, QuantitySource::FromAmount)
        .await
    {
        Ok(Outcome::Fulfilled { quantity, .. }) => {
            tracing::info!(payment_id, quantity, "Webhook fulfilled");
            (StatusCode::OK, Json(ApiResponse::ok("Fondos asignados y correo enviado ✅")))
        }
        Ok(Outcome::Pending { status }) => {
            (StatusCode::OK, Json(ApiResponse::pendiente(&status)))
        }
        Err(e) => {
            tracing::error!(payment_id, error = %e, "Webhook processing failed");
            (StatusCode::OK, Json(ApiResponse::error(e.user_message())))
        }
    }
}
