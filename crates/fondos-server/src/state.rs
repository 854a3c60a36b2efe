//! Application State

use std::sync::Arc;

use fondos_core::Pipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Fulfillment pipeline over the live integrations
    pub pipeline: Arc<Pipeline>,

    /// Whether the production Mercado Pago token is in use
    pub production: bool,
}
