//! Mercado Pago Client
//!
//! Live [`PaymentGateway`] over the Mercado Pago payments API.

use async_trait::async_trait;
use fondos_core::error::{FondosError, Result};
use fondos_core::payment::{Payment, PaymentGateway};

const DEFAULT_BASE_URL: &str = "https://api.mercadopago.com";

/// Mercado Pago client configuration
#[derive(Clone, Debug)]
pub struct MercadoPagoConfig {
    /// API base URL (overridable for tests)
    pub base_url: String,

    /// Bearer access token
    pub access_token: String,
}

impl MercadoPagoConfig {
    /// Create from environment variables.
    ///
    /// `APP_ENV=production` selects `MP_TOKEN_PROD`, anything else selects
    /// `MP_TOKEN_SANDBOX`.
    pub fn from_env() -> Result<Self> {
        let production = std::env::var("APP_ENV").is_ok_and(|v| v == "production");
        let var = if production { "MP_TOKEN_PROD" } else { "MP_TOKEN_SANDBOX" };
        let access_token =
            std::env::var(var).map_err(|_| FondosError::Config(format!("{var} not set")))?;

        Ok(Self { base_url: DEFAULT_BASE_URL.into(), access_token })
    }
}

/// Mercado Pago payment gateway
pub struct MercadoPagoClient {
    http: reqwest::Client,
    config: MercadoPagoConfig,
}

impl MercadoPagoClient {
    pub fn new(config: MercadoPagoConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(MercadoPagoConfig::from_env()?))
    }
}

#[async_trait]
impl PaymentGateway for MercadoPagoClient {
    async fn get_payment(&self, payment_id: &str) -> Result<Payment> {
        let url = format!("{}/v1/payments/{payment_id}", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(|e| FondosError::Gateway(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FondosError::Gateway(format!(
                "payment {payment_id} lookup returned {status}"
            )));
        }

        response
            .json::<Payment>()
            .await
            .map_err(|e| FondosError::Gateway(format!("invalid payment body: {e}")))
    }
}
