//! Payment Provider Types
//!
//! Wire types for payments as reported by Mercado Pago, plus the gateway
//! trait the pipeline talks to.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{FondosError, Result};
use crate::inventory::Buyer;

/// Payment record fetched from the provider. Read-only; not owned by us.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Payment {
    /// Provider-reported status ("approved", "pending", "rejected", ...)
    pub status: String,

    /// Paid amount. The provider reports a number that may carry decimals;
    /// round before tier lookup.
    #[serde(default)]
    pub transaction_amount: f64,

    #[serde(default)]
    pub payer: Option<Payer>,
}

/// Buyer data attached to a payment
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Payer {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub identification: Option<Identification>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Identification {
    #[serde(default)]
    pub number: Option<String>,
}

impl Payment {
    /// Only an exact "approved" status permits fulfillment.
    pub fn is_approved(&self) -> bool {
        self.status == "approved"
    }

    /// Paid amount rounded to whole pesos for tier lookup.
    pub fn rounded_amount(&self) -> i64 {
        self.transaction_amount.round() as i64
    }

    /// Derive buyer contact data, preferring a caller-supplied phone number
    /// (claim path) over the payer's identification number (webhook path).
    pub fn buyer(&self, phone: Option<&str>) -> Buyer {
        let payer = self.payer.clone().unwrap_or_default();

        let email = payer.email.filter(|e| !e.is_empty()).unwrap_or_else(|| "sin-email".into());

        let phone = phone
            .map(str::to_string)
            .filter(|p| !p.is_empty())
            .or_else(|| payer.identification.and_then(|i| i.number))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "no-reg".into());

        let first = payer.first_name.unwrap_or_default();
        let last = payer.last_name.unwrap_or_default();
        let full_name = format!("{first} {last}").trim().to_string();

        Buyer { email, phone, full_name }
    }
}

/// Payment provider seam
///
/// Implemented live over the Mercado Pago REST API; tests use [`MockGateway`].
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Fetch a payment by provider ID.
    async fn get_payment(&self, payment_id: &str) -> Result<Payment>;
}

/// In-memory gateway serving canned payments, with a lookup counter so tests
/// can assert whether the provider was consulted at all.
#[derive(Default)]
pub struct MockGateway {
    payments: HashMap<String, Payment>,
    lookups: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_payment(mut self, id: &str, payment: Payment) -> Self {
        self.payments.insert(id.to_string(), payment);
        self
    }

    /// Number of `get_payment` calls made so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn get_payment(&self, payment_id: &str) -> Result<Payment> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.payments
            .get(payment_id)
            .cloned()
            .ok_or_else(|| FondosError::Gateway(format!("payment {payment_id} not found")))
    }
}
