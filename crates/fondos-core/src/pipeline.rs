//! Fulfillment Pipeline
//!
//! The single verify → tier → allocate → notify sequence shared by both
//! entry points. Handlers differ only in where the quantity comes from and
//! in how outcomes map to HTTP, so they stay thin adapters over this.
//!
//! There is no dedup ledger: redelivery of an already-fulfilled payment_id
//! re-enters the sequence and allocates a second time.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::allocation;
use crate::error::{FondosError, Result};
use crate::inventory::InventoryStore;
use crate::mailer::{Mailer, PurchaseEmail};
use crate::package;
use crate::payment::PaymentGateway;

/// Where the item quantity comes from
#[derive(Clone, Copy, Debug)]
pub enum QuantitySource {
    /// Client-declared quantity, cross-checked against the paid amount
    /// (claim path; defense against client tampering).
    Claimed(u32),
    /// Quantity derived solely from the verified amount (webhook path).
    FromAmount,
}

/// Result of running the pipeline for one payment
#[derive(Clone, Debug)]
pub enum Outcome {
    /// Items allocated and the buyer notified
    Fulfilled {
        payment_id: String,
        quantity: u32,
        links: Vec<String>,
    },
    /// Payment exists but is not approved (yet); informational, not an
    /// error, since the provider may re-deliver once it approves.
    Pending { status: String },
}

/// Fulfillment pipeline over the three external seams
pub struct Pipeline {
    gateway: Arc<dyn PaymentGateway>,
    store: Arc<dyn InventoryStore>,
    mailer: Arc<dyn Mailer>,
}

impl Pipeline {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        store: Arc<dyn InventoryStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self { gateway, store, mailer }
    }

    /// Fulfill one payment: verify it, resolve the tier, allocate rows and
    /// email the buyer their links.
    ///
    /// `phone` is the claim path's client-supplied contact number; the
    /// webhook path passes `None` and falls back to the payer's
    /// identification number.
    pub async fn fulfill(
        &self,
        payment_id: &str,
        phone: Option<&str>,
        source: QuantitySource,
    ) -> Result<Outcome> {
        let payment = self.gateway.get_payment(payment_id).await?;

        if !payment.is_approved() {
            tracing::info!(payment_id, status = %payment.status, "Payment not approved");
            return Ok(Outcome::Pending { status: payment.status });
        }

        let amount = payment.rounded_amount();
        let expected = package::quantity_for_amount(amount)
            .ok_or(FondosError::InvalidAmount(amount))?;

        let quantity = match source {
            QuantitySource::Claimed(requested) => {
                if requested != expected {
                    return Err(FondosError::QuantityMismatch { requested, expected });
                }
                requested
            }
            QuantitySource::FromAmount => expected,
        };

        let buyer = payment.buyer(phone);

        let mut rng = StdRng::from_entropy();
        let allocation =
            allocation::allocate(self.store.as_ref(), &mut rng, quantity, &buyer, payment_id)
                .await?;
        let links = allocation.links();

        // Allocation is committed at this point; a send failure below is
        // surfaced with no compensating action.
        let email = PurchaseEmail::purchase(&buyer.email, &buyer.full_name, &links);
        self.mailer.send(&email).await?;

        tracing::info!(payment_id, quantity, to = %buyer.email, "Fulfillment complete");

        Ok(Outcome::Fulfilled { payment_id: payment_id.to_string(), quantity, links })
    }
}
