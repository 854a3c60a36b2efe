//! # fondos-core
//!
//! Domain model and fulfillment pipeline for the Motofuria fondos store:
//! verified Mercado Pago payments are exchanged for pre-provisioned digital
//! items held in a shared inventory sheet, and the buyer is emailed their
//! download links.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌────────────┐    ┌──────────┐
//! │  verify  │───▶│  resolve  │───▶│  allocate  │───▶│  notify  │
//! │ payment  │    │   tier    │    │  N rows    │    │  buyer   │
//! └──────────┘    └───────────┘    └────────────┘    └──────────┘
//! ```
//!
//! Two entry points share the pipeline: the claim endpoint (client-declared
//! quantity, cross-checked) and the payment-provider webhook (quantity
//! derived from the paid amount alone). External state — the payment record,
//! the inventory sheet, the mail relay — sits behind the [`PaymentGateway`],
//! [`InventoryStore`] and [`Mailer`] traits; live implementations live in
//! `fondos-runtime`.

pub mod allocation;
pub mod error;
pub mod inventory;
pub mod mailer;
pub mod package;
pub mod payment;
pub mod pipeline;

pub use allocation::Allocation;
pub use error::{FondosError, Result};
pub use inventory::{Buyer, InventoryStore, ItemRow, MemoryInventoryStore};
pub use mailer::{Mailer, MemoryMailer, PurchaseEmail};
pub use payment::{MockGateway, Payment, PaymentGateway, Payer};
pub use pipeline::{Outcome, Pipeline, QuantitySource};
