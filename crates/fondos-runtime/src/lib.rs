//! # fondos-runtime
//!
//! Live integrations behind the `fondos-core` seams:
//!
//! - [`MercadoPagoClient`] — payment lookups against the Mercado Pago API
//! - [`SheetsInventoryStore`] — the shared inventory spreadsheet, via the
//!   Sheets v4 REST API with service-account auth
//! - [`SmtpMailer`] — purchase emails through an authenticated SMTP relay

pub mod mercado_pago;
pub mod sheets;
pub mod smtp;

pub use mercado_pago::{MercadoPagoClient, MercadoPagoConfig};
pub use sheets::{SheetsConfig, SheetsInventoryStore};
pub use smtp::{SmtpConfig, SmtpMailer};
