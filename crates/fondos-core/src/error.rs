//! Error Types for the Fulfillment Pipeline

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, FondosError>;

/// Fulfillment errors
#[derive(Error, Debug)]
pub enum FondosError {
    /// Request carried no usable payment identifier
    #[error("Payment ID missing from request")]
    MissingPaymentId,

    /// Paid amount matches no package tier
    #[error("Amount {0} matches no package tier")]
    InvalidAmount(i64),

    /// Client-declared quantity disagrees with the paid amount
    #[error("Requested quantity {requested} does not match paid quantity {expected}")]
    QuantityMismatch { requested: u32, expected: u32 },

    /// Fewer available rows than the payment covers
    #[error("Insufficient inventory: {available} available, {requested} requested")]
    InsufficientInventory { available: usize, requested: usize },

    /// Payment provider unreachable or erroring
    #[error("Payment gateway error: {0}")]
    Gateway(String),

    /// Inventory sheet unreachable or erroring
    #[error("Inventory store error: {0}")]
    Inventory(String),

    /// Mail relay failed
    #[error("Mail error: {0}")]
    Mail(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FondosError {
    /// Whether this error is the caller's fault (maps to 400 on the claim path).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FondosError::MissingPaymentId
                | FondosError::InvalidAmount(_)
                | FondosError::QuantityMismatch { .. }
                | FondosError::InsufficientInventory { .. }
        )
    }

    /// Buyer-facing message, in the store's language
    pub fn user_message(&self) -> String {
        match self {
            FondosError::MissingPaymentId => "ID de pago no recibido".into(),
            FondosError::InvalidAmount(amount) => format!("Monto no válido: {amount}"),
            FondosError::QuantityMismatch { requested, expected } => format!(
                "Cantidad solicitada ({requested}) no coincide con el monto pagado (esperado: {expected})"
            ),
            FondosError::InsufficientInventory { .. } => {
                "No hay suficientes fondos disponibles".into()
            }
            _ => "Ocurrió un error procesando tu compra".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_split() {
        assert!(FondosError::InvalidAmount(99_999).is_validation());
        assert!(FondosError::QuantityMismatch { requested: 5, expected: 6 }.is_validation());
        assert!(!FondosError::Gateway("timeout".into()).is_validation());
        assert!(!FondosError::Mail("relay down".into()).is_validation());
    }
}
