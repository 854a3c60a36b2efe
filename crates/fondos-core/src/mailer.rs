//! Buyer Notification
//!
//! Fixed-template plaintext purchase email listing the allocated download
//! links, plus the mailer seam it is sent through.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{FondosError, Result};

/// Fixed subject line for the purchase email.
pub const PURCHASE_SUBJECT: &str = "🎉 Tus fondos digitales de Motofuria";

/// A single outgoing message
#[derive(Clone, Debug)]
pub struct PurchaseEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl PurchaseEmail {
    /// Build the purchase message for a buyer and their download links.
    pub fn purchase(to: &str, buyer_name: &str, links: &[String]) -> Self {
        let enlaces = links.join("\n👉 ");
        let body = format!(
            "\
Hola {buyer_name},

🎉 ¡Gracias por tu compra de fondos digitales en Motofuria!

Aquí tienes los fondos que adquiriste. Descárgalos en los siguientes enlaces:
👉 {enlaces}

📢 Además, únete a nuestro canal de Telegram para soporte y novedades:
👉 https://t.me/+1rRO36zXs0RjMmQ5

🙏 Gracias por participar en nuestra dinámica. ¡Recuerda que entre más compres, más cerca estás de ganar el premio!

👉 motofuria-fondos.netlify.app

Un abrazo del equipo Motofuria 🚀
"
        );

        Self { to: to.to_string(), subject: PURCHASE_SUBJECT.to_string(), body }
    }
}

/// Mail relay seam
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &PurchaseEmail) -> Result<()>;
}

/// Capture mailer: records messages instead of sending them.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<PurchaseEmail>>,
    fail_next: AtomicBool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next send fail, as an unreachable relay would.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Messages captured so far.
    pub async fn sent(&self) -> Vec<PurchaseEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &PurchaseEmail) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(FondosError::Mail("relay unavailable".into()));
        }
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_template() {
        let links = vec![
            "https://drive.example.com/a".to_string(),
            "https://drive.example.com/b".to_string(),
        ];
        let email = PurchaseEmail::purchase("ana@example.com", "Ana García", &links);

        assert_eq!(email.to, "ana@example.com");
        assert_eq!(email.subject, PURCHASE_SUBJECT);
        assert!(email.body.starts_with("Hola Ana García,"));
        for link in &links {
            assert!(email.body.contains(link));
        }
        assert!(email.body.contains("https://drive.example.com/a\n👉 https://drive.example.com/b"));
    }

    #[tokio::test]
    async fn test_memory_mailer_captures() {
        let mailer = MemoryMailer::new();
        let email = PurchaseEmail::purchase("ana@example.com", "Ana", &[]);
        mailer.send(&email).await.unwrap();
        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ana@example.com");
    }

    #[tokio::test]
    async fn test_memory_mailer_fails_once_on_demand() {
        let mailer = MemoryMailer::new();
        let email = PurchaseEmail::purchase("ana@example.com", "Ana", &[]);

        mailer.fail_next();
        let err = mailer.send(&email).await.unwrap_err();
        assert!(matches!(err, FondosError::Mail(_)));
        assert!(mailer.sent().await.is_empty());

        // The toggle only covers one send
        mailer.send(&email).await.unwrap();
        assert_eq!(mailer.sent().await.len(), 1);
    }
}
