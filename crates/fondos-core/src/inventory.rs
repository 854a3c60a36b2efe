//! Inventory Sheet Model
//!
//! The inventory lives in an external spreadsheet, one item per row over
//! columns A–H. Column positions are a fixed contract with the sheet layout;
//! do not reorder.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{FondosError, Result};

/// Zero-based cell index of each consumed column within a row (A = 0).
pub mod col {
    /// Column B: buyer email
    pub const EMAIL: usize = 1;
    /// Column C: buyer phone
    pub const PHONE: usize = 2;
    /// Column D: payment ID
    pub const PAYMENT_ID: usize = 3;
    /// Column E: buyer full name
    pub const BUYER_NAME: usize = 4;
    /// Column F: status
    pub const STATUS: usize = 5;
    /// Column H: download link
    pub const LINK: usize = 7;
}

/// Data starts on sheet row 2 (row 1 is the header).
pub const FIRST_DATA_ROW: usize = 2;

pub const STATUS_AVAILABLE: &str = "disponible";
pub const STATUS_SOLD: &str = "vendido";

/// One inventory row, keyed by its position within the data range
/// (sheet row = `index` + [`FIRST_DATA_ROW`]).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemRow {
    pub index: usize,
    /// Raw cell values for columns A..H. Trailing empty cells may be absent.
    pub cells: Vec<String>,
}

impl ItemRow {
    pub fn status(&self) -> &str {
        self.cells.get(col::STATUS).map_or("", String::as_str)
    }

    pub fn is_available(&self) -> bool {
        self.status() == STATUS_AVAILABLE
    }

    pub fn download_link(&self) -> &str {
        self.cells.get(col::LINK).map_or("", String::as_str)
    }
}

/// Buyer contact data written back to an allocated row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Buyer {
    pub email: String,
    pub phone: String,
    pub full_name: String,
}

/// Inventory store seam
///
/// Writes are per-row, matching the sheet API: one update for the contact
/// columns (B–E) and a separate one for the status cell (F). Nothing spans
/// rows transactionally.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Read the full inventory range.
    async fn read_rows(&self) -> Result<Vec<ItemRow>>;

    /// Write buyer contact data into columns B–E of one row.
    async fn write_buyer(&self, index: usize, buyer: &Buyer, payment_id: &str) -> Result<()>;

    /// Write the status cell (column F) of one row.
    async fn write_status(&self, index: usize, status: &str) -> Result<()>;
}

/// In-memory inventory for tests and local runs
pub struct MemoryInventoryStore {
    rows: Mutex<Vec<ItemRow>>,
}

impl MemoryInventoryStore {
    pub fn new(rows: Vec<ItemRow>) -> Self {
        Self { rows: Mutex::new(rows) }
    }

    /// Seed `available` unclaimed rows followed by `sold` already-sold ones,
    /// each with a distinct download link.
    pub fn seeded(available: usize, sold: usize) -> Self {
        let mut rows = Vec::with_capacity(available + sold);
        for i in 0..available + sold {
            let status = if i < available { STATUS_AVAILABLE } else { STATUS_SOLD };
            rows.push(ItemRow {
                index: i,
                cells: vec![
                    format!("fondo-{i}"),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    status.to_string(),
                    String::new(),
                    format!("https://drive.example.com/fondo-{i}"),
                ],
            });
        }
        Self::new(rows)
    }

    /// Snapshot of the current rows.
    pub async fn rows(&self) -> Vec<ItemRow> {
        self.rows.lock().await.clone()
    }

    pub async fn available_count(&self) -> usize {
        self.rows.lock().await.iter().filter(|r| r.is_available()).count()
    }

    pub async fn sold_count(&self) -> usize {
        self.rows.lock().await.iter().filter(|r| r.status() == STATUS_SOLD).count()
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn read_rows(&self) -> Result<Vec<ItemRow>> {
        Ok(self.rows.lock().await.clone())
    }

    async fn write_buyer(&self, index: usize, buyer: &Buyer, payment_id: &str) -> Result<()> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .get_mut(index)
            .ok_or_else(|| FondosError::Inventory(format!("row {index} out of range")))?;
        if row.cells.len() <= col::LINK {
            row.cells.resize(col::LINK + 1, String::new());
        }
        row.cells[col::EMAIL] = buyer.email.clone();
        row.cells[col::PHONE] = buyer.phone.clone();
        row.cells[col::PAYMENT_ID] = payment_id.to_string();
        row.cells[col::BUYER_NAME] = buyer.full_name.clone();
        Ok(())
    }

    async fn write_status(&self, index: usize, status: &str) -> Result<()> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .get_mut(index)
            .ok_or_else(|| FondosError::Inventory(format!("row {index} out of range")))?;
        if row.cells.len() <= col::STATUS {
            row.cells.resize(col::STATUS + 1, String::new());
        }
        row.cells[col::STATUS] = status.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_store() {
        let store = MemoryInventoryStore::seeded(4, 2);
        assert_eq!(store.available_count().await, 4);
        assert_eq!(store.sold_count().await, 2);
        let rows = store.read_rows().await.unwrap();
        assert_eq!(rows.len(), 6);
        assert!(rows[0].download_link().starts_with("https://"));
    }

    #[tokio::test]
    async fn test_write_back() {
        let store = MemoryInventoryStore::seeded(1, 0);
        let buyer = Buyer {
            email: "ana@example.com".into(),
            phone: "3001234567".into(),
            full_name: "Ana García".into(),
        };
        store.write_buyer(0, &buyer, "pay-1").await.unwrap();
        store.write_status(0, STATUS_SOLD).await.unwrap();

        let rows = store.rows().await;
        assert_eq!(rows[0].cells[col::EMAIL], "ana@example.com");
        assert_eq!(rows[0].cells[col::PAYMENT_ID], "pay-1");
        assert_eq!(rows[0].status(), STATUS_SOLD);
    }

    #[tokio::test]
    async fn test_out_of_range_write() {
        let store = MemoryInventoryStore::seeded(1, 0);
        assert!(store.write_status(5, STATUS_SOLD).await.is_err());
    }

    #[test]
    fn test_short_row_reads_empty() {
        let row = ItemRow { index: 0, cells: vec!["fondo-0".into()] };
        assert_eq!(row.status(), "");
        assert!(!row.is_available());
        assert_eq!(row.download_link(), "");
    }
}
