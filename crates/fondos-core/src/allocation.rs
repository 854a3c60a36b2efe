//! Allocation Engine
//!
//! Read-select-write over the shared inventory sheet: read the full range,
//! pick N available rows uniformly at random, write the buyer onto each and
//! flip them to sold.
//!
//! Known race: two concurrent invocations read the same snapshot and can
//! select overlapping rows. The sheet API offers no conditional update, so
//! nothing guards against it here. Writes are per-row with no rollback; a
//! failure partway leaves earlier rows committed.

use rand::Rng;

use crate::error::{FondosError, Result};
use crate::inventory::{Buyer, InventoryStore, ItemRow, STATUS_SOLD};

/// Rows allocated to one payment
#[derive(Clone, Debug)]
pub struct Allocation {
    pub payment_id: String,
    pub rows: Vec<ItemRow>,
}

impl Allocation {
    /// Download links of the allocated rows, in selection order.
    pub fn links(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.download_link().to_string()).collect()
    }
}

/// Allocate `quantity` available rows to a buyer.
///
/// All-or-nothing at the eligibility gate: if fewer than `quantity` rows are
/// available, nothing is written. Selection draws a uniform index from the
/// shrinking candidate list, so every N-subset is equally likely.
pub async fn allocate<R: Rng>(
    store: &dyn InventoryStore,
    rng: &mut R,
    quantity: u32,
    buyer: &Buyer,
    payment_id: &str,
) -> Result<Allocation> {
    let requested = quantity as usize;

    let rows = store.read_rows().await?;
    let mut available: Vec<ItemRow> = rows.into_iter().filter(ItemRow::is_available).collect();

    if available.len() < requested {
        return Err(FondosError::InsufficientInventory {
            available: available.len(),
            requested,
        });
    }

    let mut selected = Vec::with_capacity(requested);
    while selected.len() < requested {
        let i = rng.gen_range(0..available.len());
        selected.push(available.swap_remove(i));
    }

    for row in &selected {
        store.write_buyer(row.index, buyer, payment_id).await?;
        store.write_status(row.index, STATUS_SOLD).await?;
    }

    tracing::info!(
        payment_id,
        quantity,
        remaining = available.len(),
        "Allocated inventory rows"
    );

    Ok(Allocation { payment_id: payment_id.to_string(), rows: selected })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::inventory::{col, MemoryInventoryStore};

    fn buyer() -> Buyer {
        Buyer {
            email: "ana@example.com".into(),
            phone: "3001234567".into(),
            full_name: "Ana García".into(),
        }
    }

    #[tokio::test]
    async fn test_allocates_exactly_n() {
        let store = MemoryInventoryStore::seeded(10, 0);
        let mut rng = StdRng::seed_from_u64(7);

        let allocation = allocate(&store, &mut rng, 6, &buyer(), "pay-1").await.unwrap();

        assert_eq!(allocation.rows.len(), 6);
        assert_eq!(allocation.links().len(), 6);
        assert_eq!(store.sold_count().await, 6);
        assert_eq!(store.available_count().await, 4);

        // Every sold row carries the same payment_id and buyer
        for row in store.rows().await {
            if row.status() == STATUS_SOLD {
                assert_eq!(row.cells[col::PAYMENT_ID], "pay-1");
                assert_eq!(row.cells[col::EMAIL], "ana@example.com");
            } else {
                assert_eq!(row.cells[col::PAYMENT_ID], "");
            }
        }
    }

    #[tokio::test]
    async fn test_selection_has_no_duplicates() {
        let store = MemoryInventoryStore::seeded(20, 0);
        let mut rng = StdRng::seed_from_u64(42);

        let allocation = allocate(&store, &mut rng, 9, &buyer(), "pay-2").await.unwrap();

        let mut indices: Vec<usize> = allocation.rows.iter().map(|r| r.index).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), 9);
    }

    #[tokio::test]
    async fn test_insufficient_inventory_writes_nothing() {
        let store = MemoryInventoryStore::seeded(2, 3);
        let mut rng = StdRng::seed_from_u64(1);

        let err = allocate(&store, &mut rng, 5, &buyer(), "pay-3").await.unwrap_err();
        match err {
            FondosError::InsufficientInventory { available, requested } => {
                assert_eq!(available, 2);
                assert_eq!(requested, 5);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(store.available_count().await, 2);
        assert_eq!(store.sold_count().await, 3);
    }

    #[tokio::test]
    async fn test_sold_rows_are_never_selected() {
        let store = MemoryInventoryStore::seeded(3, 5);
        let mut rng = StdRng::seed_from_u64(9);

        let allocation = allocate(&store, &mut rng, 3, &buyer(), "pay-4").await.unwrap();

        // Seeded layout puts available rows first
        for row in &allocation.rows {
            assert!(row.index < 3);
        }
        assert_eq!(store.available_count().await, 0);
        assert_eq!(store.sold_count().await, 8);
    }
}
