//! Package Tiers
//!
//! Fixed mapping from paid amount (COP) to item quantity. A purchase is only
//! valid if the paid amount matches a tier exactly.

/// The five package tiers: (amount in COP, item quantity).
pub const PACKAGE_TIERS: [(i64, u32); 5] = [
    (11_399, 3),
    (22_798, 6),
    (34_197, 9),
    (68_394, 18),
    (102_591, 27),
];

/// Resolve the item quantity for a paid amount.
///
/// Exact match only. Returns `None` for any amount outside the table;
/// callers must reject those, never default.
pub fn quantity_for_amount(amount: i64) -> Option<u32> {
    PACKAGE_TIERS
        .iter()
        .find(|(tier_amount, _)| *tier_amount == amount)
        .map(|(_, quantity)| *quantity)
}
