//! Random policies behind every generated value.
//!
//! Each policy takes the random source explicitly so it can be exercised in
//! isolation with a seeded generator.

use rand::Rng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;

use warehouse_seed_core::{CountRange, ProductPrice, ReturnReason, ReturnStatus, ShipmentStatus};

/// Shipments older than this are always delivered.
pub const SETTLED_AFTER_DAYS: u32 = 30;
/// Shipments younger than or equal to this may still be drafts.
pub const DRAFT_WITHIN_DAYS: u32 = 10;

/// Shipment quantities in hundredths: 1.00..=20.00.
const SHIPMENT_QUANTITY_CENTS: (i64, i64) = (100, 2_000);
/// Returned quantities in hundredths: 0.50..=5.00.
const RETURN_QUANTITY_CENTS: (i64, i64) = (50, 500);

/// Pick a status for a shipment dated `days_ago` days before generation.
///
/// Older shipments are settled; recent ones spread over every status.
pub fn shipment_status<R: Rng + ?Sized>(rng: &mut R, days_ago: u32) -> ShipmentStatus {
    if days_ago > SETTLED_AFTER_DAYS {
        ShipmentStatus::Delivered
    } else if days_ago > DRAFT_WITHIN_DAYS {
        [ShipmentStatus::InTransit, ShipmentStatus::Delivered]
            .choose(rng)
            .copied()
            .unwrap_or(ShipmentStatus::Delivered)
    } else {
        ShipmentStatus::ALL
            .choose(rng)
            .copied()
            .unwrap_or(ShipmentStatus::Delivered)
    }
}

/// Decide whether a shipment gets a return. Only delivered shipments draw.
pub fn should_create_return<R: Rng + ?Sized>(
    rng: &mut R,
    status: ShipmentStatus,
    probability: f64,
) -> bool {
    status == ShipmentStatus::Delivered && rng.random_bool(probability)
}

pub fn return_item_count<R: Rng + ?Sized>(
    rng: &mut R,
    range: CountRange,
    shipment_items: usize,
) -> usize {
    let drawn = rng.random_range(range.min..=range.max) as usize;
    drawn.min(shipment_items)
}

pub fn days_in<R: Rng + ?Sized>(rng: &mut R, range: CountRange) -> i64 {
    i64::from(rng.random_range(range.min..=range.max))
}

pub fn pick_reason<R: Rng + ?Sized>(rng: &mut R) -> ReturnReason {
    ReturnReason::ALL
        .choose(rng)
        .copied()
        .unwrap_or(ReturnReason::Other)
}

pub fn pick_return_status<R: Rng + ?Sized>(rng: &mut R) -> ReturnStatus {
    ReturnStatus::ALL
        .choose(rng)
        .copied()
        .unwrap_or(ReturnStatus::Pending)
}

pub fn shipment_quantity<R: Rng + ?Sized>(rng: &mut R) -> Decimal {
    quantity_in(rng, SHIPMENT_QUANTITY_CENTS)
}

pub fn return_quantity<R: Rng + ?Sized>(rng: &mut R) -> Decimal {
    quantity_in(rng, RETURN_QUANTITY_CENTS)
}

/// Quantity times unit price, rounded to cents.
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    (quantity * unit_price).round_dp(2)
}

/// Draw `count` distinct catalog entries.
pub fn sample_products<'a, R: Rng + ?Sized>(
    rng: &mut R,
    products: &'a [ProductPrice],
    count: usize,
) -> Vec<&'a ProductPrice> {
    products.choose_multiple(rng, count).collect()
}

fn quantity_in<R: Rng + ?Sized>(rng: &mut R, (min, max): (i64, i64)) -> Decimal {
    Decimal::new(rng.random_range(min..=max), 2)
}
