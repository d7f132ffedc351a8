use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::model::{Dataset, ShipmentItem, ShipmentStatus};

/// Validate cross-record consistency of a generated dataset.
///
/// This checks:
/// - ids of every entity run 1..=N in order
/// - item and return references point at existing parents
/// - per-shipment products are distinct and their count is in range
/// - prices match the catalog and totals are rounded products
/// - returns only follow delivered shipments, at most one each
/// - return items stay inside their shipment's contiguous item id block
pub fn validate_dataset(dataset: &Dataset, config: &GeneratorConfig) -> Result<()> {
    check_sequential("shipments", dataset.shipments.iter().map(|s| s.id))?;
    check_sequential("shipment_items", dataset.shipment_items.iter().map(|i| i.id))?;
    check_sequential("returns", dataset.returns.iter().map(|r| r.id))?;
    check_sequential("return_items", dataset.return_items.iter().map(|i| i.id))?;

    let shipments: BTreeMap<i64, _> = dataset.shipments.iter().map(|s| (s.id, s)).collect();
    let mut items_by_shipment: BTreeMap<i64, Vec<&ShipmentItem>> = BTreeMap::new();

    for item in &dataset.shipment_items {
        if !shipments.contains_key(&item.shipment_id) {
            return Err(Error::InvariantViolation(format!(
                "shipment item {} references unknown shipment {}",
                item.id, item.shipment_id
            )));
        }
        check_price(config, "shipment item", item.id, item.product_id, item.unit_price)?;
        check_total(
            "shipment item",
            item.id,
            item.quantity,
            item.unit_price,
            item.total_price,
        )?;
        items_by_shipment.entry(item.shipment_id).or_default().push(item);
    }

    for shipment in &dataset.shipments {
        let items = items_by_shipment
            .get(&shipment.id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if !config.items_per_shipment.contains(items.len() as u32) {
            return Err(Error::InvariantViolation(format!(
                "shipment {} has {} items",
                shipment.id,
                items.len()
            )));
        }
        let products: BTreeSet<i64> = items.iter().map(|item| item.product_id).collect();
        if products.len() != items.len() {
            return Err(Error::InvariantViolation(format!(
                "shipment {} repeats a product",
                shipment.id
            )));
        }
        let first = items.first().map(|item| item.id).unwrap_or_default();
        if items
            .iter()
            .enumerate()
            .any(|(offset, item)| item.id != first + offset as i64)
        {
            return Err(Error::InvariantViolation(format!(
                "shipment {} item ids are not contiguous",
                shipment.id
            )));
        }
    }

    let mut return_item_counts: BTreeMap<i64, usize> = BTreeMap::new();
    for item in &dataset.return_items {
        *return_item_counts.entry(item.return_id).or_default() += 1;
    }

    let mut returned_shipments = BTreeSet::new();
    for ret in &dataset.returns {
        let shipment = shipments.get(&ret.shipment_id).ok_or_else(|| {
            Error::InvariantViolation(format!(
                "return {} references unknown shipment {}",
                ret.id, ret.shipment_id
            ))
        })?;
        if shipment.status != ShipmentStatus::Delivered {
            return Err(Error::InvariantViolation(format!(
                "return {} follows shipment {} with status {}",
                ret.id,
                shipment.id,
                shipment.status.as_str()
            )));
        }
        if !returned_shipments.insert(ret.shipment_id) {
            return Err(Error::InvariantViolation(format!(
                "shipment {} has more than one return",
                ret.shipment_id
            )));
        }
        if ret.shop_id != shipment.shop_id {
            return Err(Error::InvariantViolation(format!(
                "return {} shop differs from its shipment",
                ret.id
            )));
        }
        let delay = (ret.return_date - shipment.shipment_date).num_days();
        if delay < 0 || !config.return_delay_days.contains(delay as u32) {
            return Err(Error::InvariantViolation(format!(
                "return {} is dated {delay} days after its shipment",
                ret.id
            )));
        }

        let shipment_items = items_by_shipment
            .get(&shipment.id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let count = return_item_counts.get(&ret.id).copied().unwrap_or_default();
        if count == 0
            || count as u32 > config.items_per_return.max
            || count > shipment_items.len()
        {
            return Err(Error::InvariantViolation(format!(
                "return {} has {count} items",
                ret.id
            )));
        }
    }

    let returns: BTreeMap<i64, _> = dataset.returns.iter().map(|r| (r.id, r)).collect();
    for item in &dataset.return_items {
        let ret = returns.get(&item.return_id).ok_or_else(|| {
            Error::InvariantViolation(format!(
                "return item {} references unknown return {}",
                item.id, item.return_id
            ))
        })?;
        let shipment_items = items_by_shipment
            .get(&ret.shipment_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let Some(source) = shipment_items
            .iter()
            .find(|candidate| candidate.id == item.shipment_item_id)
        else {
            return Err(Error::InvariantViolation(format!(
                "return item {} references item {} outside shipment {}",
                item.id, item.shipment_item_id, ret.shipment_id
            )));
        };
        if source.product_id != item.product_id {
            return Err(Error::InvariantViolation(format!(
                "return item {} product differs from shipment item {}",
                item.id, source.id
            )));
        }
        check_price(config, "return item", item.id, item.product_id, item.unit_price)?;
        check_total(
            "return item",
            item.id,
            item.quantity,
            item.unit_price,
            item.total_amount,
        )?;
    }

    Ok(())
}

fn check_sequential(entity: &str, ids: impl Iterator<Item = i64>) -> Result<()> {
    for (index, id) in ids.enumerate() {
        let expected = index as i64 + 1;
        if id != expected {
            return Err(Error::InvariantViolation(format!(
                "{entity} id {id} found where {expected} was expected"
            )));
        }
    }
    Ok(())
}

fn check_price(
    config: &GeneratorConfig,
    entity: &str,
    id: i64,
    product_id: i64,
    unit_price: Decimal,
) -> Result<()> {
    match config.unit_price(product_id) {
        Some(price) if price == unit_price => Ok(()),
        Some(price) => Err(Error::InvariantViolation(format!(
            "{entity} {id} priced {unit_price}, catalog says {price}"
        ))),
        None => Err(Error::InvariantViolation(format!(
            "{entity} {id} uses unknown product {product_id}"
        ))),
    }
}

fn check_total(
    entity: &str,
    id: i64,
    quantity: Decimal,
    unit_price: Decimal,
    total: Decimal,
) -> Result<()> {
    let expected = (quantity * unit_price).round_dp(2);
    if total != expected {
        return Err(Error::InvariantViolation(format!(
            "{entity} {id} total {total} != {expected}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::config::CountRange;
    use crate::model::{
        Return, ReturnItem, ReturnReason, ReturnStatus, Shipment, ShipmentItem, ShipmentStatus,
    };

    fn shipment(id: i64, status: ShipmentStatus) -> Shipment {
        let at = NaiveDate::from_ymd_opt(2024, 5, 10)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .unwrap();
        Shipment {
            id,
            shipment_number: format!("SHP-20240510-{}", 10_000 + id - 1),
            shop_id: 11,
            driver_id: 8,
            shipment_date: at.date(),
            status,
            notes: "Consegna standard".to_string(),
            email_sent: false,
            whatsapp_sent: false,
            created_by: 6,
            created_at: at,
            updated_at: at,
        }
    }

    fn item(id: i64, shipment_id: i64, product_id: i64) -> ShipmentItem {
        let unit_price = GeneratorConfig::default().unit_price(product_id).unwrap();
        let quantity = Decimal::new(250, 2);
        ShipmentItem {
            id,
            shipment_id,
            product_id,
            quantity,
            unit_price,
            total_price: (quantity * unit_price).round_dp(2),
        }
    }

    fn fixture() -> Dataset {
        let delivered = shipment(1, ShipmentStatus::Delivered);
        let ret = Return {
            id: 1,
            return_number: "RET-20240512-10001".to_string(),
            shipment_id: 1,
            shop_id: delivered.shop_id,
            return_date: delivered.shipment_date + chrono::Duration::days(2),
            status: ReturnStatus::Pending,
            reason: ReturnReason::Damaged,
            created_by: 6,
            created_at: delivered.created_at,
            updated_at: delivered.updated_at,
        };
        let quantity = Decimal::new(75, 2);
        let unit_price = Decimal::new(350, 2);
        Dataset {
            shipments: vec![delivered],
            shipment_items: vec![item(1, 1, 1), item(2, 1, 2), item(3, 1, 3)],
            returns: vec![ret],
            return_items: vec![ReturnItem {
                id: 1,
                return_id: 1,
                shipment_item_id: 1,
                product_id: 1,
                quantity,
                unit_price,
                total_amount: (quantity * unit_price).round_dp(2),
                reason: ReturnReason::Expired,
            }],
        }
    }

    #[test]
    fn accepts_consistent_dataset() {
        validate_dataset(&fixture(), &GeneratorConfig::default()).expect("valid dataset");
    }

    #[test]
    fn rejects_return_for_undelivered_shipment() {
        let mut dataset = fixture();
        dataset.shipments[0].status = ShipmentStatus::InTransit;
        let err = validate_dataset(&dataset, &GeneratorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("status IN_CONSEGNA"));
    }

    #[test]
    fn rejects_duplicate_products() {
        let mut dataset = fixture();
        dataset.shipment_items[2] = item(3, 1, 1);
        assert!(validate_dataset(&dataset, &GeneratorConfig::default()).is_err());
    }

    #[test]
    fn rejects_unrounded_total() {
        let mut dataset = fixture();
        dataset.shipment_items[0].total_price += Decimal::new(1, 3);
        assert!(validate_dataset(&dataset, &GeneratorConfig::default()).is_err());
    }

    #[test]
    fn rejects_reference_outside_shipment_block() {
        let mut dataset = fixture();
        dataset.return_items[0].shipment_item_id = 4;
        assert!(validate_dataset(&dataset, &GeneratorConfig::default()).is_err());
    }

    #[test]
    fn rejects_returns_without_items_or_with_too_many() {
        let mut dataset = fixture();
        dataset.return_items.clear();
        let err = validate_dataset(&dataset, &GeneratorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("return 1 has 0 items"));

        let mut dataset = fixture();
        let extra = dataset.return_items[0].clone();
        for (id, shipment_item_id) in [(2, 2), (3, 3)] {
            dataset.return_items.push(ReturnItem {
                id,
                shipment_item_id,
                product_id: shipment_item_id,
                unit_price: dataset.shipment_items[id as usize - 1].unit_price,
                total_amount: (extra.quantity
                    * dataset.shipment_items[id as usize - 1].unit_price)
                    .round_dp(2),
                ..extra.clone()
            });
        }
        validate_dataset(&dataset, &GeneratorConfig::default()).expect("three items fit");

        let mut config = GeneratorConfig::default();
        config.items_per_return = CountRange::new(1, 2);
        let err = validate_dataset(&dataset, &config).unwrap_err();
        assert!(err.to_string().contains("return 1 has 3 items"));
    }

    #[test]
    fn rejects_gaps_in_ids() {
        let mut dataset = fixture();
        dataset.shipment_items[1].id = 5;
        let err = validate_dataset(&dataset, &GeneratorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("shipment_items id 5"));
    }
}
