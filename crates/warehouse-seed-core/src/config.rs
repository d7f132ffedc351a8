use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How `created_at`/`updated_at` columns are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampStyle {
    /// Let the database fill the value with `NOW()`.
    #[default]
    Now,
    /// Emit the generation timestamp as a quoted literal.
    Literal,
}

/// Inclusive integer range used for counts and day offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Catalog entry pairing a product with its fixed unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub id: i64,
    pub unit_price: Decimal,
}

impl ProductPrice {
    pub fn new(id: i64, unit_price: Decimal) -> Self {
        Self { id, unit_price }
    }
}

/// Fixed inputs of a generation run.
///
/// `Default` carries the bakery warehouse catalog; a TOML file may override
/// any subset of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub shipment_count: u32,
    pub shops: Vec<i64>,
    pub drivers: Vec<i64>,
    pub products: Vec<ProductPrice>,
    pub admin_id: i64,
    pub notes: String,
    /// Shipments are dated up to this many days before generation time.
    pub max_age_days: u32,
    pub items_per_shipment: CountRange,
    pub return_probability: f64,
    pub items_per_return: CountRange,
    pub return_delay_days: CountRange,
    pub shipment_number_base: u32,
    pub return_number_base: u32,
    pub timestamps: TimestampStyle,
}

/// Upper bound on how far generated dates may move from the generation date.
pub const MAX_DAY_SPAN: u64 = 365_000;

const DEFAULT_PRICES_CENTS: [(i64, i64); 20] = [
    (1, 350),
    (2, 400),
    (3, 450),
    (4, 600),
    (5, 380),
    (6, 80),
    (7, 120),
    (8, 120),
    (9, 100),
    (10, 150),
    (11, 150),
    (12, 200),
    (13, 1800),
    (14, 1500),
    (15, 800),
    (16, 900),
    (17, 900),
    (18, 1000),
    (19, 1200),
    (20, 500),
];

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            shipment_count: 50,
            shops: (11..=20).collect(),
            drivers: vec![8, 9, 10],
            products: DEFAULT_PRICES_CENTS
                .iter()
                .map(|(id, cents)| ProductPrice::new(*id, Decimal::new(*cents, 2)))
                .collect(),
            admin_id: 6,
            notes: "Consegna standard".to_string(),
            max_age_days: 60,
            items_per_shipment: CountRange::new(3, 8),
            return_probability: 0.3,
            items_per_return: CountRange::new(1, 3),
            return_delay_days: CountRange::new(1, 5),
            shipment_number_base: 10_000,
            return_number_base: 10_000,
            timestamps: TimestampStyle::Now,
        }
    }
}

impl GeneratorConfig {
    pub fn unit_price(&self, product_id: i64) -> Option<Decimal> {
        self.products
            .iter()
            .find(|product| product.id == product_id)
            .map(|product| product.unit_price)
    }

    /// Check that the configuration can always produce a consistent dataset.
    pub fn validate(&self) -> Result<()> {
        if self.shops.is_empty() {
            return Err(Error::InvalidConfig("shop pool is empty".to_string()));
        }
        if self.drivers.is_empty() {
            return Err(Error::InvalidConfig("driver pool is empty".to_string()));
        }
        if self.products.is_empty() {
            return Err(Error::InvalidConfig("product catalog is empty".to_string()));
        }

        let mut seen = BTreeSet::new();
        for product in &self.products {
            if !seen.insert(product.id) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate product id: {}",
                    product.id
                )));
            }
            if product.unit_price <= Decimal::ZERO {
                return Err(Error::InvalidConfig(format!(
                    "product {} must have a positive unit price",
                    product.id
                )));
            }
        }

        validate_range("items_per_shipment", self.items_per_shipment)?;
        if self.items_per_shipment.max as usize > self.products.len() {
            return Err(Error::InvalidConfig(format!(
                "items_per_shipment.max ({}) exceeds catalog size ({})",
                self.items_per_shipment.max,
                self.products.len()
            )));
        }
        validate_range("items_per_return", self.items_per_return)?;
        validate_range("return_delay_days", self.return_delay_days)?;
        let span = u64::from(self.max_age_days) + u64::from(self.return_delay_days.max);
        if span > MAX_DAY_SPAN {
            return Err(Error::InvalidConfig(format!(
                "max_age_days + return_delay_days.max must be <= {MAX_DAY_SPAN}, got {span}"
            )));
        }

        if !(0.0..=1.0).contains(&self.return_probability) {
            return Err(Error::InvalidConfig(format!(
                "return_probability must be within [0, 1], got {}",
                self.return_probability
            )));
        }

        Ok(())
    }
}

fn validate_range(name: &str, range: CountRange) -> Result<()> {
    if range.min == 0 {
        return Err(Error::InvalidConfig(format!("{name}.min must be >= 1")));
    }
    if range.min > range.max {
        return Err(Error::InvalidConfig(format!(
            "{name}.min must be <= {name}.max"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GeneratorConfig::default();
        config.validate().expect("default config");
        assert_eq!(config.products.len(), 20);
        assert_eq!(config.unit_price(13), Some(Decimal::new(1800, 2)));
        assert_eq!(config.unit_price(21), None);
    }

    #[test]
    fn rejects_empty_pools() {
        let mut config = GeneratorConfig::default();
        config.drivers.clear();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = GeneratorConfig::default();
        config.shops.clear();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_duplicate_products_and_free_items() {
        let mut config = GeneratorConfig::default();
        config.products.push(ProductPrice::new(1, Decimal::new(100, 2)));
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = GeneratorConfig::default();
        config.products[0].unit_price = Decimal::ZERO;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_item_range_larger_than_catalog() {
        let mut config = GeneratorConfig::default();
        config.products.truncate(5);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.items_per_shipment = CountRange::new(3, 5);
        config.validate().expect("range fits the catalog");
    }

    #[test]
    fn rejects_bad_ranges_and_probability() {
        let mut config = GeneratorConfig::default();
        config.items_per_return = CountRange::new(0, 3);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = GeneratorConfig::default();
        config.return_delay_days = CountRange::new(5, 1);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = GeneratorConfig::default();
        config.return_probability = 1.5;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_day_ranges_beyond_calendar() {
        let mut config = GeneratorConfig::default();
        config.max_age_days = u32::MAX;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = GeneratorConfig::default();
        config.return_delay_days = CountRange::new(u32::MAX - 1, u32::MAX);
        config.return_probability = 1.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = GeneratorConfig::default();
        config.max_age_days = 364_990;
        config.return_delay_days = CountRange::new(1, 10);
        config.validate().expect("span at the limit");
        config.max_age_days += 1;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            shipment_count = 5
            drivers = [1]
            timestamps = "literal"
            "#,
        )
        .expect("parse config");
        assert_eq!(config.shipment_count, 5);
        assert_eq!(config.drivers, vec![1]);
        assert_eq!(config.timestamps, TimestampStyle::Literal);
        assert_eq!(config.shops, GeneratorConfig::default().shops);
    }
}
