use std::path::PathBuf;
use std::time::Instant;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use warehouse_seed_core::{
    Dataset, Error as CoreError, GeneratorConfig, Return, ReturnItem, Shipment, ShipmentItem,
    validate_dataset,
};

use crate::errors::GenerationError;
use crate::model::{EntityCounts, GenerateOptions, GenerationReport};
use crate::output::sql::write_sql_file;
use crate::policy;
use crate::sequences::IdSequences;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub output_path: PathBuf,
    pub report: GenerationReport,
}

/// Records of one run together with the counters that produced them.
#[derive(Debug, Clone)]
pub struct GeneratedData {
    pub dataset: Dataset,
    pub sequences: IdSequences,
}

/// Entry point for generating a SQL seed file from a configuration.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    config: GeneratorConfig,
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(config: GeneratorConfig, options: GenerateOptions) -> Self {
        Self { config, options }
    }

    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let seed = self.options.seed.unwrap_or_else(rand::random);
        let generated_at = self
            .options
            .generated_at
            .unwrap_or_else(|| chrono::Local::now().naive_local());

        info!(
            run_id = %run_id,
            seed,
            shipments = self.config.shipment_count,
            generated_at = %generated_at,
            "generation started"
        );

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let data = generate_dataset(&self.config, generated_at, &mut rng)?;
        if let Err(err) = validate_dataset(&data.dataset, &self.config) {
            warn!(run_id = %run_id, error = %err, "generated dataset failed validation");
            return Err(err.into());
        }

        let bytes_written = write_sql_file(
            &self.options.out_path,
            &data.dataset,
            &data.sequences,
            self.config.timestamps,
        )?;

        let report = GenerationReport {
            run_id: run_id.clone(),
            seed,
            generated_at,
            output_path: self.options.out_path.clone(),
            counts: EntityCounts::of(&data.dataset),
            sequences: data.sequences,
            bytes_written,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        if let Some(report_path) = &self.options.report_path {
            std::fs::write(report_path, serde_json::to_vec_pretty(&report)?)?;
        }

        info!(
            run_id = %run_id,
            shipments = report.counts.shipments,
            shipment_items = report.counts.shipment_items,
            returns = report.counts.returns,
            return_items = report.counts.return_items,
            bytes_written,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult {
            output_path: self.options.out_path.clone(),
            report,
        })
    }
}

/// Generate every record of a run in a single forward pass.
///
/// The random source is consumed in a fixed order per shipment, so the same
/// seed, configuration and `generated_at` always yield the same dataset.
pub fn generate_dataset<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    generated_at: NaiveDateTime,
    rng: &mut R,
) -> Result<GeneratedData, GenerationError> {
    config.validate()?;

    let mut state = GeneratorState::new(config, generated_at);
    for index in 0..config.shipment_count {
        state.add_shipment(index, rng)?;
    }

    Ok(GeneratedData {
        dataset: state.dataset,
        sequences: state.sequences,
    })
}

struct GeneratorState<'a> {
    config: &'a GeneratorConfig,
    generated_at: NaiveDateTime,
    sequences: IdSequences,
    dataset: Dataset,
}

impl<'a> GeneratorState<'a> {
    fn new(config: &'a GeneratorConfig, generated_at: NaiveDateTime) -> Self {
        Self {
            config,
            generated_at,
            sequences: IdSequences::default(),
            dataset: Dataset::default(),
        }
    }

    fn add_shipment<R: Rng + ?Sized>(
        &mut self,
        index: u32,
        rng: &mut R,
    ) -> Result<(), GenerationError> {
        let config = self.config;
        let days_ago = rng.random_range(0..=config.max_age_days);
        let shipment_date = self
            .generated_at
            .date()
            .checked_sub_signed(Duration::days(i64::from(days_ago)))
            .ok_or_else(|| out_of_calendar("shipment", days_ago.into()))?;
        let shop_id = choose_id(rng, &config.shops, "shop")?;
        let driver_id = choose_id(rng, &config.drivers, "driver")?;
        let status = policy::shipment_status(rng, days_ago);

        let shipment = Shipment {
            id: self.sequences.next_shipment(),
            shipment_number: document_number(
                "SHP",
                shipment_date,
                u64::from(config.shipment_number_base) + u64::from(index),
            ),
            shop_id,
            driver_id,
            shipment_date,
            status,
            notes: config.notes.clone(),
            email_sent: false,
            whatsapp_sent: false,
            created_by: config.admin_id,
            created_at: self.generated_at,
            updated_at: self.generated_at,
        };

        let item_count = rng
            .random_range(config.items_per_shipment.min..=config.items_per_shipment.max)
            as usize;
        let products = policy::sample_products(rng, &config.products, item_count);
        let mut item_ids = Vec::with_capacity(products.len());
        for product in &products {
            let quantity = policy::shipment_quantity(rng);
            let item = ShipmentItem {
                id: self.sequences.next_shipment_item(),
                shipment_id: shipment.id,
                product_id: product.id,
                quantity,
                unit_price: product.unit_price,
                total_price: policy::line_total(quantity, product.unit_price),
            };
            item_ids.push(item.id);
            self.dataset.shipment_items.push(item);
        }

        debug!(
            shipment_id = shipment.id,
            days_ago,
            status = status.as_str(),
            items = item_ids.len(),
            "shipment generated"
        );

        if policy::should_create_return(rng, status, config.return_probability) {
            let delay = policy::days_in(rng, config.return_delay_days);
            let return_date = shipment_date
                .checked_add_signed(Duration::days(delay))
                .ok_or_else(|| out_of_calendar("return", delay))?;
            let return_id = self.sequences.next_return();
            let ret = Return {
                id: return_id,
                return_number: document_number(
                    "RET",
                    return_date,
                    u64::from(config.return_number_base) + return_id as u64,
                ),
                shipment_id: shipment.id,
                shop_id: shipment.shop_id,
                return_date,
                status: policy::pick_return_status(rng),
                reason: policy::pick_reason(rng),
                created_by: config.admin_id,
                created_at: self.generated_at,
                updated_at: self.generated_at,
            };

            let count = policy::return_item_count(rng, config.items_per_return, item_ids.len());
            for (product, shipment_item_id) in products.iter().zip(&item_ids).take(count) {
                let quantity = policy::return_quantity(rng);
                self.dataset.return_items.push(ReturnItem {
                    id: self.sequences.next_return_item(),
                    return_id,
                    shipment_item_id: *shipment_item_id,
                    product_id: product.id,
                    quantity,
                    unit_price: product.unit_price,
                    total_amount: policy::line_total(quantity, product.unit_price),
                    reason: policy::pick_reason(rng),
                });
            }

            debug!(
                shipment_id = shipment.id,
                return_id,
                items = count,
                "return generated"
            );
            self.dataset.returns.push(ret);
        }

        self.dataset.shipments.push(shipment);
        Ok(())
    }
}

fn choose_id<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[i64],
    name: &str,
) -> Result<i64, GenerationError> {
    pool.choose(rng)
        .copied()
        .ok_or_else(|| CoreError::InvalidConfig(format!("{name} pool is empty")).into())
}

fn out_of_calendar(kind: &str, days: i64) -> GenerationError {
    CoreError::InvalidConfig(format!(
        "{kind} date is {days} days away from the generation date and falls outside the calendar"
    ))
    .into()
}

fn document_number(prefix: &str, date: NaiveDate, sequence: u64) -> String {
    format!("{prefix}-{}-{sequence}", date.format("%Y%m%d"))
}
