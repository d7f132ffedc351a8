use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use warehouse_seed_core::Dataset;

use crate::sequences::IdSequences;

/// Options for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// SQL file the statements are written to.
    pub out_path: PathBuf,
    /// Seed for the random source. A fresh one is drawn when absent.
    pub seed: Option<u64>,
    /// Reference "now" for dates and timestamps. Local time when absent.
    pub generated_at: Option<NaiveDateTime>,
    /// Optional path for the JSON run report.
    pub report_path: Option<PathBuf>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_path: PathBuf::from("generated_data.sql"),
            seed: None,
            generated_at: None,
            report_path: None,
        }
    }
}

/// Number of records generated per entity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub shipments: u64,
    pub shipment_items: u64,
    pub returns: u64,
    pub return_items: u64,
}

impl EntityCounts {
    pub fn of(dataset: &Dataset) -> Self {
        Self {
            shipments: dataset.shipments.len() as u64,
            shipment_items: dataset.shipment_items.len() as u64,
            returns: dataset.returns.len() as u64,
            return_items: dataset.return_items.len() as u64,
        }
    }
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub generated_at: NaiveDateTime,
    pub output_path: PathBuf,
    pub counts: EntityCounts,
    pub sequences: IdSequences,
    pub bytes_written: u64,
    pub duration_ms: u64,
}
