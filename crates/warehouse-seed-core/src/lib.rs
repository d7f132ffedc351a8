//! Core contracts for warehouse-seed.
//!
//! This crate defines the shipment/return record types, the generator
//! configuration with its compiled-in defaults, and the invariant checks
//! shared by the generation engine and the CLI.

pub mod config;
pub mod error;
pub mod model;
pub mod validation;

pub use config::{CountRange, GeneratorConfig, MAX_DAY_SPAN, ProductPrice, TimestampStyle};
pub use error::{Error, Result};
pub use model::{
    Dataset, Return, ReturnItem, ReturnReason, ReturnStatus, Shipment, ShipmentItem,
    ShipmentStatus,
};
pub use validation::validate_dataset;
