//! Shipment and return data generator for warehouse-seed.
//!
//! This crate draws a randomized but internally consistent dataset from a
//! `GeneratorConfig` and renders it as PostgreSQL insert statements.

pub mod engine;
pub mod errors;
pub mod model;
pub mod output;
pub mod policy;
pub mod sequences;

pub use engine::{GeneratedData, GenerationEngine, GenerationResult, generate_dataset};
pub use errors::GenerationError;
pub use model::{EntityCounts, GenerateOptions, GenerationReport};
pub use sequences::IdSequences;
