use thiserror::Error;

/// Core error type shared across warehouse-seed crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The generator configuration cannot produce a valid dataset.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// A generated dataset breaks one of the cross-record rules.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Convenience alias for results returned by warehouse-seed crates.
pub type Result<T> = std::result::Result<T, Error>;
