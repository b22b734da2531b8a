use thiserror::Error;

/// Errors recognized by the core pipeline. Transport/store failures that the
/// pipeline should keep running past (see `ERROR HANDLING DESIGN`) are
/// represented here rather than panicking; callers decide whether a given
/// variant degrades a cycle to "partial"/"warning" or aborts it.
#[derive(Debug, Error)]
pub enum RiftwatchError {
    #[error("network request failed: {0}")]
    Network(String),

    #[error("malformed model output: {0}")]
    Classification(String),

    #[error("no reference data for {state}/{lga}")]
    NoReferenceData { state: String, lga: String },

    #[error("store unavailable: {0}")]
    Store(String),

    #[error("bus unavailable: {0}")]
    Bus(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RiftwatchError>;
