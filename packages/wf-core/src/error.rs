use thiserror::Error;

/// Errors surfaced by an `ObservationStore` or `ArtifactSink` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(String),
}

/// Top-level error from a pipeline run. Only fatal I/O propagates here;
/// input-integrity problems and Weiszfeld non-convergence are logged and
/// tallied rather than raised.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
