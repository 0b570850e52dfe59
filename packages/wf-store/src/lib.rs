//! # wf-store
//!
//! Concrete `ObservationStore`/`ArtifactSink` implementations: a Postgres
//! store for production use and a JSON-file store for local/offline mode
//! and test fixtures.

pub mod json_store;
pub mod sqlx_store;

pub use json_store::JsonFileStore;
pub use sqlx_store::SqlxStore;
