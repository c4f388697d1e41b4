//! Record backends: the live REST client and the in-memory fallback.
//!
//! The engine talks to storage only through [`RecordSource`]. Which
//! implementation a module gets is decided once, at construction, by
//! [`backend_for`]; call sites never check for a half-configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::Settings;
use crate::state::Record;

mod memory;
mod rest;

pub use memory::MemorySource;
pub use rest::RestSource;

/// Hard cap on rows fetched per table, mirroring the backend query limit.
pub const FETCH_CAP: usize = 1000;

/// Failures surfaced by a record backend.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backend URL or key is missing from settings and environment.
    #[error("record backend is not configured")]
    ConfigurationMissing,
    /// A read request failed; the caller falls back to an empty table.
    #[error("fetch from {table} failed: {reason}")]
    FetchFailed {
        /// Backend table the request targeted.
        table: &'static str,
        /// Transport or decode error text.
        reason: String,
    },
    /// A delete request failed; the caller keeps its state for a retry.
    #[error("delete from {table} failed: {reason}")]
    DeleteFailed {
        /// Backend table the request targeted.
        table: &'static str,
        /// Transport or status error text.
        reason: String,
    },
}

/// Storage for one entity's records.
///
/// Reads return newest-first and never more than [`FETCH_CAP`] rows. After a
/// successful delete the caller re-fetches; implementations push no
/// invalidations of their own.
#[async_trait]
pub trait RecordSource<R: Record>: Send + Sync {
    /// Fetch all records, newest first, capped at [`FETCH_CAP`].
    ///
    /// # Errors
    /// - Returns `Err` when the backend request or the decode fails
    async fn fetch(&self) -> Result<Vec<R>, SourceError>;

    /// Delete every record whose id is in `ids`.
    ///
    /// # Errors
    /// - Returns `Err` when the backend rejects the request
    async fn delete(&self, ids: &[String]) -> Result<(), SourceError>;
}

/// What: Pick the backend for one module.
///
/// Inputs:
/// - `settings`: Resolved configuration; decides live versus local
/// - `local_seed`: Records the in-memory fallback starts with
///
/// Output:
/// - The REST client when settings carry a base URL and key, otherwise a
///   [`MemorySource`] seeded with `local_seed`.
///
/// Details:
/// - The fallback is chosen once and logged here; after this point the rest
///   of the engine cannot tell the two backends apart.
pub fn backend_for<R>(settings: &Settings, local_seed: Vec<R>) -> Arc<dyn RecordSource<R>>
where
    R: Record + DeserializeOwned,
{
    if settings.offline {
        tracing::info!(table = R::TABLE, "offline mode requested; serving local records");
        return Arc::new(MemorySource::with_records(local_seed));
    }
    match RestSource::from_settings(settings) {
        Ok(live) => Arc::new(live),
        Err(err) => {
            tracing::warn!(
                error = %err,
                table = R::TABLE,
                "record backend not configured; serving local records"
            );
            Arc::new(MemorySource::with_records(local_seed))
        }
    }
}
