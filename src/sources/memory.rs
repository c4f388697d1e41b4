//! In-memory record backend for offline use and tests.

use std::cmp::Ordering;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{FETCH_CAP, RecordSource, SourceError};
use crate::state::Record;

/// Records held in process memory.
///
/// Serves the engine when no live backend is configured, and doubles as the
/// test backend. Deletes mutate the stored rows directly, so the re-fetch
/// that follows a mutation observes the new state the same way it would with
/// the live client.
pub struct MemorySource<R> {
    records: RwLock<Vec<R>>,
}

impl<R: Record> MemorySource<R> {
    /// Store with no records.
    #[must_use]
    pub fn empty() -> Self {
        MemorySource {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Store seeded with `records`.
    #[must_use]
    pub fn with_records(records: Vec<R>) -> Self {
        MemorySource {
            records: RwLock::new(records),
        }
    }
}

impl<R: Record> Default for MemorySource<R> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Newest first; undated rows keep their seed order after the dated ones.
fn newest_first<R: Record>(a: &R, b: &R) -> Ordering {
    match (a.created_at(), b.created_at()) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl<R: Record> RecordSource<R> for MemorySource<R> {
    async fn fetch(&self) -> Result<Vec<R>, SourceError> {
        let mut rows: Vec<R> = self.records.read().await.clone();
        rows.sort_by(newest_first);
        rows.truncate(FETCH_CAP);
        Ok(rows)
    }

    async fn delete(&self, ids: &[String]) -> Result<(), SourceError> {
        let mut rows = self.records.write().await;
        rows.retain(|record| !ids.iter().any(|id| id == record.id()));
        Ok(())
    }
}
