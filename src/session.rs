//! Per-module glue: one record cache, its query and selection state, and
//! the backend calls that refresh or mutate it.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::dialer::{CallProgress, CallReport, Dialer};
use crate::sources::{RecordSource, SourceError};
use crate::state::{Record, TableState, TableView};

/// Live state of one dashboard module (team roster, task board, ...).
///
/// Owns its cached records exclusively; the mutating entry points take
/// `&mut self`, so per module only one fetch, delete, or call batch runs at
/// a time. The visible window is recomputed from the cache on every render.
pub struct ModuleSession<R: Record> {
    source: Arc<dyn RecordSource<R>>,
    /// Query, selection, and cached rows for this module.
    pub table: TableState<R>,
}

impl<R: Record> ModuleSession<R> {
    /// Session over `source` with an empty table.
    #[must_use]
    pub fn new(source: Arc<dyn RecordSource<R>>) -> Self {
        ModuleSession {
            source,
            table: TableState::new(),
        }
    }

    /// What: Re-fetch the module's records from the backend.
    ///
    /// Details:
    /// - On failure the cache becomes an empty list and the error is
    ///   logged; there is no automatic retry. Query knobs and selection are
    ///   left alone either way.
    pub async fn refresh(&mut self) {
        match self.source.fetch().await {
            Ok(records) => {
                tracing::debug!(table = R::TABLE, rows = records.len(), "records refreshed");
                self.table.set_records(records);
            }
            Err(err) => {
                tracing::error!(error = %err, table = R::TABLE, "record fetch failed");
                self.table.set_records(Vec::new());
            }
        }
    }

    /// What: Delete every selected record, then clear the selection and
    /// re-fetch.
    ///
    /// Output:
    /// - `Ok(())` after the delete and re-fetch.
    ///
    /// # Errors
    /// - Returns the backend error when the delete request failed
    ///
    /// Details:
    /// - No-op on an empty selection. On failure nothing changes: cache and
    ///   selection stay as they were so the user can retry.
    pub async fn delete_selected(&mut self) -> Result<(), SourceError> {
        if self.table.selection.is_empty() {
            return Ok(());
        }
        let ids = self.table.selection.ids_sorted();
        match self.source.delete(&ids).await {
            Ok(()) => {
                tracing::info!(table = R::TABLE, deleted = ids.len(), "bulk delete finished");
                self.table.selection.clear();
                self.refresh().await;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, table = R::TABLE, "bulk delete failed");
                Err(err)
            }
        }
    }

    /// What: Run the outbound call batch over the selected ids.
    ///
    /// Inputs:
    /// - `dialer`: The dispatcher to run the batch through
    /// - `progress`: Channel for the per-call snapshots
    ///
    /// Output:
    /// - The batch report; empty when nothing was selected.
    ///
    /// Details:
    /// - When the batch runs through the whole id list the selection is
    ///   cleared and the records re-fetched, failures included. An aborted
    ///   batch keeps both so the remaining ids can be retried.
    pub async fn call_selected(
        &mut self,
        dialer: &mut Dialer,
        progress: &mpsc::UnboundedSender<CallProgress>,
    ) -> CallReport {
        let ids = self.table.selection.ids_sorted();
        if ids.is_empty() {
            return CallReport::default();
        }
        let report = dialer.run(&ids, progress).await;
        if report.aborted {
            tracing::warn!(
                table = R::TABLE,
                completed = report.completed,
                failed = report.failed.len(),
                "call batch aborted"
            );
        } else {
            tracing::info!(
                table = R::TABLE,
                completed = report.completed,
                failed = report.failed.len(),
                "call batch finished"
            );
            self.table.selection.clear();
            self.refresh().await;
        }
        report
    }

    /// Current derived window; see [`TableState::view`].
    #[must_use]
    pub fn view(&self) -> TableView<'_, R> {
        self.table.view()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dialer::{DialerOptions, FailurePolicy};
    use crate::sources::MemorySource;
    use crate::state::TeamMember;

    fn member(n: usize) -> TeamMember {
        TeamMember {
            id: format!("M{n:03}"),
            email: format!("member{n}@example.com"),
            name: format!("Member {n:03}"),
            role: "Sales Agent".into(),
            phone: format!("+4915{n:08}"),
            created_at: None,
            updated_at: None,
        }
    }

    fn session_with(count: usize) -> ModuleSession<TeamMember> {
        let records = (1..=count).map(member).collect();
        ModuleSession::new(Arc::new(MemorySource::with_records(records)))
    }

    /// Backend double whose requests always fail.
    struct BrokenSource;

    #[async_trait::async_trait]
    impl RecordSource<TeamMember> for BrokenSource {
        async fn fetch(&self) -> Result<Vec<TeamMember>, SourceError> {
            Err(SourceError::FetchFailed {
                table: TeamMember::TABLE,
                reason: "connection refused".into(),
            })
        }

        async fn delete(&self, _ids: &[String]) -> Result<(), SourceError> {
            Err(SourceError::DeleteFailed {
                table: TeamMember::TABLE,
                reason: "connection refused".into(),
            })
        }
    }

    #[tokio::test]
    /// What: Deleting a selection shrinks the table and clears the checks
    ///
    /// - Input: 10 records, 3 selected, delete_selected
    /// - Output: 7 records remain, selection empty
    async fn delete_selected_removes_and_clears() {
        let mut session = session_with(10);
        session.refresh().await;
        for id in ["M002", "M005", "M009"] {
            session.table.selection.toggle(id);
        }
        session.delete_selected().await.expect("Memory delete cannot fail");
        assert_eq!(session.table.records().len(), 7);
        assert!(session.table.selection.is_empty());
        assert!(!session.table.records().iter().any(|m| m.id == "M005"));
    }

    #[tokio::test]
    /// What: Deleting with nothing selected touches nothing
    ///
    /// - Input: 5 records, empty selection
    /// - Output: Ok, cache unchanged
    async fn delete_with_empty_selection_is_noop() {
        let mut session = session_with(5);
        session.refresh().await;
        session.delete_selected().await.expect("No-op delete cannot fail");
        assert_eq!(session.table.records().len(), 5);
    }

    #[tokio::test]
    /// What: A failed delete keeps cache and selection for a retry
    ///
    /// - Input: Backend whose delete always fails, 2 selected rows
    /// - Output: Err, selection intact, cache intact
    async fn failed_delete_keeps_state() {
        let mut session = ModuleSession::<TeamMember>::new(Arc::new(BrokenSource));
        session.table.set_records(vec![member(1), member(2)]);
        session.table.selection.toggle("M001");
        session.table.selection.toggle("M002");
        let result = session.delete_selected().await;
        assert!(matches!(result, Err(SourceError::DeleteFailed { .. })));
        assert_eq!(session.table.selection.len(), 2);
        assert_eq!(session.table.records().len(), 2);
    }

    #[tokio::test]
    /// What: A failed fetch degrades to an empty table, keeping the query
    ///
    /// - Input: Backend whose fetch fails, search text already set
    /// - Output: Empty cache, search text still present
    async fn failed_fetch_empties_cache() {
        let mut session = ModuleSession::<TeamMember>::new(Arc::new(BrokenSource));
        session.table.set_search("amy");
        session.refresh().await;
        assert!(session.table.records().is_empty());
        assert_eq!(session.table.query.search, "amy");
        let view = session.view();
        assert_eq!(view.filtered_count, 0);
        assert_eq!(view.total_pages, 1);
    }

    #[tokio::test]
    /// What: A completed call batch clears the selection
    ///
    /// - Input: 4 selected ids through a zero-delay dialer
    /// - Output: Clean report, empty selection afterwards
    async fn completed_call_batch_clears_selection() {
        let mut session = session_with(6);
        session.refresh().await;
        for id in ["M001", "M002", "M003", "M004"] {
            session.table.selection.toggle(id);
        }
        let mut dialer = Dialer::simulated(std::time::Duration::ZERO);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let report = session.call_selected(&mut dialer, &tx).await;
        assert!(report.is_clean());
        assert_eq!(report.requested, 4);
        assert!(session.table.selection.is_empty());
        let mut snapshots = 0;
        while rx.try_recv().is_ok() {
            snapshots += 1;
        }
        assert_eq!(snapshots, 4);
    }

    #[tokio::test]
    /// What: An aborted call batch keeps the selection for a retry
    ///
    /// - Input: Failing caller under AbortOnFirst, 2 selected ids
    /// - Output: Aborted report, selection unchanged
    async fn aborted_call_batch_keeps_selection() {
        /// Caller that fails every id.
        struct DeadLine;

        #[async_trait::async_trait]
        impl crate::dialer::Caller for DeadLine {
            async fn call(&self, id: &str) -> Result<(), crate::dialer::CallError> {
                Err(crate::dialer::CallError(format!("line dead for {id}")))
            }
        }

        let mut session = session_with(5);
        session.refresh().await;
        session.table.selection.toggle("M001");
        session.table.selection.toggle("M002");
        let options = DialerOptions {
            max_in_flight: 1,
            failure_policy: FailurePolicy::AbortOnFirst,
        };
        let mut dialer = Dialer::new(Arc::new(DeadLine), options);
        let (tx, _rx) = mpsc::unbounded_channel();
        let report = session.call_selected(&mut dialer, &tx).await;
        assert!(report.aborted);
        assert_eq!(session.table.selection.len(), 2);
    }

    #[tokio::test]
    /// What: Calling with nothing selected is a silent no-op
    ///
    /// - Input: Empty selection
    /// - Output: Empty report, no snapshots
    async fn call_with_empty_selection_is_noop() {
        let mut session = session_with(3);
        session.refresh().await;
        let mut dialer = Dialer::simulated(std::time::Duration::ZERO);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let report = session.call_selected(&mut dialer, &tx).await;
        assert_eq!(report.requested, 0);
        assert!(rx.try_recv().is_err());
    }
}
