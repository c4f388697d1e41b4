//! Batched outbound calling over selected records.
//!
//! The dispatcher runs one unit of work per id through a [`Caller`], reports
//! fractional progress after each finished call, and returns a per-batch
//! report. Batches are strictly sequential unless
//! [`DialerOptions::max_in_flight`] raises the window.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Failure produced by a single outbound call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CallError(pub String);

/// One unit of outbound work: contact the entity behind an id and wait for
/// the outcome.
#[async_trait]
pub trait Caller: Send + Sync {
    /// Place a call to `id`.
    ///
    /// # Errors
    /// - Returns `Err` when the entity behind `id` cannot be reached
    async fn call(&self, id: &str) -> Result<(), CallError>;
}

/// Stand-in caller that sleeps for a fixed delay and always succeeds.
///
/// Used until a telephony integration exists; the delay keeps the batch
/// pacing observable.
#[derive(Debug, Clone)]
pub struct SimulatedCaller {
    delay: Duration,
}

impl SimulatedCaller {
    /// Caller that sleeps `delay` per id.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        SimulatedCaller { delay }
    }
}

impl Default for SimulatedCaller {
    fn default() -> Self {
        SimulatedCaller::new(Duration::from_millis(500))
    }
}

#[async_trait]
impl Caller for SimulatedCaller {
    async fn call(&self, _id: &str) -> Result<(), CallError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// What to do with the rest of a batch when one call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep going; failed ids are collected on the report.
    #[default]
    SkipAndReport,
    /// Stop launching new calls after the first failure.
    AbortOnFirst,
}

impl FailurePolicy {
    /// Stable key for config files.
    #[cfg_attr(not(test), allow(dead_code))]
    #[must_use]
    pub fn as_config_key(self) -> &'static str {
        match self {
            FailurePolicy::SkipAndReport => "skip_and_report",
            FailurePolicy::AbortOnFirst => "abort_on_first",
        }
    }

    /// Parse a policy from its config key; `None` for unknown keys.
    #[must_use]
    pub fn from_config_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "skip_and_report" | "skip" => Some(FailurePolicy::SkipAndReport),
            "abort_on_first" | "abort" => Some(FailurePolicy::AbortOnFirst),
            _ => None,
        }
    }
}

/// Tuning for a call batch.
#[derive(Debug, Clone)]
pub struct DialerOptions {
    /// Upper bound on calls in flight at once; 1 keeps the batch strictly
    /// sequential.
    pub max_in_flight: usize,
    /// Behavior when a single call fails.
    pub failure_policy: FailurePolicy,
}

impl Default for DialerOptions {
    fn default() -> Self {
        DialerOptions {
            max_in_flight: 1,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Dispatcher state observable between batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialerState {
    /// No batch running.
    #[default]
    Idle,
    /// A batch is in progress.
    Running,
}

/// Progress snapshot emitted after each finished call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallProgress {
    /// Calls finished so far, successes and failures alike.
    pub completed: usize,
    /// Batch size.
    pub total: usize,
}

impl CallProgress {
    /// Fraction of the batch finished, in `0.0..=100.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}

/// Outcome of one call batch.
#[derive(Debug, Default)]
pub struct CallReport {
    /// Size of the id set handed to the batch.
    pub requested: usize,
    /// Calls that finished successfully.
    pub completed: usize,
    /// Failures with their reasons, in completion order.
    pub failed: Vec<(String, CallError)>,
    /// True when the failure policy stopped the batch before every id was
    /// tried.
    pub aborted: bool,
}

impl CallReport {
    /// Whether every id in the batch succeeded.
    #[cfg_attr(not(test), allow(dead_code))]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.aborted && self.failed.is_empty() && self.completed == self.requested
    }
}

/// Places one call per selected id, sequentially or through a bounded
/// window, and reports progress over a channel.
pub struct Dialer {
    caller: Arc<dyn Caller>,
    options: DialerOptions,
    state: DialerState,
}

impl Dialer {
    /// Dispatcher over `caller` with the given tuning.
    #[must_use]
    pub fn new(caller: Arc<dyn Caller>, options: DialerOptions) -> Self {
        Dialer {
            caller,
            options,
            state: DialerState::Idle,
        }
    }

    /// Convenience dispatcher around a [`SimulatedCaller`] with default
    /// tuning.
    #[cfg_attr(not(test), allow(dead_code))]
    #[must_use]
    pub fn simulated(delay: Duration) -> Self {
        Dialer::new(Arc::new(SimulatedCaller::new(delay)), DialerOptions::default())
    }

    /// Current dispatcher state.
    #[cfg_attr(not(test), allow(dead_code))]
    #[must_use]
    pub fn state(&self) -> DialerState {
        self.state
    }

    /// What: Run one batch over `ids`, emitting a progress snapshot after
    /// each finished call.
    ///
    /// Inputs:
    /// - `ids`: Ids to call, in batch order
    /// - `progress`: Channel the per-call snapshots go out on; send errors
    ///   are ignored so an abandoned receiver cannot stall a batch
    ///
    /// Output:
    /// - A [`CallReport`] with the success/failure tally.
    ///
    /// Details:
    /// - An empty `ids` is a no-op that emits nothing and stays `Idle`.
    /// - The dispatcher is `Running` for the duration of the batch and back
    ///   to `Idle` before this returns, whatever the outcome.
    pub async fn run(
        &mut self,
        ids: &[String],
        progress: &mpsc::UnboundedSender<CallProgress>,
    ) -> CallReport {
        if ids.is_empty() {
            return CallReport::default();
        }
        self.state = DialerState::Running;
        let report = if self.options.max_in_flight <= 1 {
            self.run_sequential(ids, progress).await
        } else {
            self.run_windowed(ids, progress).await
        };
        self.state = DialerState::Idle;
        report
    }

    async fn run_sequential(
        &self,
        ids: &[String],
        progress: &mpsc::UnboundedSender<CallProgress>,
    ) -> CallReport {
        let total = ids.len();
        let mut report = CallReport {
            requested: total,
            ..CallReport::default()
        };
        for id in ids {
            let outcome = self.caller.call(id).await;
            let failed_now = outcome.is_err();
            match outcome {
                Ok(()) => report.completed += 1,
                Err(err) => report.failed.push((id.clone(), err)),
            }
            let done = report.completed + report.failed.len();
            let _ = progress.send(CallProgress {
                completed: done,
                total,
            });
            if failed_now && self.options.failure_policy == FailurePolicy::AbortOnFirst {
                report.aborted = done < total;
                break;
            }
        }
        report
    }

    /// Windowed variant: up to `max_in_flight` calls run concurrently.
    /// Progress still counts finished calls, so snapshots arrive in
    /// completion order rather than batch order.
    async fn run_windowed(
        &self,
        ids: &[String],
        progress: &mpsc::UnboundedSender<CallProgress>,
    ) -> CallReport {
        let total = ids.len();
        let mut report = CallReport {
            requested: total,
            ..CallReport::default()
        };
        let mut queue = ids.iter().cloned();
        let mut in_flight: JoinSet<(String, Result<(), CallError>)> = JoinSet::new();
        let mut stop_launching = false;
        loop {
            while !stop_launching && in_flight.len() < self.options.max_in_flight {
                let Some(id) = queue.next() else { break };
                let caller = Arc::clone(&self.caller);
                in_flight.spawn(async move {
                    let outcome = caller.call(&id).await;
                    (id, outcome)
                });
            }
            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            match joined {
                Ok((_, Ok(()))) => report.completed += 1,
                Ok((id, Err(err))) => {
                    report.failed.push((id, err));
                    if self.options.failure_policy == FailurePolicy::AbortOnFirst {
                        stop_launching = true;
                    }
                }
                // A panicked call task still counts against the batch.
                Err(join_err) => {
                    report
                        .failed
                        .push((String::new(), CallError(join_err.to_string())));
                    if self.options.failure_policy == FailurePolicy::AbortOnFirst {
                        stop_launching = true;
                    }
                }
            }
            let done = report.completed + report.failed.len();
            let _ = progress.send(CallProgress {
                completed: done,
                total,
            });
        }
        report.aborted = report.completed + report.failed.len() < total;
        report
    }
}
