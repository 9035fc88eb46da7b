//! Timer registry and fire sequence.
//!
//! Concurrency-safe mapping from auction id to its one active close timer.
//! Schedule and reset replace the existing timer; cancel removes it; an
//! elapsed timer removes its own entry before invoking the end action.
//!
//! Correctness does not depend on cancelling tokio tasks. Every armed timer
//! carries an epoch, and the fire sequence removes the registry entry only if
//! the entry's epoch still matches the firing instance. A timer that was
//! replaced or cancelled after its sleep elapsed fails that check and does
//! nothing. Token cancellation of replaced timers is promptness only. Once a
//! fire has removed its entry it is committed: no other operation can reach
//! it, so the end action runs exactly once for that countdown period.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::action::{ActionBinding, EndAction};
use super::error::SchedulerError;
use super::failures::{ActionFailure, FailureReporter};
use super::metrics;
use super::models::{AuctionId, TimerInfo};
use super::policy::SchedulingPolicy;

struct TimerEntry {
    epoch: u64,
    cancel: CancellationToken,
    armed_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
}

struct SchedulerInner {
    timers: Mutex<HashMap<AuctionId, TimerEntry>>,
    next_epoch: AtomicU64,
    policy: SchedulingPolicy,
    binding: ActionBinding,
    failures: FailureReporter,
    shutdown: CancellationToken,
}

/// Create a scheduler together with the receiving end of its failure channel.
///
/// End-action failures are pushed on the returned receiver in addition to
/// being logged; the domain layer consumes them for alerting or
/// reconciliation.
pub fn create_scheduler(
    policy: SchedulingPolicy,
) -> (AuctionScheduler, mpsc::UnboundedReceiver<ActionFailure>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let scheduler = AuctionScheduler::construct(policy, ActionBinding::empty(), Some(tx));
    (scheduler, rx)
}

/// The auction timer scheduler.
///
/// Cheap to clone; all clones share one registry. Schedule, reset and cancel
/// are non-blocking and must be called from within a tokio runtime (the timer
/// itself runs as a spawned task).
#[derive(Clone)]
pub struct AuctionScheduler {
    inner: Arc<SchedulerInner>,
}

impl AuctionScheduler {
    /// Create a scheduler with no end action bound yet and no failure channel.
    /// Scheduling fails with [`SchedulerError::NotBound`] until [`bind`] is
    /// called.
    ///
    /// [`bind`]: AuctionScheduler::bind
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self::construct(policy, ActionBinding::empty(), None)
    }

    /// Create a scheduler with the end action injected at construction.
    pub fn with_end_action(policy: SchedulingPolicy, action: Arc<dyn EndAction>) -> Self {
        Self::construct(policy, ActionBinding::bound(action), None)
    }

    fn construct(
        policy: SchedulingPolicy,
        binding: ActionBinding,
        failure_sender: Option<mpsc::UnboundedSender<ActionFailure>>,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                timers: Mutex::new(HashMap::new()),
                next_epoch: AtomicU64::new(0),
                policy,
                binding,
                failures: FailureReporter::new(failure_sender),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Install the process-wide close action. One-shot: a second call fails
    /// with [`SchedulerError::AlreadyBound`]. Must happen during startup,
    /// before schedule/reset become reachable from request handling.
    pub fn bind(&self, action: Arc<dyn EndAction>) -> Result<(), SchedulerError> {
        self.inner.binding.bind(action)?;
        info!("End action bound");
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.inner.binding.is_bound()
    }

    pub fn policy(&self) -> &SchedulingPolicy {
        &self.inner.policy
    }

    /// Arm a close timer for the standard window, replacing any existing
    /// timer for this auction. Returns immediately.
    pub fn schedule(&self, auction_id: AuctionId) -> Result<(), SchedulerError> {
        self.schedule_with_window(auction_id, self.inner.policy.window())
    }

    /// Push the auction's deadline back by the standard window. Called on
    /// each qualifying bid; equivalent to [`schedule`].
    ///
    /// [`schedule`]: AuctionScheduler::schedule
    pub fn reset(&self, auction_id: AuctionId) -> Result<(), SchedulerError> {
        self.schedule(auction_id)
    }

    /// Arm a close timer with an explicit window, replacing any existing
    /// timer for this auction. The delay actually armed adds the policy's
    /// jitter buffer on top of the window.
    pub fn schedule_with_window(
        &self,
        auction_id: AuctionId,
        window: Duration,
    ) -> Result<(), SchedulerError> {
        if !self.inner.binding.is_bound() {
            return Err(SchedulerError::NotBound);
        }

        let armed_delay = self.inner.policy.armed_delay_for(window);
        let epoch = self.inner.next_epoch.fetch_add(1, Ordering::Relaxed);
        let token = self.inner.shutdown.child_token();
        let armed_at = Utc::now();
        let deadline = armed_at + chrono::Duration::milliseconds(window.as_millis() as i64);

        let previous = {
            let mut timers = lock_timers(&self.inner);
            // Serialized with shutdown through the lock: no timer can be
            // installed after the registry has been torn down.
            if self.inner.shutdown.is_cancelled() {
                return Err(SchedulerError::ShutDown);
            }
            let previous = timers.insert(
                auction_id,
                TimerEntry {
                    epoch,
                    cancel: token.clone(),
                    armed_at,
                    deadline,
                },
            );
            metrics::ACTIVE_TIMERS.set(timers.len() as i64);
            previous
        };

        metrics::TIMERS_SCHEDULED.inc();
        if let Some(previous) = previous {
            previous.cancel.cancel();
            metrics::TIMERS_RESET.inc();
            debug!(
                "Replaced close timer for auction {}, new deadline {}",
                auction_id, deadline
            );
        } else {
            debug!(
                "Armed close timer for auction {}, deadline {}",
                auction_id, deadline
            );
        }

        tokio::spawn(run_timer(
            Arc::clone(&self.inner),
            auction_id,
            epoch,
            armed_delay,
            token,
        ));
        Ok(())
    }

    /// Invalidate and remove the auction's timer if one is active. No-op
    /// otherwise. Returns whether a timer was actually cancelled. Used for
    /// closures that bypass the countdown: buy-now, manual close, deletion.
    pub fn cancel(&self, auction_id: AuctionId) -> bool {
        let removed = {
            let mut timers = lock_timers(&self.inner);
            let removed = timers.remove(&auction_id);
            if removed.is_some() {
                metrics::ACTIVE_TIMERS.set(timers.len() as i64);
            }
            removed
        };

        match removed {
            Some(entry) => {
                entry.cancel.cancel();
                metrics::TIMERS_CANCELLED.inc();
                debug!("Cancelled close timer for auction {}", auction_id);
                true
            }
            None => false,
        }
    }

    /// Cancel all outstanding timers and refuse further scheduling.
    /// Idempotent. End actions already committed by an elapsed timer run to
    /// completion.
    pub fn shutdown(&self) {
        let cancelled = {
            let mut timers = lock_timers(&self.inner);
            if self.inner.shutdown.is_cancelled() {
                return;
            }
            // Cancelling the parent token cancels every timer's child token.
            self.inner.shutdown.cancel();
            let cancelled = timers.len();
            timers.clear();
            metrics::ACTIVE_TIMERS.set(0);
            cancelled
        };
        info!(
            "Scheduler shut down, {} outstanding timer(s) cancelled",
            cancelled
        );
    }

    pub fn active_timer_count(&self) -> usize {
        lock_timers(&self.inner).len()
    }

    /// The advertised deadline for the auction's active timer, if any. The
    /// jitter buffer is not included.
    pub fn deadline(&self, auction_id: AuctionId) -> Option<DateTime<Utc>> {
        lock_timers(&self.inner)
            .get(&auction_id)
            .map(|entry| entry.deadline)
    }

    /// Snapshot of all active timers, ordered by deadline.
    pub fn active_timers(&self) -> Vec<TimerInfo> {
        let mut infos: Vec<TimerInfo> = lock_timers(&self.inner)
            .iter()
            .map(|(auction_id, entry)| TimerInfo {
                auction_id: *auction_id,
                armed_at: entry.armed_at,
                deadline: entry.deadline,
            })
            .collect();
        infos.sort_by_key(|info| (info.deadline, info.auction_id));
        infos
    }
}

fn lock_timers(inner: &SchedulerInner) -> MutexGuard<'_, HashMap<AuctionId, TimerEntry>> {
    // The lock is only ever held for map operations, never across an await.
    inner.timers.lock().expect("timer registry mutex poisoned")
}

async fn run_timer(
    inner: Arc<SchedulerInner>,
    auction_id: AuctionId,
    epoch: u64,
    delay: Duration,
    cancel: CancellationToken,
) {
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(delay) => {}
    }

    // Remove-then-act: only the instance whose epoch still matches the entry
    // may fire. A concurrent reset or cancel that already replaced or removed
    // the entry makes this a stale no-op.
    let committed = {
        let mut timers = lock_timers(&inner);
        match timers.get(&auction_id) {
            Some(entry) if entry.epoch == epoch => {
                timers.remove(&auction_id);
                metrics::ACTIVE_TIMERS.set(timers.len() as i64);
                true
            }
            _ => false,
        }
    };
    if !committed {
        debug!("Stale fire for auction {} ignored", auction_id);
        return;
    }

    metrics::TIMERS_FIRED.inc();
    let Some(action) = inner.binding.get() else {
        // Unreachable through the public API: scheduling requires a binding.
        debug!("Fire for auction {} found no bound action", auction_id);
        return;
    };

    info!("Countdown expired for auction {}, closing", auction_id);
    if let Err(error) = action.end_auction(auction_id).await {
        inner.failures.report(auction_id, error);
    }
}
