//! Asynchronous end-action failure reporting.
//!
//! The fire sequence has no synchronous caller, so end-action failures cannot
//! propagate on a return path. They are always logged, and forwarded on an
//! mpsc channel when the scheduler was created with one, so that the domain
//! layer can alert or reconcile. The registry entry is already cleared by the
//! time a failure is reported; the scheduler never re-arms or retries.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

use super::metrics;
use super::models::AuctionId;

/// Report of one failed end-action invocation.
#[derive(Debug)]
pub struct ActionFailure {
    pub auction_id: AuctionId,
    pub occurred_at: DateTime<Utc>,
    pub error: anyhow::Error,
}

impl ActionFailure {
    /// Structured representation for log pipelines and alerting.
    pub fn as_json(&self) -> serde_json::Value {
        serde_json::json!({
            "auction_id": self.auction_id,
            "occurred_at": self.occurred_at.to_rfc3339(),
            "error": format!("{:#}", self.error),
        })
    }
}

pub(crate) struct FailureReporter {
    sender: Option<UnboundedSender<ActionFailure>>,
}

impl FailureReporter {
    pub(crate) fn new(sender: Option<UnboundedSender<ActionFailure>>) -> Self {
        Self { sender }
    }

    pub(crate) fn report(&self, auction_id: AuctionId, error: anyhow::Error) {
        let failure = ActionFailure {
            auction_id,
            occurred_at: Utc::now(),
            error,
        };
        error!("End action failed: {}", failure.as_json());
        metrics::END_ACTION_FAILURES.inc();

        if let Some(sender) = &self.sender {
            if sender.send(failure).is_err() {
                debug!(
                    "Failure channel closed, report for auction {} dropped",
                    auction_id
                );
            }
        }
    }
}
