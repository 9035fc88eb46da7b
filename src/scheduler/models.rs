use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque auction key. The persistence layer uses integer primary keys, so
/// this wraps an `i64`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AuctionId(pub i64);

impl fmt::Display for AuctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for AuctionId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Snapshot of one active close timer.
///
/// `deadline` is the advertised deadline (armed-at plus window). The internal
/// jitter buffer is not included; clients must never see it as time left.
#[derive(Debug, Clone, Serialize)]
pub struct TimerInfo {
    pub auction_id: AuctionId,
    pub armed_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}
