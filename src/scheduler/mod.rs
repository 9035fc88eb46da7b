//! Auction countdown scheduling and execution.
//!
//! This module provides the timer registry that drives auction closing: one
//! resettable, cancellable delayed task per active auction, firing the bound
//! end action exactly once per countdown period.

mod action;
mod error;
mod failures;
pub mod metrics;
mod models;
mod policy;
mod registry;

pub use action::{EndAction, FnEndAction};
pub use error::SchedulerError;
pub use failures::ActionFailure;
pub use models::{AuctionId, TimerInfo};
pub use policy::SchedulingPolicy;
pub use registry::{create_scheduler, AuctionScheduler};
