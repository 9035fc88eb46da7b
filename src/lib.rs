//! Per-auction countdown scheduling for a live-auction backend.
//!
//! Every active auction owns a single resettable close timer. Qualifying bids
//! push the deadline back by a fixed window; when a timer elapses without
//! another reset, the bound domain close action runs exactly once for that
//! countdown period. Cancellation (buy-now, manual close, deletion) removes
//! the timer without firing.
//!
//! This crate is a purely in-process primitive: the HTTP layer, persistence
//! and notification delivery are external collaborators that call into the
//! scheduler and supply the close action.

pub mod config;
pub mod scheduler;
