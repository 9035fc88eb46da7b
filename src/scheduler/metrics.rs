//! Prometheus metrics for the auction timer scheduler.

use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_gauge, IntCounter, IntGauge};

lazy_static! {
    /// Close timers armed, counting both initial schedules and resets.
    pub static ref TIMERS_SCHEDULED: IntCounter = register_int_counter!(
        "gavel_timers_scheduled_total",
        "Close timers armed, counting both initial schedules and resets"
    )
    .unwrap();

    /// Timers that replaced an existing one for the same auction.
    pub static ref TIMERS_RESET: IntCounter = register_int_counter!(
        "gavel_timers_reset_total",
        "Close timers that replaced an existing timer for the same auction"
    )
    .unwrap();

    /// Timers removed by an explicit cancel.
    pub static ref TIMERS_CANCELLED: IntCounter = register_int_counter!(
        "gavel_timers_cancelled_total",
        "Close timers removed by an explicit cancel"
    )
    .unwrap();

    /// Countdown periods that elapsed and invoked the end action.
    pub static ref TIMERS_FIRED: IntCounter = register_int_counter!(
        "gavel_timers_fired_total",
        "Countdown periods that elapsed and invoked the end action"
    )
    .unwrap();

    /// End-action invocations that returned an error.
    pub static ref END_ACTION_FAILURES: IntCounter = register_int_counter!(
        "gavel_end_action_failures_total",
        "End-action invocations that returned an error"
    )
    .unwrap();

    /// Currently armed close timers.
    pub static ref ACTIVE_TIMERS: IntGauge = register_int_gauge!(
        "gavel_active_timers",
        "Currently armed close timers"
    )
    .unwrap();
}
