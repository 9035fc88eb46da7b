use std::time::Duration;

use crate::config::TimerSettings;

/// Pure scheduling constants: the advertised countdown window and the
/// internal jitter buffer.
///
/// The window is what clients see as time left; the buffer is added on top of
/// it when arming the actual delayed task so that scheduler jitter cannot make
/// a timer fire before the advertised deadline. One delayed task represents
/// one countdown period; no backoff or retry applies to the timer mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingPolicy {
    window: Duration,
    buffer: Duration,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(30),
            buffer: Duration::from_secs(1),
        }
    }
}

impl SchedulingPolicy {
    pub fn new(window: Duration, buffer: Duration) -> Self {
        Self { window, buffer }
    }

    pub fn from_settings(settings: &TimerSettings) -> Self {
        Self {
            window: settings.window,
            buffer: settings.buffer,
        }
    }

    /// Window added per qualifying bid.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Internal jitter absorption, never reported as time left.
    pub fn buffer(&self) -> Duration {
        self.buffer
    }

    /// Delay actually armed for the standard window.
    pub fn armed_delay(&self) -> Duration {
        self.armed_delay_for(self.window)
    }

    /// Delay actually armed for an explicit window.
    pub fn armed_delay_for(&self, window: Duration) -> Duration {
        window + self.buffer
    }
}
