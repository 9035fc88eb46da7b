mod file_config;

pub use file_config::{FileConfig, TimerFileConfig};

use anyhow::{bail, Result};
use std::time::Duration;

/// Resolved timer settings.
///
/// Defaults match the production constants: a 30 second window per qualifying
/// bid and a 1 second internal jitter buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSettings {
    pub window: Duration,
    pub buffer: Duration,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(30),
            buffer: Duration::from_secs(1),
        }
    }
}

impl TimerSettings {
    /// Resolve settings from an optional TOML file config over the defaults.
    pub fn resolve(file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default().timer.unwrap_or_default();
        let defaults = Self::default();

        let window = file
            .window_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.window);
        let buffer = file
            .buffer_millis
            .map(Duration::from_millis)
            .unwrap_or(defaults.buffer);

        if window.is_zero() {
            bail!("timer window must be greater than zero");
        }
        if buffer >= window {
            bail!(
                "timer buffer ({:?}) must be shorter than the window ({:?})",
                buffer,
                window
            );
        }

        Ok(Self { window, buffer })
    }
}
