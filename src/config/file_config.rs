use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Raw TOML configuration.
///
/// All fields are optional; missing values fall back to defaults during
/// resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub timer: Option<TimerFileConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimerFileConfig {
    /// Countdown window in seconds added per qualifying bid.
    pub window_secs: Option<u64>,

    /// Internal jitter buffer in milliseconds. Added on top of the window
    /// when arming a timer; never reported to clients as time left.
    pub buffer_millis: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }
}
