//! Timing configuration for device operations

use std::env;
use std::time::Duration;

fn env_secs(key: &str, default: f64) -> Duration {
    let secs = env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_secs_f64(secs)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Timing parameters for the automation pass. Constructed once and
/// passed by value into the run loop; never held as process-wide state.
#[derive(Debug, Clone)]
pub struct TimingConfig {
    /// Wait before the first gesture of a pass
    pub device_ready_wait: Duration,
    /// Wait after the swipe for the UI animation to finish
    pub animation_wait: Duration,
    /// Default pause between automation passes
    pub operation_interval: Duration,
    /// Pause between taps in a click batch
    pub click_interval: Duration,
    /// Swipe duration when the caller does not provide one
    pub default_swipe_duration_ms: u32,
    /// Per-invocation bound on a gesture command
    pub command_timeout: Duration,
    /// Per-invocation bound on the device listing query
    pub devices_timeout: Duration,
    /// Extra attempts for the connectivity gate
    pub gate_retries: u32,
    /// Pause between gate attempts
    pub gate_retry_interval: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            device_ready_wait: env_secs("ADB_RUNNER_DEVICE_READY_WAIT", 2.0),
            animation_wait: env_secs("ADB_RUNNER_ANIMATION_WAIT", 1.0),
            operation_interval: env_secs("ADB_RUNNER_OPERATION_INTERVAL", 0.5),
            click_interval: env_secs("ADB_RUNNER_CLICK_INTERVAL", 1.0),
            default_swipe_duration_ms: env_u32("ADB_RUNNER_SWIPE_DURATION_MS", 300),
            command_timeout: env_secs("ADB_RUNNER_COMMAND_TIMEOUT", 30.0),
            devices_timeout: env_secs("ADB_RUNNER_DEVICES_TIMEOUT", 10.0),
            gate_retries: env_u32("ADB_RUNNER_GATE_RETRIES", 3),
            gate_retry_interval: env_secs("ADB_RUNNER_GATE_RETRY_INTERVAL", 1.0),
        }
    }
}
