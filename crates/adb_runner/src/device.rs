//! Device connectivity gate
//!
//! Queries `adb devices` before each automation pass and admits the
//! pass only when at least one authorized device is attached. A failed
//! query is reported as "no devices", never as a fatal error.

use tracing::{error, info, warn};

use crate::config::TimingConfig;
use crate::executor::CommandRunner;

/// Authorization state as reported by the device listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Authorized,
    Unauthorized,
    Offline,
}

impl DeviceState {
    /// Map an adb state token. Anything unrecognized is treated as
    /// unauthorized since it is not usable either way.
    fn from_adb(token: &str) -> Self {
        match token {
            "device" => Self::Authorized,
            "offline" => Self::Offline,
            _ => Self::Unauthorized,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::Authorized => "connected and authorized",
            Self::Unauthorized => "unauthorized",
            Self::Offline => "offline",
        }
    }
}

/// A device attached to the bridge at query time. Produced fresh for
/// every connectivity check; never cached across passes.
#[derive(Debug, Clone)]
pub struct Device {
    pub id: String,
    pub state: DeviceState,
}

/// Parse `adb devices` output: the header line is discarded, blank
/// lines are skipped, remaining lines are tab-separated id/state pairs.
pub fn parse_devices(output: &str) -> Vec<Device> {
    output
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let (id, state) = line.split_once('\t')?;
            Some(Device {
                id: id.trim().to_string(),
                state: DeviceState::from_adb(state.trim()),
            })
        })
        .collect()
}

/// True iff at least one authorized device is attached
pub async fn check_connected(runner: &impl CommandRunner, timing: &TimingConfig) -> bool {
    info!("Checking device connection state...");
    let result = runner
        .run(&["devices".to_string()], timing.devices_timeout)
        .await;

    if !result.is_success() {
        error!("Could not query connected devices, is adb installed correctly?");
        return false;
    }

    let devices = parse_devices(&result.stdout);
    if devices.is_empty() {
        warn!("No connected devices detected");
        warn!("Make sure the device is connected over USB, USB debugging is enabled and this computer is authorized for debugging");
        return false;
    }

    info!("Detected {} connected device(s):", devices.len());
    for device in &devices {
        info!("  - {} [{}]", device.id, device.state.describe());
    }

    if devices.iter().any(|d| d.state == DeviceState::Authorized) {
        true
    } else {
        error!("No usable device (all devices unauthorized or offline)");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::FakeRunner;
    use crate::executor::CommandResult;

    const LISTING: &str =
        "List of devices attached\nemulator-5554\tdevice\n\nR58M123ABC\tunauthorized\nold-one\toffline\n";

    #[test]
    fn test_parse_devices_skips_header_and_blank_lines() {
        let devices = parse_devices(LISTING);
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].id, "emulator-5554");
        assert_eq!(devices[0].state, DeviceState::Authorized);
        assert_eq!(devices[1].state, DeviceState::Unauthorized);
        assert_eq!(devices[2].state, DeviceState::Offline);
    }

    #[test]
    fn test_parse_devices_header_only() {
        assert!(parse_devices("List of devices attached\n").is_empty());
    }

    #[test]
    fn test_unknown_state_is_not_authorized() {
        let devices = parse_devices("header\nsome-id\trecovery\n");
        assert_eq!(devices[0].state, DeviceState::Unauthorized);
    }

    #[tokio::test]
    async fn test_check_connected_with_authorized_device() {
        let runner = FakeRunner::scripted(vec![CommandResult::success(LISTING)]);
        assert!(check_connected(&runner, &TimingConfig::default()).await);
        assert_eq!(runner.calls()[0], vec!["devices"]);
    }

    #[tokio::test]
    async fn test_check_connected_all_unauthorized() {
        let listing = "List of devices attached\nR58M123ABC\tunauthorized\n";
        let runner = FakeRunner::scripted(vec![CommandResult::success(listing)]);
        assert!(!check_connected(&runner, &TimingConfig::default()).await);
    }

    #[tokio::test]
    async fn test_check_connected_query_failure_is_not_fatal() {
        let runner = FakeRunner::scripted(vec![CommandResult::failed("", "server not running")]);
        assert!(!check_connected(&runner, &TimingConfig::default()).await);
    }
}
