//! adb_runner: repeated ADB automation with success statistics
//!
//! This library drives an Android device over the adb debug bridge:
//! - command execution with timeout and outcome classification
//! - a connectivity gate checked before every automation pass
//! - validated gesture primitives (tap, swipe, text input, key press)
//! - fail-fast and best-effort sequencing of gestures
//! - a bounded retry wrapper
//! - a run loop that repeats the pass N times and reports a success rate
//!
//! # Example
//!
//! ```no_run
//! use adb_runner::{default_routine, AdbExecutor, RunConfig, RunLoop, TimingConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let timing = TimingConfig::default();
//!     let routine = default_routine(&timing);
//!     let config = RunConfig::new(100, 0.5).unwrap();
//!
//!     let executor = AdbExecutor::new();
//!     let run_loop = RunLoop::new(config, timing, routine);
//!     let summary = run_loop
//!         .run(&executor, async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await;
//!
//!     summary.log_report();
//!     std::process::exit(if summary.is_passing() { 0 } else { 1 });
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Execution layers, leaves first
pub mod executor;

pub mod device;
pub mod gestures;
pub mod retry;
pub mod sequence;

pub mod runner;

// Re-export commonly used types and functions
pub use error::{Error, Result};

// Config re-exports
pub use config::{
    default_routine, TimingConfig, CLICK_POINTS, DEFAULT_REPEAT_COUNT, SWIPE_END, SWIPE_START,
};

// Executor re-exports
pub use executor::{AdbExecutor, CommandResult, CommandRunner, CommandStatus};

// Device re-exports
pub use device::{check_connected, parse_devices, Device, DeviceState};

// Gesture re-exports
pub use gestures::{
    escape_text, input_text, key_name, press_key, send, swipe, tap, Coordinate, GestureSpec,
};

// Sequencing re-exports
pub use retry::retry;
pub use sequence::{run_click_sequence, ActionSequence, ActionStep, ClickBatch};

// Run loop re-exports
pub use runner::{RunConfig, RunLoop, Routine, RunSummary, SUCCESS_RATE_THRESHOLD};
