//! adbrun - repeated ADB automation runs with success statistics
//!
//! Usage:
//!     adbrun [OPTIONS] [REPEAT_COUNT]
//!
//! Environment Variables:
//!     ADB_RUNNER_DEVICE_ID: ADB device ID for multi-device setups
//!     ADB_RUNNER_ADB_PATH: Path to the adb binary (default: adb)
//!     ADB_RUNNER_*: Timing overrides, see TimingConfig

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use adb_runner::{default_routine, AdbExecutor, Error, RunConfig, RunLoop, TimingConfig};

/// Repeated ADB automation runs with success statistics
#[derive(Parser, Debug)]
#[command(name = "adbrun")]
#[command(about = "Drive an Android device through a repeated automation pass")]
#[command(after_help = r#"Examples:
    # 300 passes with the default pacing
    adbrun

    # 100 passes
    adbrun 100

    # Slower pacing between passes
    adbrun 50 --interval 1.5

    # Target a specific device
    adbrun --device-id emulator-5554

    # Mirror the log into a file
    adbrun --log-file run.log

Exit code is 0 when at least 90% of the passes succeeded, 1 otherwise.
"#)]
struct Cli {
    /// Number of automation passes to run
    #[arg(default_value_t = adb_runner::DEFAULT_REPEAT_COUNT as i64)]
    repeat_count: i64,

    /// Pause between passes in seconds
    #[arg(long)]
    interval: Option<f64>,

    /// ADB device ID for multi-device setups
    #[arg(short = 'd', long, env = "ADB_RUNNER_DEVICE_ID")]
    device_id: Option<String>,

    /// Path to the adb binary
    #[arg(long, env = "ADB_RUNNER_ADB_PATH", default_value = "adb")]
    adb_path: String,

    /// Append the run log to this file in addition to the console
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Console logging, plus a plain-text file sink when requested
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer());

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(file)),
                )
                .init();
        }
        None => registry.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.log_file.as_deref())?;

    let timing = TimingConfig::default();
    let interval_secs = args
        .interval
        .unwrap_or_else(|| timing.operation_interval.as_secs_f64());

    let config = match RunConfig::new(args.repeat_count, interval_secs) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if which::which(&args.adb_path).is_err() {
        error!("{}", Error::ToolNotFound(args.adb_path.clone()));
        error!("Install Android platform-tools and make sure adb is on PATH:");
        error!("  - macOS: brew install android-platform-tools");
        error!("  - Linux: sudo apt install android-tools-adb");
        std::process::exit(1);
    }

    info!("ADB automation run starting");
    info!("Planned passes: {}", config.repeat_count);
    info!("Pass interval: {:.1} s", interval_secs);
    if let Some(device_id) = &args.device_id {
        info!("Target device: {}", device_id);
    }
    if let Some(log_file) = &args.log_file {
        info!("Log file: {}", log_file.display());
    }

    let mut executor = AdbExecutor::with_path(&args.adb_path);
    if let Some(device_id) = &args.device_id {
        executor = executor.with_device_id(device_id);
    }

    let routine = default_routine(&timing);
    let run_loop = RunLoop::new(config, timing, routine);
    let summary = run_loop
        .run(&executor, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    summary.log_report();
    std::process::exit(if summary.is_passing() { 0 } else { 1 });
}
