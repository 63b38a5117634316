//! The repeating run loop with success statistics
//!
//! Repeats the configured automation pass N times, gating every pass on
//! device connectivity, and aggregates success counts for the final
//! report and exit-code decision.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::config::TimingConfig;
use crate::device;
use crate::error::{Error, Result};
use crate::executor::CommandRunner;
use crate::gestures::Coordinate;
use crate::retry::retry;
use crate::sequence::{run_click_sequence, ActionSequence};

/// A run passes overall when at least this share of passes succeeded
pub const SUCCESS_RATE_THRESHOLD: f64 = 0.9;

/// Validated loop configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub repeat_count: u32,
    pub interval: Duration,
}

impl RunConfig {
    /// Validate raw CLI values. Rejected before any device interaction.
    pub fn new(repeat_count: i64, interval_secs: f64) -> Result<Self> {
        if repeat_count <= 0 {
            return Err(Error::InvalidRepeatCount(repeat_count));
        }
        if !interval_secs.is_finite() || interval_secs < 0.0 {
            return Err(Error::InvalidInterval(interval_secs));
        }
        Ok(Self {
            repeat_count: repeat_count as u32,
            interval: Duration::from_secs_f64(interval_secs),
        })
    }
}

/// The fixed automation pass executed on every iteration: settle the
/// device, run the fail-fast sequence, wait out the animation, then
/// run the best-effort click batch. An explicit immutable value so two
/// loops in one process cannot contaminate each other.
#[derive(Debug, Clone)]
pub struct Routine {
    pub ready_wait: Duration,
    pub sequence: ActionSequence,
    pub animation_wait: Duration,
    pub click_points: Vec<Coordinate>,
    pub click_interval: Duration,
}

/// Aggregated outcome of a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Iterations the configuration asked for
    pub planned: u32,
    /// Iterations that ran to completion (an interrupted one counts as neither)
    pub attempted: u32,
    pub succeeded: u32,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Successes over *planned* iterations, so an interrupted run is
    /// judged against what it was asked to do.
    pub fn success_rate(&self) -> f64 {
        if self.planned == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.planned as f64
        }
    }

    pub fn is_passing(&self) -> bool {
        self.success_rate() >= SUCCESS_RATE_THRESHOLD
    }

    /// Final statistics block; always emitted, interrupted runs included
    pub fn log_report(&self) {
        info!("{}", "=".repeat(50));
        info!("Run finished - statistics:");
        info!("Total elapsed time: {:.2} s", self.elapsed.as_secs_f64());
        info!("Planned iterations: {}", self.planned);
        info!("Completed iterations: {}", self.attempted);
        info!("Successful iterations: {}", self.succeeded);
        info!("Success rate: {:.1}%", self.success_rate() * 100.0);
        if self.planned > 0 {
            info!(
                "Mean iteration duration: {:.2} s",
                self.elapsed.as_secs_f64() / self.planned as f64
            );
        }
        info!("{}", "=".repeat(50));
    }
}

/// Drives the automation pass `repeat_count` times
pub struct RunLoop {
    config: RunConfig,
    timing: TimingConfig,
    routine: Routine,
}

impl RunLoop {
    pub fn new(config: RunConfig, timing: TimingConfig, routine: Routine) -> Self {
        Self {
            config,
            timing,
            routine,
        }
    }

    /// Run the loop to completion or until `shutdown` resolves.
    ///
    /// `shutdown` is any future (production wires up ctrl-c); when it
    /// wins the race the in-flight iteration is cancelled and counts as
    /// neither success nor failure. A subprocess already spawned is
    /// left to finish or time out on its own.
    pub async fn run(
        &self,
        runner: &impl CommandRunner,
        shutdown: impl Future<Output = ()>,
    ) -> RunSummary {
        let planned = self.config.repeat_count;
        let start = Instant::now();
        let mut attempted = 0u32;
        let mut succeeded = 0u32;

        tokio::pin!(shutdown);

        for i in 0..planned {
            info!("===== Iteration {}/{} =====", i + 1, planned);

            let passed = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Interrupted, stopping the run");
                    break;
                }
                passed = self.run_iteration(runner) => passed,
            };

            attempted += 1;
            if passed {
                succeeded += 1;
                info!("Iteration {} completed successfully", i + 1);
            } else {
                error!("Iteration {} failed", i + 1);
            }
            info!(
                "Overall progress: {:.1}% ({}/{})",
                (i + 1) as f64 / planned as f64 * 100.0,
                i + 1,
                planned
            );

            if i + 1 < planned {
                tokio::select! {
                    biased;
                    _ = &mut shutdown => {
                        info!("Interrupted, stopping the run");
                        break;
                    }
                    _ = tokio::time::sleep(self.config.interval) => {}
                }
            }
        }

        RunSummary {
            planned,
            attempted,
            succeeded,
            elapsed: start.elapsed(),
        }
    }

    /// One full pass: connectivity gate, then the routine
    async fn run_iteration(&self, runner: &impl CommandRunner) -> bool {
        let connected = retry(
            || device::check_connected(runner, &self.timing),
            self.timing.gate_retries,
            self.timing.gate_retry_interval,
        )
        .await;
        if !connected {
            error!("Device connectivity check failed, skipping this iteration");
            return false;
        }

        if !self.routine.ready_wait.is_zero() {
            info!("Waiting for the device to settle...");
            tokio::time::sleep(self.routine.ready_wait).await;
        }

        if !self.routine.sequence.run(runner, &self.timing).await {
            error!("Automation sequence failed");
            return false;
        }

        if !self.routine.click_points.is_empty() {
            if !self.routine.animation_wait.is_zero() {
                info!("Waiting for the animation to finish...");
                tokio::time::sleep(self.routine.animation_wait).await;
            }
            let batch = run_click_sequence(
                runner,
                &self.timing,
                &self.routine.click_points,
                self.routine.click_interval,
            )
            .await;
            if !batch.all_succeeded() {
                error!("Click sequence failed");
                return false;
            }
        }

        info!("Automation pass finished");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::FakeRunner;
    use crate::executor::CommandResult;
    use crate::gestures::GestureSpec;
    use crate::sequence::ActionStep;
    use std::future::pending;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    const LISTING: &str = "List of devices attached\nemulator-5554\tdevice\n";

    /// Timing config with no sleeps and no gate retries
    fn fast_timing() -> TimingConfig {
        TimingConfig {
            device_ready_wait: Duration::ZERO,
            animation_wait: Duration::ZERO,
            operation_interval: Duration::ZERO,
            click_interval: Duration::ZERO,
            default_swipe_duration_ms: 300,
            command_timeout: Duration::from_secs(5),
            devices_timeout: Duration::from_secs(5),
            gate_retries: 0,
            gate_retry_interval: Duration::ZERO,
        }
    }

    /// Single-tap routine with no waits and no click batch
    fn tap_routine() -> Routine {
        Routine {
            ready_wait: Duration::ZERO,
            sequence: ActionSequence::new(vec![ActionStep::immediate(GestureSpec::Tap(
                Coordinate::new(10, 10),
            ))]),
            animation_wait: Duration::ZERO,
            click_points: Vec::new(),
            click_interval: Duration::ZERO,
        }
    }

    fn run_loop(repeat_count: u32) -> RunLoop {
        let config = RunConfig {
            repeat_count,
            interval: Duration::ZERO,
        };
        RunLoop::new(config, fast_timing(), tap_routine())
    }

    /// Each iteration issues two commands: the gate query and the tap.
    fn iterations(outcomes: &[bool]) -> Vec<CommandResult> {
        let mut script = Vec::new();
        for &ok in outcomes {
            script.push(CommandResult::success(LISTING));
            script.push(if ok {
                CommandResult::success("")
            } else {
                CommandResult::failed("", "injection failed")
            });
        }
        script
    }

    #[test]
    fn test_config_rejects_non_positive_repeat_count() {
        assert!(matches!(
            RunConfig::new(0, 0.5),
            Err(Error::InvalidRepeatCount(0))
        ));
        assert!(matches!(
            RunConfig::new(-5, 0.5),
            Err(Error::InvalidRepeatCount(-5))
        ));
        assert!(RunConfig::new(300, 0.5).is_ok());
    }

    #[test]
    fn test_config_rejects_negative_interval() {
        assert!(matches!(
            RunConfig::new(1, -1.0),
            Err(Error::InvalidInterval(_))
        ));
    }

    #[tokio::test]
    async fn test_all_iterations_succeeding_passes() {
        let runner = FakeRunner::scripted(iterations(&[true; 5]));
        let summary = run_loop(5).run(&runner, pending()).await;

        assert_eq!(summary.planned, 5);
        assert_eq!(summary.attempted, 5);
        assert_eq!(summary.succeeded, 5);
        assert!((summary.success_rate() - 1.0).abs() < f64::EPSILON);
        assert!(summary.is_passing());
    }

    #[tokio::test]
    async fn test_one_failure_in_five_falls_below_threshold() {
        let runner = FakeRunner::scripted(iterations(&[true, true, false, true, true]));
        let summary = run_loop(5).run(&runner, pending()).await;

        assert_eq!(summary.succeeded, 4);
        assert!((summary.success_rate() - 0.8).abs() < f64::EPSILON);
        assert!(!summary.is_passing());
    }

    #[tokio::test]
    async fn test_gate_failure_counts_as_failed_iteration_without_gestures() {
        // Gate query fails: the tap must never be issued.
        let runner = FakeRunner::scripted(vec![CommandResult::failed("", "no adb server")]);
        let summary = run_loop(1).run(&runner, pending()).await;

        assert_eq!(summary.succeeded, 0);
        assert_eq!(runner.call_count(), 1);
    }

    /// Runner that resolves a shutdown signal once a given number of
    /// commands have been executed.
    struct InterruptingRunner {
        inner: FakeRunner,
        count: AtomicUsize,
        trigger_at: usize,
        tx: Mutex<Option<oneshot::Sender<()>>>,
    }

    impl CommandRunner for InterruptingRunner {
        async fn run(&self, args: &[String], timeout: Duration) -> CommandResult {
            let result = self.inner.run(args, timeout).await;
            let n = self.count.fetch_add(1, Ordering::SeqCst) + 1;
            if n == self.trigger_at {
                if let Some(tx) = self.tx.lock().unwrap().take() {
                    let _ = tx.send(());
                }
            }
            result
        }
    }

    #[tokio::test]
    async fn test_interrupt_stops_the_loop_after_completed_iterations() {
        // Shutdown fires as iteration 3's last command completes; the
        // loop must stop with exactly 3 iterations attempted out of 10.
        let (tx, rx) = oneshot::channel();
        let runner = InterruptingRunner {
            inner: FakeRunner::scripted(iterations(&[true; 10])),
            count: AtomicUsize::new(0),
            trigger_at: 6,
            tx: Mutex::new(Some(tx)),
        };

        let summary = run_loop(10)
            .run(&runner, async {
                let _ = rx.await;
            })
            .await;

        assert_eq!(summary.planned, 10);
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(runner.inner.call_count(), 6);
        assert!(!summary.is_passing());
    }
}
