//! Composing gesture primitives into ordered routines
//!
//! Two deliberately distinct strategies live here: the fail-fast
//! [`ActionSequence`], which aborts at the first failing step, and the
//! best-effort [`run_click_sequence`], which attempts every tap in a
//! batch and reports how many landed.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::TimingConfig;
use crate::executor::CommandRunner;
use crate::gestures::{self, Coordinate, GestureSpec};

/// One gesture plus the pause that follows it
#[derive(Debug, Clone)]
pub struct ActionStep {
    pub gesture: GestureSpec,
    pub wait_after: Duration,
}

impl ActionStep {
    pub fn new(gesture: GestureSpec, wait_after: Duration) -> Self {
        Self { gesture, wait_after }
    }

    /// A step with no pause after it
    pub fn immediate(gesture: GestureSpec) -> Self {
        Self::new(gesture, Duration::ZERO)
    }
}

/// Ordered list of steps, replayed unchanged on every pass
#[derive(Debug, Clone)]
pub struct ActionSequence {
    steps: Vec<ActionStep>,
}

impl ActionSequence {
    pub fn new(steps: Vec<ActionStep>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run all steps strictly in order, fail-fast: the first failing
    /// step aborts the remainder. The post-step wait is skipped after
    /// the final step. True only if every step succeeded.
    pub async fn run(&self, runner: &impl CommandRunner, timing: &TimingConfig) -> bool {
        for (i, step) in self.steps.iter().enumerate() {
            info!("Step {}/{}: {}", i + 1, self.steps.len(), step.gesture);
            if !gestures::send(runner, timing, &step.gesture).await {
                error!(
                    "Step {}/{} failed ({}), aborting sequence",
                    i + 1,
                    self.steps.len(),
                    step.gesture
                );
                return false;
            }
            if i + 1 < self.steps.len() && !step.wait_after.is_zero() {
                tokio::time::sleep(step.wait_after).await;
            }
        }
        true
    }
}

/// Outcome of a best-effort click batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickBatch {
    pub attempted: usize,
    pub succeeded: usize,
}

impl ClickBatch {
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.attempted
    }

    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            1.0
        } else {
            self.succeeded as f64 / self.attempted as f64
        }
    }
}

/// Tap every point in order with a shared interval between taps,
/// best-effort: an individual miss is counted but does not stop the
/// batch. The batch as a whole succeeds only when every tap landed.
pub async fn run_click_sequence(
    runner: &impl CommandRunner,
    timing: &TimingConfig,
    points: &[Coordinate],
    interval: Duration,
) -> ClickBatch {
    if points.is_empty() {
        warn!("Click point list is empty");
        return ClickBatch {
            attempted: 0,
            succeeded: 0,
        };
    }

    info!("Starting click sequence with {} taps", points.len());
    let mut succeeded = 0;
    for (i, point) in points.iter().enumerate() {
        info!("Tap {}/{}", i + 1, points.len());
        if gestures::tap(runner, timing, point.x, point.y).await {
            succeeded += 1;
            if i + 1 < points.len() {
                tokio::time::sleep(interval).await;
            }
        } else {
            error!("Tap {}/{} failed: ({}, {})", i + 1, points.len(), point.x, point.y);
        }
    }

    let batch = ClickBatch {
        attempted: points.len(),
        succeeded,
    };
    info!(
        "Click sequence finished, success rate {:.1}% ({}/{})",
        batch.success_rate() * 100.0,
        batch.succeeded,
        batch.attempted
    );
    batch
}
