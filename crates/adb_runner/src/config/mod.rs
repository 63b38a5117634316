//! Configuration module
//!
//! This module contains:
//! - `timing`: timing parameters for gestures, pacing and timeouts
//! - the screen coordinates and assembly of the standard automation pass

mod timing;

pub use timing::TimingConfig;

use crate::gestures::{Coordinate, GestureSpec};
use crate::runner::Routine;
use crate::sequence::{ActionSequence, ActionStep};

/// Default number of automation passes
pub const DEFAULT_REPEAT_COUNT: u32 = 300;

/// Swipe of the standard pass, right-to-left across the screen
/// (adjust to the target device and app)
pub const SWIPE_START: (i32, i32) = (1000, 1400);
pub const SWIPE_END: (i32, i32) = (540, 1400);

/// Click points of the standard pass
pub const CLICK_POINTS: [(i32, i32); 3] = [(1126, 1466), (770, 2300), (939, 2525)];

/// Assemble the standard automation pass: let the device settle, swipe,
/// wait for the animation, then run the click batch.
pub fn default_routine(timing: &TimingConfig) -> Routine {
    let swipe = GestureSpec::Swipe {
        from: Coordinate::new(SWIPE_START.0, SWIPE_START.1),
        to: Coordinate::new(SWIPE_END.0, SWIPE_END.1),
        duration_ms: timing.default_swipe_duration_ms,
    };

    Routine {
        ready_wait: timing.device_ready_wait,
        sequence: ActionSequence::new(vec![ActionStep::immediate(swipe)]),
        animation_wait: timing.animation_wait,
        click_points: CLICK_POINTS
            .iter()
            .map(|&(x, y)| Coordinate::new(x, y))
            .collect(),
        click_interval: timing.click_interval,
    }
}
