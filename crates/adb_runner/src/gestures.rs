//! Gesture primitives for Android device input
//!
//! Each primitive validates its semantic parameters, builds exactly one
//! adb invocation and reports plain success or failure. Invalid input
//! is rejected before the executor is ever touched.

use std::fmt;

use phf::phf_map;
use tracing::{error, info, warn};

use crate::config::TimingConfig;
use crate::executor::CommandRunner;

/// Screen position in pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One simulated input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureSpec {
    Tap(Coordinate),
    Swipe {
        from: Coordinate,
        to: Coordinate,
        duration_ms: u32,
    },
    TextInput(String),
    KeyPress(i32),
}

impl fmt::Display for GestureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tap(c) => write!(f, "tap at ({}, {})", c.x, c.y),
            Self::Swipe {
                from,
                to,
                duration_ms,
            } => write!(
                f,
                "swipe ({}, {}) -> ({}, {}) over {}ms",
                from.x, from.y, to.x, to.y, duration_ms
            ),
            Self::TextInput(text) => write!(f, "input text '{}'", text),
            Self::KeyPress(keycode) => write!(f, "press {}", key_name(*keycode)),
        }
    }
}

/// Human-readable names for common Android keycodes, used for logging only
static KEY_NAMES: phf::Map<i32, &'static str> = phf_map! {
    3i32 => "HOME",
    4i32 => "BACK",
    24i32 => "VOLUME_UP",
    25i32 => "VOLUME_DOWN",
    26i32 => "POWER",
    66i32 => "ENTER",
    67i32 => "DEL",
    82i32 => "MENU",
    84i32 => "SEARCH",
};

/// Name for a keycode; unknown codes render as `KEYCODE_<n>`
pub fn key_name(keycode: i32) -> String {
    KEY_NAMES
        .get(&keycode)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("KEYCODE_{}", keycode))
}

/// Escape text for `input text` so it survives shell tokenization on
/// the device intact: space becomes `%s`, quoting and grouping
/// characters get a backslash. Pure transform, kept apart from command
/// construction.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            ' ' => escaped.push_str("%s"),
            '\'' | '"' | '&' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Tap at the specified coordinates
pub async fn tap(runner: &impl CommandRunner, timing: &TimingConfig, x: i32, y: i32) -> bool {
    if x < 0 || y < 0 {
        error!("Tap coordinates must be non-negative, got ({}, {})", x, y);
        return false;
    }

    info!("Tapping at ({}, {})", x, y);
    let args = vec![
        "shell".into(),
        "input".into(),
        "tap".into(),
        x.to_string(),
        y.to_string(),
    ];
    runner.run(&args, timing.command_timeout).await.is_success()
}

/// Swipe from start to end coordinates. Falls back to the configured
/// default duration when none is given.
pub async fn swipe(
    runner: &impl CommandRunner,
    timing: &TimingConfig,
    start_x: i32,
    start_y: i32,
    end_x: i32,
    end_y: i32,
    duration_ms: Option<u32>,
) -> bool {
    let duration_ms = duration_ms.unwrap_or(timing.default_swipe_duration_ms);

    if [start_x, start_y, end_x, end_y].iter().any(|&c| c < 0) {
        error!(
            "Swipe coordinates must be non-negative, got ({}, {}) -> ({}, {})",
            start_x, start_y, end_x, end_y
        );
        return false;
    }
    if duration_ms == 0 {
        error!("Swipe duration must be positive");
        return false;
    }

    info!(
        "Swiping from ({}, {}) to ({}, {}) over {}ms",
        start_x, start_y, end_x, end_y, duration_ms
    );
    let args = vec![
        "shell".into(),
        "input".into(),
        "swipe".into(),
        start_x.to_string(),
        start_y.to_string(),
        end_x.to_string(),
        end_y.to_string(),
        duration_ms.to_string(),
    ];
    runner.run(&args, timing.command_timeout).await.is_success()
}

/// Type text into the currently focused input field. Empty or
/// whitespace-only text is a successful no-op.
pub async fn input_text(runner: &impl CommandRunner, timing: &TimingConfig, text: &str) -> bool {
    if text.trim().is_empty() {
        warn!("Input text is empty, skipping");
        return true;
    }

    let escaped = escape_text(text);
    info!("Typing text '{}' (escaped: '{}')", text, escaped);
    let args = vec![
        "shell".into(),
        "input".into(),
        "text".into(),
        format!("'{}'", escaped),
    ];
    runner.run(&args, timing.command_timeout).await.is_success()
}

/// Send a key event to the device
pub async fn press_key(runner: &impl CommandRunner, timing: &TimingConfig, keycode: i32) -> bool {
    if keycode < 0 {
        error!("Keycode must be non-negative, got {}", keycode);
        return false;
    }

    info!("Pressing {} (keycode: {})", key_name(keycode), keycode);
    let args = vec![
        "shell".into(),
        "input".into(),
        "keyevent".into(),
        keycode.to_string(),
    ];
    runner.run(&args, timing.command_timeout).await.is_success()
}

/// Dispatch a gesture spec to the matching primitive
pub async fn send(
    runner: &impl CommandRunner,
    timing: &TimingConfig,
    gesture: &GestureSpec,
) -> bool {
    match gesture {
        GestureSpec::Tap(c) => tap(runner, timing, c.x, c.y).await,
        GestureSpec::Swipe {
            from,
            to,
            duration_ms,
        } => {
            swipe(
                runner,
                timing,
                from.x,
                from.y,
                to.x,
                to.y,
                Some(*duration_ms),
            )
            .await
        }
        GestureSpec::TextInput(text) => input_text(runner, timing, text).await,
        GestureSpec::KeyPress(keycode) => press_key(runner, timing, *keycode).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::FakeRunner;

    fn timing() -> TimingConfig {
        TimingConfig::default()
    }

    /// Inverse of `escape_text`, for round-trip checks
    fn unescape_text(escaped: &str) -> String {
        let mut out = String::with_capacity(escaped.len());
        let mut chars = escaped.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '%' && chars.peek() == Some(&'s') {
                chars.next();
                out.push(' ');
            } else if ch == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(ch);
            }
        }
        out
    }

    #[tokio::test]
    async fn test_tap_rejects_negative_coordinates_without_executor_call() {
        let runner = FakeRunner::always_ok();
        assert!(!tap(&runner, &timing(), -1, 100).await);
        assert!(!tap(&runner, &timing(), 100, -1).await);
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_tap_builds_input_tap_command() {
        let runner = FakeRunner::always_ok();
        assert!(tap(&runner, &timing(), 100, 200).await);
        assert_eq!(
            runner.calls()[0],
            vec!["shell", "input", "tap", "100", "200"]
        );
    }

    #[tokio::test]
    async fn test_swipe_rejects_invalid_parameters_without_executor_call() {
        let runner = FakeRunner::always_ok();
        assert!(!swipe(&runner, &timing(), -1, 0, 10, 10, None).await);
        assert!(!swipe(&runner, &timing(), 0, 0, 10, 10, Some(0)).await);
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_swipe_uses_default_duration() {
        let runner = FakeRunner::always_ok();
        assert!(swipe(&runner, &timing(), 900, 500, 100, 500, None).await);
        let call = &runner.calls()[0];
        assert_eq!(call[2], "swipe");
        assert_eq!(call[7], timing().default_swipe_duration_ms.to_string());
    }

    #[tokio::test]
    async fn test_input_text_blank_is_noop_success() {
        let runner = FakeRunner::always_ok();
        assert!(input_text(&runner, &timing(), "").await);
        assert!(input_text(&runner, &timing(), "   ").await);
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_input_text_sends_escaped_text() {
        let runner = FakeRunner::always_ok();
        assert!(input_text(&runner, &timing(), "hello world").await);
        assert_eq!(runner.calls()[0][3], "'hello%sworld'");
    }

    #[test]
    fn test_escape_round_trip() {
        let samples = [
            "plain",
            "hello world",
            "it's \"quoted\"",
            "a & b (c) 'd'",
            "  leading and trailing  ",
            "(&)'\"",
        ];
        for text in samples {
            assert_eq!(unescape_text(&escape_text(text)), text, "text: {:?}", text);
        }
    }

    #[test]
    fn test_key_names() {
        assert_eq!(key_name(3), "HOME");
        assert_eq!(key_name(4), "BACK");
        assert_eq!(key_name(66), "ENTER");
        assert_eq!(key_name(99), "KEYCODE_99");
    }

    #[tokio::test]
    async fn test_press_key_rejects_negative_keycode() {
        let runner = FakeRunner::always_ok();
        assert!(!press_key(&runner, &timing(), -4).await);
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_send_dispatches_key_press() {
        let runner = FakeRunner::always_ok();
        assert!(send(&runner, &timing(), &GestureSpec::KeyPress(4)).await);
        assert_eq!(runner.calls()[0], vec!["shell", "input", "keyevent", "4"]);
    }
}
