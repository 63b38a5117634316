/// Error types for runner configuration and preflight checks
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Repeat count must be a positive integer, got {0}")]
    InvalidRepeatCount(i64),

    #[error("Interval must be positive, got {0}s")]
    InvalidInterval(f64),

    #[error("Device bridge tool not found: {0}")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
