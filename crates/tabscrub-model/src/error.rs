use thiserror::Error;

/// Errors a cleaning run can fail with.
///
/// Every variant is fatal for the run; non-fatal conditions are carried as
/// [`crate::RepairWarning`] values inside the report instead.
#[derive(Debug, Error)]
pub enum CleanError {
    /// The input bytes are malformed under the detected (or any fallback) encoding.
    #[error("cannot decode input as {encoding}")]
    Decode { encoding: String },

    /// The delimiter produced a ragged table and no repair policy is configured.
    #[error("ragged row {row}: expected {expected} columns, found {found}")]
    Parse {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A configuration value is unusable for this input, detected before any mutation.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, CleanError>;
