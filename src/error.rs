use thiserror::Error;

/// Errors from exact-position reads. Tolerant reads (`substr`) and edits clamp
/// instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RopeError {
    #[error("index {index} is out of range for rope of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("line {line} is out of range for rope with {line_count} lines")]
    LineOutOfRange { line: usize, line_count: usize },
}
