//! Error types for timecode operations.

use thiserror::Error;

/// Errors from timecode construction and parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    /// A timecode component is out of range.
    #[error("invalid {field}: {value} (maximum {max})")]
    InvalidComponent {
        field: &'static str,
        value: u32,
        max: u32,
    },

    /// A frame rate with a zero denominator or otherwise unusable value.
    #[error("invalid frame rate {numerator}/{denominator}")]
    InvalidFrameRate { numerator: u32, denominator: u32 },

    /// A timecode string that does not match HH:MM:SS:FF / HH:MM:SS;FF.
    #[error("invalid timecode format: {0}")]
    InvalidFormat(String),

    /// Drop-frame constraints violated.
    #[error("drop-frame error: {0}")]
    DropFrame(String),
}

impl TimecodeError {
    pub fn invalid_component(field: &'static str, value: u32, max: u32) -> Self {
        TimecodeError::InvalidComponent { field, value, max }
    }

    pub fn invalid_format(msg: impl Into<String>) -> Self {
        TimecodeError::InvalidFormat(msg.into())
    }
}

/// Result type alias using [`TimecodeError`].
pub type Result<T> = std::result::Result<T, TimecodeError>;
