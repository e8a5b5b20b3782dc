//! Error types for EBU-STL reading and writing.

use subtext_timecode::TimecodeError;
use thiserror::Error;

/// Errors from STL parsing and generation.
#[derive(Error, Debug)]
pub enum StlError {
    /// Input shorter than the 1024-byte GSI block.
    #[error("input too short for GSI block: {len} bytes")]
    InputTooShort { len: usize },

    /// Disk format code outside the known set and no override given.
    #[error("unrecognized disk format code {dfc:?} and no frame rate override")]
    UnrecognizedFrameRate { dfc: String },

    /// A frame rate override that is not a positive real.
    #[error("invalid frame rate override: {value}")]
    InvalidFrameRate { value: f64 },

    /// A structural violation escalated to an error by the caller.
    #[error("structural: {0}")]
    Structural(String),

    /// Timecode arithmetic failure.
    #[error("timecode error: {0}")]
    Timecode(#[from] TimecodeError),

    /// I/O failure of the underlying sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`StlError`].
pub type Result<T> = std::result::Result<T, StlError>;
