//! Error types for bit-level decoding.

use thiserror::Error;

/// Errors from bit-level decoding of teletext transmission codes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitCodeError {
    /// A Hamming 8/4 byte with two or more flipped bits; the surrounding
    /// field cannot be trusted.
    #[error("uncorrectable Hamming 8/4 byte {raw:#04x}")]
    Hamming { raw: u8 },
}

/// Result type alias using [`BitCodeError`].
pub type Result<T> = std::result::Result<T, BitCodeError>;
