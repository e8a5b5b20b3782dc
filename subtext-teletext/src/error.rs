//! Error types for teletext decoding.

use subtext_core::BitCodeError;
use thiserror::Error;

/// Errors from teletext packet decoding.
///
/// A failed packet is dropped by the caller; decoding continues with the
/// next packet.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeletextError {
    /// Packet shorter than the 42 bytes of address plus payload.
    #[error("teletext packet too short: {len} bytes")]
    TooShort { len: usize },

    /// An address or header field failed Hamming protection.
    #[error("protected field unreadable: {0}")]
    BitCode(#[from] BitCodeError),
}

/// Result type alias using [`TeletextError`].
pub type Result<T> = std::result::Result<T, TeletextError>;
