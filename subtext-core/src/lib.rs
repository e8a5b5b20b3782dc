//! # Subtext Core
//!
//! Bit-coding primitives shared by the Subtext broadcast subtitle crates:
//! the ETSI EN 300 706 Hamming 8/4 code used by teletext address and header
//! fields, and the odd-parity coding used by display bytes.

pub mod bitcode;
pub mod error;

pub use bitcode::{hamming_8_4, hamming_8_4_pair, odd_parity};
pub use error::{BitCodeError, Result};
