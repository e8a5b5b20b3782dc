//! # Subtext Charset
//!
//! Character tables for broadcast subtitle decoding:
//!
//! - the teletext G0 display sets of ETSI EN 300 706: a Latin base table
//!   with thirteen national option subsets, plus Cyrillic, Greek, Arabic and
//!   Hebrew variants covering the full 7-bit range;
//! - the EBU Tech 3264-E character code tables selected by the GSI CCT
//!   field, decoded through ISO 6937 and ISO 8859-5/6/7/8.

pub mod g0;
pub mod stl;

pub use g0::{G0Set, NationalOption};
pub use stl::CodeTable;
