//! # subtext-timecode
//!
//! SMPTE 12M timecode support for the Subtext subtitle crates:
//!
//! - standard broadcast frame rates, including the fractional NTSC rates;
//! - drop-frame arithmetic per SMPTE ST 12-1 (two frame numbers dropped at
//!   the start of every minute except each tenth, four at 59.94 fps);
//! - exact conversion between `(HH, MM, SS, FF)` tuples, microseconds and
//!   SMPTE strings, with microseconds as the canonical internal unit.
//!
//! ```rust
//! use subtext_timecode::{frames_to_us, us_to_smpte, FrameRate};
//!
//! let us = frames_to_us(0, 0, 1, 0, FrameRate::Fps25).unwrap();
//! assert_eq!(us, 1_000_000);
//! assert_eq!(us_to_smpte(us, FrameRate::Fps25), "00:00:01:00");
//! ```

mod dropframe;
mod error;
mod smpte;

pub use dropframe::is_dropped_frame;
pub use error::{Result, TimecodeError};
pub use smpte::{frames_to_us, parse_smpte, us_to_smpte, FrameRate, Timecode};
