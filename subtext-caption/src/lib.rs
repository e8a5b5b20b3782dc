//! # subtext-caption
//!
//! Structured caption records with timing, inline styling and layout, plus
//! the segmenter that turns a decoded subtitle control/glyph stream into a
//! flat list of styled text runs.
//!
//! A caption carries `text` always; `style` when exactly one non-default
//! style covers the whole text; `segments` when styles vary inline; and
//! `layout` when the source block carries a usable vertical position or
//! justification. Absent and default are distinct: defaults are never
//! emitted.

pub mod segment;
pub mod types;

pub use segment::{SegmentedText, Segmenter, TextEvent};
pub use types::{Caption, Layout, Segment, Style, TeletextColor, TextAlign};
