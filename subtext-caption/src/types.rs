//! Caption record types.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Teletext level-1 colors, shared by spacing attributes and STL text-field
/// control codes 0x00..=0x07.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TeletextColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl TeletextColor {
    /// Maps a 3-bit color code.
    pub fn from_code(code: u8) -> Self {
        match code & 0x07 {
            0 => TeletextColor::Black,
            1 => TeletextColor::Red,
            2 => TeletextColor::Green,
            3 => TeletextColor::Yellow,
            4 => TeletextColor::Blue,
            5 => TeletextColor::Magenta,
            6 => TeletextColor::Cyan,
            _ => TeletextColor::White,
        }
    }

    /// The 3-bit color code.
    pub fn code(self) -> u8 {
        match self {
            TeletextColor::Black => 0,
            TeletextColor::Red => 1,
            TeletextColor::Green => 2,
            TeletextColor::Yellow => 3,
            TeletextColor::Blue => 4,
            TeletextColor::Magenta => 5,
            TeletextColor::Cyan => 6,
            TeletextColor::White => 7,
        }
    }

    /// The CSS-style color name.
    pub fn name(self) -> &'static str {
        match self {
            TeletextColor::Black => "black",
            TeletextColor::Red => "red",
            TeletextColor::Green => "green",
            TeletextColor::Yellow => "yellow",
            TeletextColor::Blue => "blue",
            TeletextColor::Magenta => "magenta",
            TeletextColor::Cyan => "cyan",
            TeletextColor::White => "white",
        }
    }
}

impl fmt::Display for TeletextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inline style attributes of a text run.
///
/// The default style (white on transparent, steady, normal height, no
/// decoration) compares equal to `Style::default()` and is never emitted.
/// `color: None` means white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub color: Option<TeletextColor>,
    pub background_color: Option<TeletextColor>,
    pub italic: bool,
    pub bold: bool,
    pub underline: bool,
    pub flash: bool,
    pub double_height: bool,
}

impl Style {
    /// Whether every attribute is at its default.
    pub fn is_default(&self) -> bool {
        *self == Style::default()
    }
}

impl Serialize for Style {
    /// Serializes to the CSS-like mapping; default attributes are omitted.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(color) = self.color {
            map.serialize_entry("color", color.name())?;
        }
        if let Some(background) = self.background_color {
            map.serialize_entry("background-color", background.name())?;
        }
        if self.italic {
            map.serialize_entry("font-style", "italic")?;
        }
        if self.bold {
            map.serialize_entry("font-weight", "bold")?;
        }
        if self.underline {
            map.serialize_entry("text-decoration", "underline")?;
        }
        if self.flash {
            map.serialize_entry("visibility", "flash")?;
        }
        if self.double_height {
            map.serialize_entry("line-height", "double")?;
        }
        map.end()
    }
}

/// Horizontal alignment from the TTI justification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Maps a justification code; `JC=0` ("unchanged") carries no alignment.
    pub fn from_jc(jc: u8) -> Option<Self> {
        match jc {
            1 => Some(TextAlign::Left),
            2 => Some(TextAlign::Center),
            3 => Some(TextAlign::Right),
            _ => None,
        }
    }

    /// The TTI justification code.
    pub fn jc(self) -> u8 {
        match self {
            TextAlign::Left => 1,
            TextAlign::Center => 2,
            TextAlign::Right => 3,
        }
    }
}

/// Caption placement derived from the TTI VP and JC fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Layout {
    /// Teletext row, 0..=23.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_position: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

impl Layout {
    /// Whether the layout carries no information and should be omitted.
    pub fn is_empty(&self) -> bool {
        self.vertical_position.is_none() && self.text_align.is_none()
    }
}

/// One styled run of caption text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

/// A single caption: timing, text and optional styling/layout.
///
/// Exactly one of `style` and `segments` may be present; both absent means
/// the whole text is default-styled. When `segments` is present, `text` is
/// the concatenation of the segment texts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Caption {
    /// Presentation start in microseconds.
    #[serde(rename = "start")]
    pub start_us: u64,
    /// Presentation end in microseconds; never precedes `start_us`.
    #[serde(rename = "end")]
    pub end_us: u64,
    pub start_timecode: String,
    pub end_timecode: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
}
