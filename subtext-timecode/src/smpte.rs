//! SMPTE 12M timecode representation and conversions.

use crate::dropframe;
use crate::error::{Result, TimecodeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broadcast frame rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameRate {
    /// 24 fps (film)
    Fps24,
    /// 25 fps (PAL)
    Fps25,
    /// 29.97 fps (30000/1001, NTSC)
    Fps29_97,
    /// 30 fps
    Fps30,
    /// 50 fps (PAL)
    Fps50,
    /// 59.94 fps (60000/1001, NTSC)
    Fps59_94,
    /// 60 fps
    Fps60,
    /// Custom frame rate (numerator, denominator)
    Custom { numerator: u32, denominator: u32 },
}

impl FrameRate {
    /// The frame rate as a rational number (numerator, denominator).
    #[must_use]
    pub fn as_rational(&self) -> (u32, u32) {
        match self {
            Self::Fps24 => (24, 1),
            Self::Fps25 => (25, 1),
            Self::Fps29_97 => (30000, 1001),
            Self::Fps30 => (30, 1),
            Self::Fps50 => (50, 1),
            Self::Fps59_94 => (60000, 1001),
            Self::Fps60 => (60, 1),
            Self::Custom {
                numerator,
                denominator,
            } => (*numerator, *denominator),
        }
    }

    /// The integer frames-per-second used for timecode display.
    #[must_use]
    pub fn nominal_fps(&self) -> u32 {
        match self {
            Self::Fps24 => 24,
            Self::Fps25 => 25,
            Self::Fps29_97 | Self::Fps30 => 30,
            Self::Fps50 => 50,
            Self::Fps59_94 | Self::Fps60 => 60,
            Self::Custom {
                numerator,
                denominator,
            } => ((*numerator as f64) / (*denominator as f64)).round().max(1.0) as u32,
        }
    }

    /// The frame rate as a floating point value.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        let (num, den) = self.as_rational();
        num as f64 / den as f64
    }

    /// Whether timecode at this rate uses drop-frame counting.
    #[must_use]
    pub fn is_drop_frame_rate(&self) -> bool {
        matches!(self, Self::Fps29_97 | Self::Fps59_94)
    }

    /// Matches a floating point rate to the nearest standard rate.
    ///
    /// Returns `None` for non-positive values. Rates that are not standard
    /// become `Custom` with millihertz precision.
    pub fn from_f64(fps: f64) -> Option<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return None;
        }
        for rate in [
            Self::Fps24,
            Self::Fps25,
            Self::Fps29_97,
            Self::Fps30,
            Self::Fps50,
            Self::Fps59_94,
            Self::Fps60,
        ] {
            if (rate.as_f64() - fps).abs() < 0.005 {
                return Some(rate);
            }
        }
        Some(Self::Custom {
            numerator: (fps * 1000.0).round() as u32,
            denominator: 1000,
        })
    }

    /// Converts a frame count to microseconds, rounding to the nearest.
    #[must_use]
    pub fn frame_to_us(&self, frame: u64) -> u64 {
        let (num, den) = self.as_rational();
        let (num, den) = (num as u128, den as u128);
        ((frame as u128 * 1_000_000 * den + num / 2) / num) as u64
    }

    /// Converts microseconds to a frame count, rounding to the nearest.
    ///
    /// Exact inverse of [`FrameRate::frame_to_us`] for every frame number
    /// whose duration exceeds one microsecond.
    #[must_use]
    pub fn us_to_frame(&self, us: u64) -> u64 {
        let (num, den) = self.as_rational();
        let (num, den) = (num as u128, den as u128);
        let unit = 1_000_000 * den;
        ((us as u128 * num + unit / 2) / unit) as u64
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fps24 => write!(f, "24"),
            Self::Fps25 => write!(f, "25"),
            Self::Fps29_97 => write!(f, "29.97"),
            Self::Fps30 => write!(f, "30"),
            Self::Fps50 => write!(f, "50"),
            Self::Fps59_94 => write!(f, "59.94"),
            Self::Fps60 => write!(f, "60"),
            Self::Custom {
                numerator,
                denominator,
            } => write!(f, "{}/{}", numerator, denominator),
        }
    }
}

/// SMPTE timecode in HH:MM:SS:FF form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timecode {
    /// Hours (0-23)
    pub hours: u8,
    /// Minutes (0-59)
    pub minutes: u8,
    /// Seconds (0-59)
    pub seconds: u8,
    /// Frames (0 to nominal fps - 1)
    pub frames: u8,
    /// Frame rate
    pub rate: FrameRate,
    /// Whether this is drop-frame timecode
    pub drop_frame: bool,
}

impl Timecode {
    /// Creates a non-drop timecode, validating every component.
    pub fn new(hours: u8, minutes: u8, seconds: u8, frames: u8, rate: FrameRate) -> Result<Self> {
        let tc = Self {
            hours,
            minutes,
            seconds,
            frames,
            rate,
            drop_frame: false,
        };
        tc.validate()?;
        Ok(tc)
    }

    /// Creates a drop-frame timecode; the rate must be 29.97 or 59.94.
    pub fn new_drop_frame(
        hours: u8,
        minutes: u8,
        seconds: u8,
        frames: u8,
        rate: FrameRate,
    ) -> Result<Self> {
        if !rate.is_drop_frame_rate() {
            return Err(TimecodeError::DropFrame(format!(
                "{} is not a drop-frame rate",
                rate
            )));
        }
        let tc = Self {
            hours,
            minutes,
            seconds,
            frames,
            rate,
            drop_frame: true,
        };
        tc.validate()?;
        Ok(tc)
    }

    /// Builds the timecode label for a frame number.
    #[must_use]
    pub fn from_frame_number(frame: u64, rate: FrameRate, drop_frame: bool) -> Self {
        if drop_frame && rate.is_drop_frame_rate() {
            return dropframe::frame_to_timecode(frame, rate);
        }
        let fps = rate.nominal_fps() as u64;
        let total_seconds = frame / fps;
        Self {
            hours: ((total_seconds / 3600) % 24) as u8,
            minutes: ((total_seconds % 3600) / 60) as u8,
            seconds: (total_seconds % 60) as u8,
            frames: (frame % fps) as u8,
            rate,
            drop_frame: false,
        }
    }

    /// The frame number this label denotes.
    #[must_use]
    pub fn to_frame_number(&self) -> u64 {
        if self.drop_frame {
            return dropframe::timecode_to_frame(self);
        }
        let fps = self.rate.nominal_fps() as u64;
        let total_seconds =
            self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64;
        total_seconds * fps + self.frames as u64
    }

    /// Validates the component ranges and drop-frame label constraints.
    pub fn validate(&self) -> Result<()> {
        let max_frames = self.rate.nominal_fps().saturating_sub(1);
        if self.hours > 23 {
            return Err(TimecodeError::invalid_component("hours", self.hours.into(), 23));
        }
        if self.minutes > 59 {
            return Err(TimecodeError::invalid_component(
                "minutes",
                self.minutes.into(),
                59,
            ));
        }
        if self.seconds > 59 {
            return Err(TimecodeError::invalid_component(
                "seconds",
                self.seconds.into(),
                59,
            ));
        }
        if u32::from(self.frames) > max_frames {
            return Err(TimecodeError::invalid_component(
                "frames",
                self.frames.into(),
                max_frames,
            ));
        }
        if self.drop_frame
            && dropframe::is_dropped_frame(self.minutes, self.seconds, self.frames, self.rate)
        {
            return Err(TimecodeError::DropFrame(format!(
                "frame {} does not exist at minute {}",
                self.frames, self.minutes
            )));
        }
        Ok(())
    }

    /// The separator between seconds and frames: `;` for drop-frame.
    #[must_use]
    pub fn separator(&self) -> char {
        if self.drop_frame {
            ';'
        } else {
            ':'
        }
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}{}{:02}",
            self.hours,
            self.minutes,
            self.seconds,
            self.separator(),
            self.frames
        )
    }
}

/// Converts a timecode tuple to microseconds at the given rate.
///
/// At drop-frame rates the tuple is interpreted as a drop-frame label;
/// labels that fall on dropped frame numbers snap forward to the first valid
/// frame of that minute.
pub fn frames_to_us(
    hours: u8,
    minutes: u8,
    seconds: u8,
    frames: u8,
    rate: FrameRate,
) -> Result<u64> {
    let tc = if rate.is_drop_frame_rate() {
        let frames = if dropframe::is_dropped_frame(minutes, seconds, frames, rate) {
            dropframe::dropped_per_minute(rate)
        } else {
            frames
        };
        Timecode::new_drop_frame(hours, minutes, seconds, frames, rate)?
    } else {
        Timecode::new(hours, minutes, seconds, frames, rate)?
    };
    Ok(rate.frame_to_us(tc.to_frame_number()))
}

/// Formats microseconds as a SMPTE string at the given rate.
///
/// Drop-frame rates use `;` between seconds and frames, others `:`.
#[must_use]
pub fn us_to_smpte(us: u64, rate: FrameRate) -> String {
    Timecode::from_frame_number(rate.us_to_frame(us), rate, rate.is_drop_frame_rate()).to_string()
}

/// Parses a SMPTE string (HH:MM:SS:FF or HH:MM:SS;FF) at an explicit rate.
pub fn parse_smpte(s: &str, rate: FrameRate) -> Result<Timecode> {
    let s = s.trim();
    let drop_frame = s.contains(';');
    let parts: Vec<&str> = s.split([':', ';']).collect();
    if parts.len() != 4 {
        return Err(TimecodeError::invalid_format(
            "expected HH:MM:SS:FF or HH:MM:SS;FF",
        ));
    }
    let mut fields = [0u8; 4];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| TimecodeError::invalid_format(format!("invalid field: {}", part)))?;
    }
    let [hours, minutes, seconds, frames] = fields;
    if drop_frame {
        if !rate.is_drop_frame_rate() {
            return Err(TimecodeError::DropFrame(format!(
                "drop-frame separator with {} fps",
                rate
            )));
        }
        Timecode::new_drop_frame(hours, minutes, seconds, frames, rate)
    } else {
        Timecode::new(hours, minutes, seconds, frames, rate)
    }
}
