//! Drop-frame counting for the fractional NTSC rates.
//!
//! 29.97 fps video accumulates 3.6 seconds of drift per hour against a
//! 30 fps frame count. Drop-frame timecode compensates by skipping frame
//! numbers 0 and 1 (0..=3 at 59.94 fps) at the start of every minute except
//! minutes divisible by ten. Frames are never discarded; only labels are.

use crate::smpte::{FrameRate, Timecode};

/// Counting parameters for a drop-frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DropFrameConfig {
    dropped_per_minute: u64,
    nominal_fps: u64,
    frames_per_minute: u64,
    frames_per_10_minutes: u64,
}

impl DropFrameConfig {
    fn for_rate(rate: FrameRate) -> Option<Self> {
        match rate {
            FrameRate::Fps29_97 => Some(Self {
                dropped_per_minute: 2,
                nominal_fps: 30,
                frames_per_minute: 1798,
                frames_per_10_minutes: 17982,
            }),
            FrameRate::Fps59_94 => Some(Self {
                dropped_per_minute: 4,
                nominal_fps: 60,
                frames_per_minute: 3596,
                frames_per_10_minutes: 35964,
            }),
            _ => None,
        }
    }
}

/// How many frame labels are dropped per non-tenth minute.
pub(crate) fn dropped_per_minute(rate: FrameRate) -> u8 {
    DropFrameConfig::for_rate(rate).map_or(0, |c| c.dropped_per_minute as u8)
}

/// Whether a label denotes a dropped (nonexistent) frame number.
pub fn is_dropped_frame(minutes: u8, seconds: u8, frames: u8, rate: FrameRate) -> bool {
    match DropFrameConfig::for_rate(rate) {
        Some(config) => {
            seconds == 0 && minutes % 10 != 0 && u64::from(frames) < config.dropped_per_minute
        }
        None => false,
    }
}

/// Builds the drop-frame label for a frame number.
pub(crate) fn frame_to_timecode(frame: u64, rate: FrameRate) -> Timecode {
    let Some(config) = DropFrameConfig::for_rate(rate) else {
        return Timecode::from_frame_number(frame, rate, false);
    };
    let fps = config.nominal_fps;

    let ten_minute_blocks = frame / config.frames_per_10_minutes;
    let in_block = frame % config.frames_per_10_minutes;

    // The first minute of each ten-minute block drops nothing.
    let (extra_minutes, in_minute) = if in_block < fps * 60 {
        (0, in_block)
    } else {
        let past_first = in_block - fps * 60;
        (1 + past_first / config.frames_per_minute, past_first % config.frames_per_minute)
    };

    let total_minutes = ten_minute_blocks * 10 + extra_minutes;
    let display = if extra_minutes > 0 {
        in_minute + config.dropped_per_minute
    } else {
        in_minute
    };

    Timecode {
        hours: ((total_minutes / 60) % 24) as u8,
        minutes: (total_minutes % 60) as u8,
        seconds: (display / fps) as u8,
        frames: (display % fps) as u8,
        rate,
        drop_frame: true,
    }
}

/// The frame number a drop-frame label denotes.
pub(crate) fn timecode_to_frame(tc: &Timecode) -> u64 {
    let Some(config) = DropFrameConfig::for_rate(tc.rate) else {
        let fps = tc.rate.nominal_fps() as u64;
        let seconds = tc.hours as u64 * 3600 + tc.minutes as u64 * 60 + tc.seconds as u64;
        return seconds * fps + tc.frames as u64;
    };
    let fps = config.nominal_fps;

    let total_minutes = tc.hours as u64 * 60 + tc.minutes as u64;
    let ten_minute_blocks = total_minutes / 10;
    let extra_minutes = total_minutes % 10;

    let from_blocks = ten_minute_blocks * config.frames_per_10_minutes;
    let from_minutes = if extra_minutes == 0 {
        0
    } else {
        fps * 60 + (extra_minutes - 1) * config.frames_per_minute
    };
    let within_minute = tc.seconds as u64 * fps + tc.frames as u64;
    let dropped = if extra_minutes > 0 {
        config.dropped_per_minute
    } else {
        0
    };

    from_blocks + from_minutes + within_minute - dropped
}
