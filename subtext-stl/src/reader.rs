//! Lenient STL reading.
//!
//! The reader parses the GSI block, walks TTI blocks to the end of the
//! input, reassembles multi-block subtitles and emits structured captions.
//! Mid-stream corruption never aborts a read: whatever parses is surfaced,
//! and structural violations are reported through the diagnostic channel.

use crate::error::{Result, StlError};
use crate::gsi::{Gsi, GSI_LEN};
use crate::text::TextFieldDecoder;
use crate::tti::{Tti, TTI_LEN};
use serde::Serialize;
use subtext_caption::{Caption, Layout, Segmenter, TextAlign};
use subtext_timecode::{frames_to_us, us_to_smpte, FrameRate};

/// How many leading reassembled groups are checked for continuation
/// protocol violations.
const VALIDATED_GROUPS: usize = 9;

/// Highest teletext row a vertical position may address.
const MAX_ROW: u8 = 23;

/// What to do with structural warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningMode {
    /// Drop warnings (still logged).
    Suppress,
    /// Return warnings on the document.
    #[default]
    Collect,
    /// Turn the first warning into an error.
    Escalate,
}

/// Reader configuration.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Replaces the GSI-derived frame rate without touching the DFC.
    pub fps_override: Option<f64>,
    pub warnings: WarningMode,
}

/// A structural diagnostic emitted alongside the parsed captions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub message: String,
}

/// Diagnostic categories; callers may filter on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCategory {
    Structural,
}

/// The parsed result of one `read` invocation.
#[derive(Debug, Clone)]
pub struct StlDocument {
    pub captions: Vec<Caption>,
    pub frame_rate: FrameRate,
    pub gsi: Gsi,
    pub diagnostics: Vec<Diagnostic>,
}

/// EBU Tech 3264-E subtitle file reader.
#[derive(Debug, Clone, Default)]
pub struct StlReader {
    options: ReadOptions,
}

impl StlReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ReadOptions) -> Self {
        StlReader { options }
    }

    /// Parses an STL byte buffer into captions.
    ///
    /// Fatal errors are a missing GSI block and an unrecognized disk format
    /// code without an override; everything past the GSI is best-effort.
    pub fn read(&self, raw: &[u8]) -> Result<StlDocument> {
        let gsi = Gsi::parse(raw)?;
        let frame_rate = gsi.frame_rate(self.options.fps_override)?;

        let mut diagnostics = Vec::new();
        if gsi.unknown_code_table {
            diagnostics.push(Diagnostic {
                category: DiagnosticCategory::Structural,
                message: "unknown character code table, assuming Latin".to_string(),
            });
        }

        let blocks: Vec<Tti> = raw[GSI_LEN..]
            .chunks_exact(TTI_LEN)
            .filter_map(|chunk| chunk.try_into().ok().map(Tti::parse))
            .collect();
        let trailing = (raw.len() - GSI_LEN) % TTI_LEN;
        if trailing != 0 {
            log::debug!("ignoring truncated trailing TTI block of {} bytes", trailing);
        }

        let groups = reassemble(blocks);
        log::debug!(
            "{} TTI group(s) at {} fps from {:?}",
            groups.len(),
            frame_rate,
            gsi.disk_format
        );

        let violations: usize = groups
            .iter()
            .take(VALIDATED_GROUPS)
            .map(|group| invalid_continuations(group))
            .sum();
        if violations > 0 {
            diagnostics.push(Diagnostic {
                category: DiagnosticCategory::Structural,
                message: format!(
                    "{} of first {} TTI block(s) have intermediate EBN with invalid CS",
                    violations, VALIDATED_GROUPS
                ),
            });
        }

        let captions = groups
            .iter()
            .filter_map(|group| self.caption_from_group(group, &gsi, frame_rate))
            .collect();

        match self.options.warnings {
            WarningMode::Collect => {}
            WarningMode::Suppress => {
                for diagnostic in diagnostics.drain(..) {
                    log::warn!("suppressed: {}", diagnostic.message);
                }
            }
            WarningMode::Escalate => {
                if let Some(diagnostic) = diagnostics.first() {
                    return Err(StlError::Structural(diagnostic.message.clone()));
                }
            }
        }

        Ok(StlDocument {
            captions,
            frame_rate,
            gsi,
            diagnostics,
        })
    }

    fn caption_from_group(&self, group: &[Tti], gsi: &Gsi, rate: FrameRate) -> Option<Caption> {
        let first = group.first()?;

        let mut segmenter = Segmenter::new();
        let mut decoder = TextFieldDecoder::new(gsi.code_table);
        for block in group {
            decoder.decode_block(&block.text, &mut segmenter);
        }
        let segmented = segmenter.finish();
        if segmented.text.is_empty() {
            return None;
        }

        let start_us = field_time(first.time_in, rate);
        let end_us = field_time(first.time_out, rate).max(start_us);

        let layout = Layout {
            vertical_position: (first.vertical_position <= MAX_ROW)
                .then_some(first.vertical_position),
            text_align: TextAlign::from_jc(first.justification),
        };

        Some(Caption {
            start_us,
            end_us,
            start_timecode: us_to_smpte(start_us, rate),
            end_timecode: us_to_smpte(end_us, rate),
            text: segmented.text,
            style: segmented.style,
            layout: (!layout.is_empty()).then_some(layout),
            segments: segmented.segments,
        })
    }
}

/// Groups contiguous blocks by subtitle number.
///
/// A group closes on its terminator (EBN = 0xFF) or when the subtitle
/// number changes; comment blocks are skipped outright.
fn reassemble(blocks: Vec<Tti>) -> Vec<Vec<Tti>> {
    let mut groups: Vec<Vec<Tti>> = Vec::new();
    let mut current: Vec<Tti> = Vec::new();
    for block in blocks {
        if block.comment {
            continue;
        }
        if let Some(open) = current.first() {
            if open.number != block.number {
                groups.push(std::mem::take(&mut current));
            }
        }
        let terminal = block.is_terminal();
        current.push(block);
        if terminal {
            groups.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// Counts continuation protocol violations within one group: every
/// non-terminal block must carry an EBN in 1..=254 and CS 0.
fn invalid_continuations(group: &[Tti]) -> usize {
    group
        .iter()
        .filter(|block| !block.is_terminal())
        .filter(|block| block.extension == 0 || block.cumulative != 0)
        .count()
}

/// Converts a raw 4-byte timecode field, clamping out-of-range components
/// rather than failing the read.
fn field_time(field: [u8; 4], rate: FrameRate) -> u64 {
    let max_frame = rate.nominal_fps().saturating_sub(1).min(255) as u8;
    let clamped = [
        field[0].min(23),
        field[1].min(59),
        field[2].min(59),
        field[3].min(max_frame),
    ];
    if clamped != field {
        log::debug!("clamped out-of-range timecode field {:?}", field);
    }
    frames_to_us(clamped[0], clamped[1], clamped[2], clamped[3], rate).unwrap_or_else(|err| {
        log::warn!("unusable timecode field {:?}: {}", field, err);
        0
    })
}
