//! STL generation from assembled teletext pages.
//!
//! Each subtitle page becomes one GSI-referenced run of TTI blocks. Rows
//! serialize to teletext-compatible control codes plus ISO 6937 glyph
//! bytes, boxed the way level-1 teletext subtitles are broadcast: doubled
//! start-box codes opening each row, doubled end-box codes closing it, and
//! a line-break code between rows.

use crate::error::Result;
use crate::gsi::Gsi;
use crate::tti::{Tti, EBN_LAST, TEXT_FIELD_LEN, TF_FILL, TTI_LEN};
use std::io::Write;
use subtext_caption::TextAlign;
use subtext_charset::CodeTable;
use subtext_teletext::{Cell, SpacingAttribute, SubtitlePage};
use subtext_timecode::{FrameRate, Timecode};

/// Display duration for pages whose erase event was never observed.
const DEFAULT_DURATION_US: u64 = 3_000_000;

const WHITE: u8 = 0x07;
const FLASH: u8 = 0x08;
const STEADY: u8 = 0x09;
const END_BOX: u8 = 0x0A;
const START_BOX: u8 = 0x0B;
const DOUBLE_HEIGHT: u8 = 0x0D;
const BLACK_BACKGROUND: u8 = 0x1C;
const NEW_BACKGROUND: u8 = 0x1D;
const LINE_BREAK: u8 = 0x8A;

/// EBU Tech 3264-E subtitle file writer.
#[derive(Debug, Clone)]
pub struct StlWriter {
    frame_rate: FrameRate,
    program_title: String,
}

impl StlWriter {
    pub fn new(frame_rate: FrameRate) -> Self {
        StlWriter {
            frame_rate,
            program_title: String::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.program_title = title.into();
        self
    }

    /// Renders GSI plus TTI blocks for the given pages.
    pub fn write(&self, pages: &[SubtitlePage]) -> Vec<u8> {
        let mut blocks: Vec<Tti> = Vec::new();
        let mut number: u16 = 0;
        let mut subtitles: u32 = 0;

        for page in pages {
            number = number.wrapping_add(1);
            let page_blocks = self.page_blocks(page, number);
            if page_blocks.is_empty() {
                number = number.wrapping_sub(1);
                continue;
            }
            subtitles += 1;
            blocks.extend(page_blocks);
        }

        let mut out = Vec::with_capacity(crate::gsi::GSI_LEN + blocks.len() * TTI_LEN);
        out.extend_from_slice(&Gsi::build(
            &self.program_title,
            self.frame_rate,
            blocks.len() as u32,
            subtitles,
        ));
        for block in &blocks {
            out.extend_from_slice(&block.write());
        }
        out
    }

    /// Renders and writes to a sink; failures are the caller's I/O errors.
    pub fn write_to<W: Write>(&self, pages: &[SubtitlePage], sink: &mut W) -> Result<()> {
        sink.write_all(&self.write(pages))?;
        Ok(())
    }

    /// The TTI blocks of one page: the serialized text split at text-field
    /// boundaries, intermediate blocks numbered 1.. and the last marked
    /// 0xFF, timing replicated on each block.
    fn page_blocks(&self, page: &SubtitlePage, number: u16) -> Vec<Tti> {
        let text = serialize_rows(page);
        if text.is_empty() {
            return Vec::new();
        }

        let onset = page.onset_us;
        let clear = page.clear_us.unwrap_or(onset + DEFAULT_DURATION_US).max(onset);
        let time_in = self.timecode_field(onset);
        let time_out = self.timecode_field(clear);

        let vertical_position = page
            .rows
            .keys()
            .next()
            .copied()
            .unwrap_or(20)
            .min(23);
        let justification = detect_justification(page).jc();

        let chunks: Vec<&[u8]> = text.chunks(TEXT_FIELD_LEN).collect();
        let last = chunks.len() - 1;
        chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| {
                let mut field = [TF_FILL; TEXT_FIELD_LEN];
                field[..chunk.len()].copy_from_slice(chunk);
                Tti {
                    group: 0,
                    number,
                    extension: if index == last { EBN_LAST } else { index as u8 + 1 },
                    cumulative: 0,
                    time_in,
                    time_out,
                    vertical_position,
                    justification,
                    comment: false,
                    text: field,
                }
            })
            .collect()
    }

    fn timecode_field(&self, us: u64) -> [u8; 4] {
        let rate = self.frame_rate;
        let tc = Timecode::from_frame_number(rate.us_to_frame(us), rate, rate.is_drop_frame_rate());
        [tc.hours, tc.minutes, tc.seconds, tc.frames]
    }
}

/// Serializes the page rows into text field bytes.
fn serialize_rows(page: &SubtitlePage) -> Vec<u8> {
    let double_height = page.rows.values().any(|row| {
        row.cells
            .iter()
            .any(|cell| matches!(cell, Cell::Spacing(SpacingAttribute::DoubleHeight)))
    });

    let mut out = Vec::with_capacity(page.rows.len() * 44);
    for (index, row) in page.rows.values().enumerate() {
        if index > 0 {
            out.extend_from_slice(&[END_BOX, END_BOX, LINE_BREAK]);
        }
        if double_height {
            out.push(DOUBLE_HEIGHT);
        }
        out.extend_from_slice(&[START_BOX, START_BOX]);
        serialize_cells(&row.cells, &mut out);
    }
    if !out.is_empty() {
        out.extend_from_slice(&[END_BOX, END_BOX]);
    }
    out
}

/// Serializes one row's cells, carrying color/flash state so redundant
/// attribute codes are not written.
///
/// The indentation and padding spaces around the glyph span are teletext
/// positioning, carried by the justification code instead; attribute cells
/// ahead of the text are kept.
fn serialize_cells(cells: &[Cell], out: &mut Vec<u8>) {
    let Some(first_glyph) = cells.iter().position(|cell| matches!(cell, Cell::Glyph(_))) else {
        return;
    };
    let last_glyph = cells
        .iter()
        .rposition(|cell| matches!(cell, Cell::Glyph(_)))
        .unwrap_or(first_glyph);

    let mut color = WHITE;
    let mut flash = false;
    let mut concealed = false;

    for (index, cell) in cells.iter().enumerate().take(last_glyph + 1) {
        if index < first_glyph && matches!(cell, Cell::Space) {
            continue;
        }
        match cell {
            Cell::Spacing(attribute) => match attribute {
                SpacingAttribute::Foreground(code) => {
                    if *code != color {
                        out.push(*code);
                        color = *code;
                    }
                    // A color change reveals concealed text.
                    concealed = false;
                }
                SpacingAttribute::Flash => {
                    if !flash {
                        out.push(FLASH);
                        flash = true;
                    }
                }
                SpacingAttribute::Steady => {
                    if flash {
                        out.push(STEADY);
                        flash = false;
                    }
                }
                SpacingAttribute::BlackBackground => out.push(BLACK_BACKGROUND),
                SpacingAttribute::NewBackground => out.push(NEW_BACKGROUND),
                SpacingAttribute::Conceal => concealed = true,
                // Box codes are rebuilt per row; height is row-level.
                SpacingAttribute::StartBox
                | SpacingAttribute::EndBox
                | SpacingAttribute::DoubleHeight
                | SpacingAttribute::NormalHeight => {}
            },
            Cell::Glyph(glyph) => {
                if concealed {
                    continue;
                }
                let mut buffer = [0u8; 4];
                let encoded = CodeTable::Latin.encode(glyph.encode_utf8(&mut buffer));
                if encoded.is_empty() {
                    out.push(b' ');
                } else {
                    out.extend_from_slice(&encoded);
                }
            }
            Cell::Space => out.push(b' '),
        }
    }
}

/// Infers the justification code from the whitespace balance of the first
/// non-empty row: indentation pushed one way means the text sits the other.
fn detect_justification(page: &SubtitlePage) -> TextAlign {
    for row in page.rows.values() {
        let text = row.visible_text();
        let visible = text.trim();
        if visible.is_empty() {
            continue;
        }
        let left = text.len() - text.trim_start().len();
        let right = text.len() - text.trim_end().len();
        return if left.abs_diff(right) <= 3 {
            TextAlign::Center
        } else if left > right {
            TextAlign::Right
        } else {
            TextAlign::Left
        };
    }
    TextAlign::Center
}
