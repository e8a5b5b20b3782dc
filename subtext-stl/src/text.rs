//! Text field decoding.
//!
//! Turns the raw bytes of TTI text fields into the event stream the
//! segmenter consumes. Bytes below 0x20 are teletext-style control codes,
//! 0x80..=0x9F the STL-specific formatting and line-break codes, and
//! everything else glyph bytes decoded through the GSI-selected character
//! code table. Glyph bytes are buffered until a control boundary so that
//! ISO 6937 floating diacritics (two-byte sequences) decode intact.

use subtext_caption::{Segmenter, TeletextColor, TextEvent};
use subtext_charset::CodeTable;

use crate::tti::TF_FILL;

/// Streams text field bytes into [`TextEvent`]s, keeping glyph state across
/// the blocks of one subtitle.
#[derive(Debug)]
pub struct TextFieldDecoder {
    table: CodeTable,
    pending: Vec<u8>,
}

impl TextFieldDecoder {
    pub fn new(table: CodeTable) -> Self {
        TextFieldDecoder {
            table,
            pending: Vec::with_capacity(40),
        }
    }

    /// Decodes one block's text field into the segmenter.
    ///
    /// The fill byte 0x8F ends this block's text; bytes after it are
    /// padding. Unknown control codes are no-ops.
    pub fn decode_block(&mut self, text: &[u8], segmenter: &mut Segmenter) {
        for &byte in text {
            if byte == TF_FILL {
                break;
            }
            let event = match byte {
                0x00..=0x07 => Some(TextEvent::Color(TeletextColor::from_code(byte))),
                0x08 => Some(TextEvent::Flash(true)),
                0x09 => Some(TextEvent::Flash(false)),
                0x0A => Some(TextEvent::BoxOff),
                0x0B => Some(TextEvent::BoxOn),
                0x0C => Some(TextEvent::DoubleHeight(false)),
                0x0D => Some(TextEvent::DoubleHeight(true)),
                0x1C => Some(TextEvent::BlackBackground),
                0x1D => Some(TextEvent::NewBackground),
                0x0E..=0x1F => None,
                0x80 => Some(TextEvent::Italic(true)),
                0x81 => Some(TextEvent::Italic(false)),
                0x82 => Some(TextEvent::Underline(true)),
                0x83 => Some(TextEvent::Underline(false)),
                0x84 => Some(TextEvent::Bold(true)),
                0x85 => Some(TextEvent::Bold(false)),
                0x8A => Some(TextEvent::LineBreak),
                0x86..=0x9F => None,
                _ => {
                    self.pending.push(byte);
                    continue;
                }
            };
            self.flush(segmenter);
            if let Some(event) = event {
                segmenter.push(event);
            }
        }
        self.flush(segmenter);
    }

    fn flush(&mut self, segmenter: &mut Segmenter) {
        if !self.pending.is_empty() {
            let text = self.table.decode(&self.pending);
            self.pending.clear();
            if !text.is_empty() {
                segmenter.push(TextEvent::Text(text));
            }
        }
    }
}
