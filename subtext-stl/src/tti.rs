//! Text and Timing Information blocks.
//!
//! Each TTI block is 128 bytes: a 16-byte header and a 112-byte text field.
//! A logical subtitle may span several blocks sharing one subtitle number;
//! intermediate blocks carry extension block numbers 1..=254 and the last
//! block 0xFF.

use byteorder::{ByteOrder, LittleEndian};

/// TTI block length.
pub const TTI_LEN: usize = 128;

/// Text field length within a block.
pub const TEXT_FIELD_LEN: usize = 112;

/// Extension block number marking the last block of a subtitle.
pub const EBN_LAST: u8 = 0xFF;

/// Text field filler byte; terminates the block's text when decoding.
pub const TF_FILL: u8 = 0x8F;

/// One TTI block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tti {
    /// Subtitle group number.
    pub group: u8,
    /// Subtitle number; shared by all blocks of one subtitle.
    pub number: u16,
    /// Extension block number.
    pub extension: u8,
    /// Cumulative status.
    pub cumulative: u8,
    /// Time code in: hours, minutes, seconds, frames.
    pub time_in: [u8; 4],
    /// Time code out.
    pub time_out: [u8; 4],
    /// Vertical position, teletext row 0..=23.
    pub vertical_position: u8,
    /// Justification code: 0 unchanged, 1 left, 2 center, 3 right.
    pub justification: u8,
    /// Comment flag; comment blocks carry no displayable text.
    pub comment: bool,
    /// Text field.
    pub text: [u8; TEXT_FIELD_LEN],
}

impl Tti {
    /// Parses one 128-byte block.
    pub fn parse(raw: &[u8; TTI_LEN]) -> Tti {
        let mut text = [0u8; TEXT_FIELD_LEN];
        text.copy_from_slice(&raw[16..TTI_LEN]);
        Tti {
            group: raw[0],
            number: LittleEndian::read_u16(&raw[1..3]),
            extension: raw[3],
            cumulative: raw[4],
            time_in: [raw[5], raw[6], raw[7], raw[8]],
            time_out: [raw[9], raw[10], raw[11], raw[12]],
            vertical_position: raw[13],
            justification: raw[14],
            comment: raw[15] != 0,
            text,
        }
    }

    /// Serializes the block.
    pub fn write(&self) -> [u8; TTI_LEN] {
        let mut raw = [0u8; TTI_LEN];
        raw[0] = self.group;
        LittleEndian::write_u16(&mut raw[1..3], self.number);
        raw[3] = self.extension;
        raw[4] = self.cumulative;
        raw[5..9].copy_from_slice(&self.time_in);
        raw[9..13].copy_from_slice(&self.time_out);
        raw[13] = self.vertical_position;
        raw[14] = self.justification;
        raw[15] = u8::from(self.comment);
        raw[16..TTI_LEN].copy_from_slice(&self.text);
        raw
    }

    /// Whether this block terminates its subtitle.
    pub fn is_terminal(&self) -> bool {
        self.extension == EBN_LAST
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_write_round_trip() {
        let mut text = [TF_FILL; TEXT_FIELD_LEN];
        text[..5].copy_from_slice(b"Hello");
        let tti = Tti {
            group: 0,
            number: 0x0102,
            extension: EBN_LAST,
            cumulative: 0,
            time_in: [0, 0, 1, 0],
            time_out: [0, 0, 3, 0],
            vertical_position: 20,
            justification: 2,
            comment: false,
            text,
        };
        let raw = tti.write();
        assert_eq!(Tti::parse(&raw), tti);
    }

    #[test]
    fn test_subtitle_number_is_little_endian() {
        let mut raw = [0u8; TTI_LEN];
        raw[1] = 0x07;
        raw[2] = 0x01;
        assert_eq!(Tti::parse(&raw).number, 0x0107);
    }

    #[test]
    fn test_terminal_flag() {
        let mut raw = [0u8; TTI_LEN];
        raw[3] = EBN_LAST;
        assert!(Tti::parse(&raw).is_terminal());
        raw[3] = 1;
        assert!(!Tti::parse(&raw).is_terminal());
    }
}
