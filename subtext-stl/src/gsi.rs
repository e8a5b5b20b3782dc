//! The General Subtitle Information block.
//!
//! The GSI block is the fixed 1024-byte header of an STL file. Reading
//! consumes a handful of fields (code page, disk format, display standard,
//! character code table, language, block counts); writing fills the layout
//! of Tech 3264-E section 2 with the fixed values of the extraction path.

use crate::error::{Result, StlError};
use chrono::Local;
use subtext_charset::CodeTable;
use subtext_timecode::FrameRate;

/// GSI block length.
pub const GSI_LEN: usize = 1024;

/// Disk format codes of the known set.
const DFC_STL25: &str = "STL25.01";
const DFC_STL30: &str = "STL30.01";

/// Parsed GSI fields consumed by the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gsi {
    /// Code page number, three ASCII digits (e.g. "850").
    pub code_page: String,
    /// Disk format code, e.g. "STL25.01".
    pub disk_format: String,
    /// Display standard code byte.
    pub display_standard: u8,
    /// Character code table for the text fields.
    pub code_table: CodeTable,
    /// Whether the CCT field held an unknown value (fell back to Latin).
    pub unknown_code_table: bool,
    /// Language code, two ASCII hex digits.
    pub language: String,
    /// Original programme title, for diagnostics.
    pub program_title: String,
    /// Total number of TTI blocks, when the field parses.
    pub tti_blocks: Option<u32>,
    /// Total number of subtitles, when the field parses.
    pub subtitles: Option<u32>,
}

impl Gsi {
    /// Parses the leading GSI block of an STL file.
    pub fn parse(raw: &[u8]) -> Result<Gsi> {
        if raw.len() < GSI_LEN {
            return Err(StlError::InputTooShort { len: raw.len() });
        }

        let cct_field: [u8; 2] = [raw[12], raw[13]];
        let code_table = CodeTable::from_gsi(&cct_field);
        if code_table.is_none() {
            log::warn!(
                "unknown character code table {:?}, assuming Latin",
                ascii(&cct_field)
            );
        }

        Ok(Gsi {
            code_page: ascii(&raw[0..3]),
            disk_format: ascii(&raw[3..11]),
            display_standard: raw[11],
            code_table: code_table.unwrap_or_default(),
            unknown_code_table: code_table.is_none(),
            language: ascii(&raw[14..16]),
            program_title: ascii(&raw[16..48]),
            tti_blocks: ascii(&raw[238..243]).parse().ok(),
            subtitles: ascii(&raw[243..248]).parse().ok(),
        })
    }

    /// Resolves the frame rate from the disk format code.
    ///
    /// An `fps_override` replaces the detected value without touching the
    /// DFC. "STL25.01" is PAL material at 25 fps; "STL30.01" is NTSC
    /// material, which runs at 30000/1001 with drop-frame timecode.
    pub fn frame_rate(&self, fps_override: Option<f64>) -> Result<FrameRate> {
        if let Some(value) = fps_override {
            return FrameRate::from_f64(value).ok_or(StlError::InvalidFrameRate { value });
        }
        match self.disk_format.trim() {
            DFC_STL25 => Ok(FrameRate::Fps25),
            DFC_STL30 => Ok(FrameRate::Fps29_97),
            other => Err(StlError::UnrecognizedFrameRate {
                dfc: other.to_string(),
            }),
        }
    }

    /// Builds the GSI block written on the extraction path.
    ///
    /// Fixed values except the disk format code (from the frame rate), the
    /// programme title and the block/subtitle counts, which the writer
    /// fills once all TTI blocks exist.
    pub fn build(
        program_title: &str,
        frame_rate: FrameRate,
        tti_blocks: u32,
        subtitles: u32,
    ) -> [u8; GSI_LEN] {
        let mut gsi = [b' '; GSI_LEN];
        let today = Local::now().format("%y%m%d").to_string();

        put(&mut gsi, 0, b"850"); // CPN
        let dfc = format!("STL{:02}.01", frame_rate.nominal_fps());
        put(&mut gsi, 3, dfc.as_bytes()); // DFC
        put(&mut gsi, 11, b"1"); // DSC: teletext level 1
        put(&mut gsi, 12, &CodeTable::Latin.to_gsi()); // CCT
        put(&mut gsi, 14, b"  "); // LC: unspecified
        put_padded(&mut gsi, 16, program_title.as_bytes(), 32); // OPT
        put(&mut gsi, 224, today.as_bytes()); // CD
        put(&mut gsi, 230, today.as_bytes()); // RD
        put(&mut gsi, 236, b"00"); // RN
        put(&mut gsi, 238, format!("{:05}", tti_blocks).as_bytes()); // TNB
        put(&mut gsi, 243, format!("{:05}", subtitles).as_bytes()); // TNS
        put(&mut gsi, 248, b"001"); // TNG
        put(&mut gsi, 251, b"40"); // MNC
        put(&mut gsi, 253, b"23"); // MNR
        put(&mut gsi, 255, b"1"); // TCS
        put(&mut gsi, 256, b"00000000"); // TCP
        put(&mut gsi, 264, b"00000000"); // TCF
        put(&mut gsi, 272, b"1"); // TND
        put(&mut gsi, 273, b"1"); // DSN
        gsi
    }
}

fn ascii(slice: &[u8]) -> String {
    slice
        .iter()
        .filter(|byte| byte.is_ascii() && !byte.is_ascii_control())
        .map(|&byte| byte as char)
        .collect::<String>()
        .trim()
        .to_string()
}

fn put(gsi: &mut [u8; GSI_LEN], offset: usize, value: &[u8]) {
    gsi[offset..offset + value.len()].copy_from_slice(value);
}

fn put_padded(gsi: &mut [u8; GSI_LEN], offset: usize, value: &[u8], width: usize) {
    let len = value.len().min(width);
    gsi[offset..offset + len].copy_from_slice(&value[..len]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_requires_full_block() {
        let err = Gsi::parse(&[0u8; 100]).unwrap_err();
        assert!(matches!(err, StlError::InputTooShort { len: 100 }));
    }

    #[test]
    fn test_build_parse_round_trip() {
        let raw = Gsi::build("Evening News", FrameRate::Fps25, 12, 10);
        let gsi = Gsi::parse(&raw).unwrap();
        assert_eq!(gsi.code_page, "850");
        assert_eq!(gsi.disk_format, "STL25.01");
        assert_eq!(gsi.display_standard, b'1');
        assert_eq!(gsi.code_table, CodeTable::Latin);
        assert!(!gsi.unknown_code_table);
        assert_eq!(gsi.program_title, "Evening News");
        assert_eq!(gsi.tti_blocks, Some(12));
        assert_eq!(gsi.subtitles, Some(10));
    }

    #[test]
    fn test_frame_rate_detection() {
        let gsi = Gsi::parse(&Gsi::build("", FrameRate::Fps25, 0, 0)).unwrap();
        assert_eq!(gsi.frame_rate(None).unwrap(), FrameRate::Fps25);

        let gsi = Gsi::parse(&Gsi::build("", FrameRate::Fps29_97, 0, 0)).unwrap();
        assert_eq!(gsi.disk_format, "STL30.01");
        assert_eq!(gsi.frame_rate(None).unwrap(), FrameRate::Fps29_97);
    }

    #[test]
    fn test_unknown_dfc_is_fatal_without_override() {
        let mut raw = Gsi::build("", FrameRate::Fps25, 0, 0);
        raw[3..11].copy_from_slice(b"STL99.01");
        let gsi = Gsi::parse(&raw).unwrap();
        assert!(matches!(
            gsi.frame_rate(None),
            Err(StlError::UnrecognizedFrameRate { .. })
        ));
        assert_eq!(gsi.frame_rate(Some(25.0)).unwrap(), FrameRate::Fps25);
        assert!(matches!(
            gsi.frame_rate(Some(-3.0)),
            Err(StlError::InvalidFrameRate { .. })
        ));
    }

    #[test]
    fn test_unknown_cct_falls_back_to_latin() {
        let mut raw = Gsi::build("", FrameRate::Fps25, 0, 0);
        raw[12..14].copy_from_slice(b"09");
        let gsi = Gsi::parse(&raw).unwrap();
        assert_eq!(gsi.code_table, CodeTable::Latin);
        assert!(gsi.unknown_code_table);
    }

    #[test]
    fn test_cyrillic_cct() {
        let mut raw = Gsi::build("", FrameRate::Fps25, 0, 0);
        raw[12..14].copy_from_slice(b"01");
        let gsi = Gsi::parse(&raw).unwrap();
        assert_eq!(gsi.code_table, CodeTable::Cyrillic);
    }
}
