//! EBU Tech 3264-E character code tables.
//!
//! The GSI CCT field selects how glyph bytes of the TTI text field map to
//! characters: ISO 6937 for Latin (Annex 1, including two-byte floating
//! diacritics) and ISO 8859-5/6/7/8 for the Cyrillic, Arabic, Greek and
//! Hebrew tables.

use textcode::{iso6937, iso8859_5, iso8859_6, iso8859_7, iso8859_8};

/// Character code table selector from the GSI block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeTable {
    #[default]
    Latin,
    Cyrillic,
    Arabic,
    Greek,
    Hebrew,
}

impl CodeTable {
    /// Parses the two ASCII digits of the GSI CCT field ("00".."04").
    pub fn from_gsi(field: &[u8; 2]) -> Option<CodeTable> {
        match field {
            b"00" => Some(CodeTable::Latin),
            b"01" => Some(CodeTable::Cyrillic),
            b"02" => Some(CodeTable::Arabic),
            b"03" => Some(CodeTable::Greek),
            b"04" => Some(CodeTable::Hebrew),
            _ => None,
        }
    }

    /// The two ASCII digits written to the GSI CCT field.
    pub fn to_gsi(self) -> [u8; 2] {
        match self {
            CodeTable::Latin => *b"00",
            CodeTable::Cyrillic => *b"01",
            CodeTable::Arabic => *b"02",
            CodeTable::Greek => *b"03",
            CodeTable::Hebrew => *b"04",
        }
    }

    /// Decodes a run of glyph bytes from a TTI text field.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            CodeTable::Latin => iso6937::decode_to_string(bytes),
            CodeTable::Cyrillic => iso8859_5::decode_to_string(bytes),
            CodeTable::Arabic => iso8859_6::decode_to_string(bytes),
            CodeTable::Greek => iso8859_7::decode_to_string(bytes),
            CodeTable::Hebrew => iso8859_8::decode_to_string(bytes),
        }
    }

    /// Encodes text into TTI glyph bytes.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            CodeTable::Latin => iso6937::encode_to_vec(text),
            CodeTable::Cyrillic => iso8859_5::encode_to_vec(text),
            CodeTable::Arabic => iso8859_6::encode_to_vec(text),
            CodeTable::Greek => iso8859_7::encode_to_vec(text),
            CodeTable::Hebrew => iso8859_8::encode_to_vec(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cct_field_round_trip() {
        for table in [
            CodeTable::Latin,
            CodeTable::Cyrillic,
            CodeTable::Arabic,
            CodeTable::Greek,
            CodeTable::Hebrew,
        ] {
            assert_eq!(CodeTable::from_gsi(&table.to_gsi()), Some(table));
        }
        assert_eq!(CodeTable::from_gsi(b"07"), None);
        assert_eq!(CodeTable::from_gsi(b"  "), None);
    }

    #[test]
    fn test_latin_ascii_passthrough() {
        assert_eq!(CodeTable::Latin.decode(b"Hello"), "Hello");
        assert_eq!(CodeTable::Latin.encode("Hello"), b"Hello".to_vec());
    }

    #[test]
    fn test_latin_pound_sign() {
        // ISO 6937 places the pound sterling sign at 0xA3.
        assert_eq!(CodeTable::Latin.decode(&[0xA3]), "£");
    }

    #[test]
    fn test_latin_diacritic_round_trip() {
        let encoded = CodeTable::Latin.encode("café");
        assert_eq!(CodeTable::Latin.decode(&encoded), "café");
    }

    #[test]
    fn test_cyrillic_decode() {
        // ISO 8859-5: 0xB0 is the capital A.
        assert_eq!(CodeTable::Cyrillic.decode(&[0xB0]), "А");
    }
}
