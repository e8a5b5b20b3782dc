//! Teletext G0 display sets (ETSI EN 300 706 section 15).
//!
//! The Latin G0 set is ASCII with a handful of teletext-specific defaults;
//! thirteen national option subsets override the same thirteen code points
//! (Table 36 of the standard). The Cyrillic, Greek, Arabic and Hebrew sets
//! replace the letter range wholesale.

/// The thirteen code points a national option subset may override.
const NATIONAL_POSITIONS: [u8; 13] = [
    0x23, 0x24, 0x40, 0x5B, 0x5C, 0x5D, 0x5E, 0x5F, 0x60, 0x7B, 0x7C, 0x7D, 0x7E,
];

/// National option subsets of the Latin G0 set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NationalOption {
    #[default]
    English,
    German,
    SwedishFinnishHungarian,
    Italian,
    French,
    PortugueseSpanish,
    CzechSlovak,
    Polish,
    SerbianCroatianSlovenian,
    Romanian,
    Turkish,
    Estonian,
    LettishLithuanian,
}

impl NationalOption {
    /// Maps the 3-bit national option field (control bits C12..C14 of the
    /// page header) through the default Western European designation.
    pub fn from_control(bits: u8) -> Self {
        match bits & 0x07 {
            0 => NationalOption::English,
            1 => NationalOption::German,
            2 => NationalOption::SwedishFinnishHungarian,
            3 => NationalOption::Italian,
            4 => NationalOption::French,
            5 => NationalOption::PortugueseSpanish,
            6 => NationalOption::CzechSlovak,
            _ => NationalOption::English,
        }
    }

    /// The replacement characters for [`NATIONAL_POSITIONS`], in order.
    fn replacements(self) -> [char; 13] {
        match self {
            NationalOption::English => [
                '£', '$', '@', '←', '½', '→', '↑', '#', '–', '¼', '‖', '¾', '÷',
            ],
            NationalOption::German => [
                '#', '$', '§', 'Ä', 'Ö', 'Ü', '^', '_', '°', 'ä', 'ö', 'ü', 'ß',
            ],
            NationalOption::SwedishFinnishHungarian => [
                '#', '¤', 'É', 'Ä', 'Ö', 'Å', 'Ü', '_', 'é', 'ä', 'ö', 'å', 'ü',
            ],
            NationalOption::Italian => [
                '£', '$', 'é', '°', 'ç', '→', '↑', '#', 'ù', 'à', 'ò', 'è', 'ì',
            ],
            NationalOption::French => [
                'é', 'ï', 'à', 'ë', 'ê', 'ù', 'î', '#', 'è', 'â', 'ô', 'û', 'ç',
            ],
            NationalOption::PortugueseSpanish => [
                'ç', '$', '¡', 'á', 'é', 'í', 'ó', 'ú', '¿', 'ü', 'ñ', 'è', 'à',
            ],
            NationalOption::CzechSlovak => [
                '#', 'ů', 'č', 'ť', 'ž', 'ý', 'í', 'ř', 'é', 'á', 'ě', 'ú', 'š',
            ],
            NationalOption::Polish => [
                '#', 'ń', 'ą', 'Ƶ', 'Ś', 'Ł', 'ć', 'ó', 'ę', 'ż', 'ś', 'ł', 'ź',
            ],
            NationalOption::SerbianCroatianSlovenian => [
                '#', 'Ë', 'Č', 'Ć', 'Ž', 'Đ', 'Š', 'ë', 'č', 'ć', 'ž', 'đ', 'š',
            ],
            NationalOption::Romanian => [
                '#', '¤', 'Ţ', 'Â', 'Ş', 'Ă', 'Î', 'ı', 'ţ', 'â', 'ş', 'ă', 'î',
            ],
            NationalOption::Turkish => [
                '₤', 'ğ', 'İ', 'Ş', 'Ö', 'Ç', 'Ü', 'Ğ', 'ı', 'ş', 'ö', 'ç', 'ü',
            ],
            NationalOption::Estonian => [
                '#', 'õ', 'Š', 'Ä', 'Ö', 'Ž', 'Ü', 'Õ', 'š', 'ä', 'ö', 'ž', 'ü',
            ],
            NationalOption::LettishLithuanian => [
                '#', '$', 'Š', 'ė', 'ę', 'Ž', 'č', 'ū', 'š', 'ą', 'ų', 'ž', 'į',
            ],
        }
    }
}

/// A G0 display set: the table used to map 7-bit display codes to Unicode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum G0Set {
    Latin(NationalOption),
    Cyrillic,
    Greek,
    Arabic,
    Hebrew,
}

impl Default for G0Set {
    fn default() -> Self {
        G0Set::Latin(NationalOption::default())
    }
}

impl G0Set {
    /// Maps a 7-bit display code to its character.
    ///
    /// Codes below 0x20 are spacing attributes, not glyphs, and return
    /// `None`.
    pub fn decode(self, code: u8) -> Option<char> {
        let code = code & 0x7F;
        if code < 0x20 {
            return None;
        }
        Some(match self {
            G0Set::Latin(option) => latin(code, option),
            G0Set::Cyrillic => cyrillic(code),
            G0Set::Greek => greek(code),
            G0Set::Arabic => arabic(code),
            G0Set::Hebrew => hebrew(code),
        })
    }
}

fn latin(code: u8, option: NationalOption) -> char {
    if let Some(slot) = NATIONAL_POSITIONS.iter().position(|&p| p == code) {
        return option.replacements()[slot];
    }
    match code {
        0x7F => '█',
        _ => code as char,
    }
}

fn cyrillic(code: u8) -> char {
    // Russian/Bulgarian variant; lowercase mirrors uppercase at +0x20.
    match code {
        0x40 => 'Ю',
        0x41 => 'А',
        0x42 => 'Б',
        0x43 => 'Ц',
        0x44 => 'Д',
        0x45 => 'Е',
        0x46 => 'Ф',
        0x47 => 'Г',
        0x48 => 'Х',
        0x49 => 'И',
        0x4A => 'Й',
        0x4B => 'К',
        0x4C => 'Л',
        0x4D => 'М',
        0x4E => 'Н',
        0x4F => 'О',
        0x50 => 'П',
        0x51 => 'Я',
        0x52 => 'Р',
        0x53 => 'С',
        0x54 => 'Т',
        0x55 => 'У',
        0x56 => 'Ж',
        0x57 => 'В',
        0x58 => 'Ь',
        0x59 => 'Ъ',
        0x5A => 'З',
        0x5B => 'Ш',
        0x5C => 'Э',
        0x5D => 'Щ',
        0x5E => 'Ч',
        0x5F => 'Ы',
        0x60 => 'ю',
        0x61 => 'а',
        0x62 => 'б',
        0x63 => 'ц',
        0x64 => 'д',
        0x65 => 'е',
        0x66 => 'ф',
        0x67 => 'г',
        0x68 => 'х',
        0x69 => 'и',
        0x6A => 'й',
        0x6B => 'к',
        0x6C => 'л',
        0x6D => 'м',
        0x6E => 'н',
        0x6F => 'о',
        0x70 => 'п',
        0x71 => 'я',
        0x72 => 'р',
        0x73 => 'с',
        0x74 => 'т',
        0x75 => 'у',
        0x76 => 'ж',
        0x77 => 'в',
        0x78 => 'ь',
        0x79 => 'ъ',
        0x7A => 'з',
        0x7B => 'ш',
        0x7C => 'э',
        0x7D => 'щ',
        0x7E => 'ч',
        0x7F => '█',
        _ => code as char,
    }
}

fn greek(code: u8) -> char {
    match code {
        0x40 => 'ΐ',
        0x41 => 'Α',
        0x42 => 'Β',
        0x43 => 'Γ',
        0x44 => 'Δ',
        0x45 => 'Ε',
        0x46 => 'Ζ',
        0x47 => 'Η',
        0x48 => 'Θ',
        0x49 => 'Ι',
        0x4A => 'Κ',
        0x4B => 'Λ',
        0x4C => 'Μ',
        0x4D => 'Ν',
        0x4E => 'Ξ',
        0x4F => 'Ο',
        0x50 => 'Π',
        0x51 => 'Ρ',
        0x52 => 'Σ',
        0x53 => 'Τ',
        0x54 => 'Υ',
        0x55 => 'Φ',
        0x56 => 'Χ',
        0x57 => 'Ψ',
        0x58 => 'Ω',
        0x59 => 'Ϊ',
        0x5A => 'Ϋ',
        0x5B => 'ά',
        0x5C => 'έ',
        0x5D => 'ή',
        0x5E => 'ί',
        0x5F => 'ΰ',
        0x60 => 'ΐ',
        0x61 => 'α',
        0x62 => 'β',
        0x63 => 'γ',
        0x64 => 'δ',
        0x65 => 'ε',
        0x66 => 'ζ',
        0x67 => 'η',
        0x68 => 'θ',
        0x69 => 'ι',
        0x6A => 'κ',
        0x6B => 'λ',
        0x6C => 'μ',
        0x6D => 'ν',
        0x6E => 'ξ',
        0x6F => 'ο',
        0x70 => 'π',
        0x71 => 'ρ',
        0x72 => 'ς',
        0x73 => 'σ',
        0x74 => 'τ',
        0x75 => 'υ',
        0x76 => 'φ',
        0x77 => 'χ',
        0x78 => 'ψ',
        0x79 => 'ω',
        0x7A => 'ϊ',
        0x7B => 'ϋ',
        0x7C => 'ό',
        0x7D => 'ύ',
        0x7E => 'ώ',
        0x7F => '█',
        _ => code as char,
    }
}

fn arabic(code: u8) -> char {
    // Basic letter forms; contextual shaping is a rendering concern.
    // Letters have no case, so 0x60..0x7E mirrors 0x40..0x5E.
    let code = if (0x60..0x7F).contains(&code) {
        code - 0x20
    } else {
        code
    };
    match code {
        0x23 => '£',
        0x2C => '،',
        0x3B => '؛',
        0x3F => '؟',
        0x40 => 'ـ',
        0x41 => 'ا',
        0x42 => 'ب',
        0x43 => 'ت',
        0x44 => 'ث',
        0x45 => 'ج',
        0x46 => 'ح',
        0x47 => 'خ',
        0x48 => 'د',
        0x49 => 'ذ',
        0x4A => 'ر',
        0x4B => 'ز',
        0x4C => 'س',
        0x4D => 'ش',
        0x4E => 'ص',
        0x4F => 'ض',
        0x50 => 'ط',
        0x51 => 'ظ',
        0x52 => 'ع',
        0x53 => 'غ',
        0x54 => 'ف',
        0x55 => 'ق',
        0x56 => 'ك',
        0x57 => 'ل',
        0x58 => 'م',
        0x59 => 'ن',
        0x5A => 'ه',
        0x5B => 'و',
        0x5C => 'ى',
        0x5D => 'ي',
        0x5E => 'ء',
        0x5F => 'ة',
        0x7F => '█',
        _ => code as char,
    }
}

fn hebrew(code: u8) -> char {
    match code {
        0x23 => '£',
        0x60 => 'א',
        0x61 => 'ב',
        0x62 => 'ג',
        0x63 => 'ד',
        0x64 => 'ה',
        0x65 => 'ו',
        0x66 => 'ז',
        0x67 => 'ח',
        0x68 => 'ט',
        0x69 => 'י',
        0x6A => 'ך',
        0x6B => 'כ',
        0x6C => 'ל',
        0x6D => 'ם',
        0x6E => 'מ',
        0x6F => 'ן',
        0x70 => 'נ',
        0x71 => 'ס',
        0x72 => 'ע',
        0x73 => 'ף',
        0x74 => 'פ',
        0x75 => 'ץ',
        0x76 => 'צ',
        0x77 => 'ק',
        0x78 => 'ר',
        0x79 => 'ש',
        0x7A => 'ת',
        0x7B => '¼',
        0x7C => '‖',
        0x7D => '¾',
        0x7E => '÷',
        0x7F => '█',
        _ => code as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_latin_base_defaults() {
        let g0 = G0Set::default();
        assert_eq!(g0.decode(0x41), Some('A'));
        assert_eq!(g0.decode(0x23), Some('£'));
        assert_eq!(g0.decode(0x7E), Some('÷'));
        assert_eq!(g0.decode(0x20), Some(' '));
        assert_eq!(g0.decode(0x1D), None);
    }

    #[test]
    fn test_national_option_overrides_only_designated_positions() {
        let english = G0Set::Latin(NationalOption::English);
        let german = G0Set::Latin(NationalOption::German);
        for code in 0x20..0x7F {
            let differs = english.decode(code) != german.decode(code);
            let designated = NATIONAL_POSITIONS.contains(&code);
            if differs {
                assert!(designated, "code {:#04x} differs outside the subset", code);
            }
        }
        assert_eq!(german.decode(0x5B), Some('Ä'));
        assert_eq!(german.decode(0x7E), Some('ß'));
    }

    #[test]
    fn test_from_control_default_designation() {
        assert_eq!(NationalOption::from_control(0), NationalOption::English);
        assert_eq!(NationalOption::from_control(4), NationalOption::French);
        assert_eq!(NationalOption::from_control(6), NationalOption::CzechSlovak);
        // Reserved value falls back to English.
        assert_eq!(NationalOption::from_control(7), NationalOption::English);
    }

    #[test]
    fn test_cyrillic_letters() {
        assert_eq!(G0Set::Cyrillic.decode(0x41), Some('А'));
        assert_eq!(G0Set::Cyrillic.decode(0x61), Some('а'));
        assert_eq!(G0Set::Cyrillic.decode(0x40), Some('Ю'));
        // Digits keep their ASCII positions.
        assert_eq!(G0Set::Cyrillic.decode(0x31), Some('1'));
    }

    #[test]
    fn test_hebrew_alphabet_range() {
        assert_eq!(G0Set::Hebrew.decode(0x60), Some('א'));
        assert_eq!(G0Set::Hebrew.decode(0x7A), Some('ת'));
        assert_eq!(G0Set::Hebrew.decode(0x41), Some('A'));
    }

    #[test]
    fn test_arabic_mirror() {
        assert_eq!(G0Set::Arabic.decode(0x41), G0Set::Arabic.decode(0x61));
        assert_eq!(G0Set::Arabic.decode(0x3F), Some('؟'));
    }
}
