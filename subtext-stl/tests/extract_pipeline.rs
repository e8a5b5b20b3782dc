//! Extraction path coverage: teletext capture in, STL out, read back.

use pretty_assertions::assert_eq;
use subtext_caption::{Style, TeletextColor, TextAlign};
use subtext_stl::{Extractor, StlReader, GSI_LEN, TTI_LEN};
use subtext_teletext::Timing;
use subtext_timecode::FrameRate;

/// The 16 valid Hamming 8/4 codewords, indexed by nibble.
const H84: [u8; 16] = [
    0x15, 0x02, 0x49, 0x5E, 0x64, 0x73, 0x38, 0x2F, 0xD0, 0xC7, 0x8C, 0x9B, 0xA1, 0xB6, 0xFD,
    0xEA,
];

fn parity(byte: u8) -> u8 {
    if byte.count_ones() % 2 == 1 {
        byte
    } else {
        byte | 0x80
    }
}

fn header_packet(magazine: u8, page: u8, erase: bool, subtitle: bool) -> [u8; 42] {
    let mut packet = [0u8; 42];
    packet[0] = H84[(magazine & 0x07) as usize];
    packet[1] = H84[0];
    packet[2] = H84[(page & 0x0F) as usize];
    packet[3] = H84[(page >> 4) as usize];
    packet[4] = H84[0];
    packet[5] = H84[if erase { 0x8 } else { 0x0 }];
    packet[6] = H84[0];
    packet[7] = H84[if subtitle { 0x8 } else { 0x0 }];
    packet[8] = H84[0];
    packet[9] = H84[0];
    for byte in packet.iter_mut().skip(10) {
        *byte = parity(b' ');
    }
    packet
}

fn row_packet(magazine: u8, row: u8, bytes: &[u8]) -> [u8; 42] {
    let mut packet = [0u8; 42];
    packet[0] = H84[((magazine & 0x07) | ((row & 0x01) << 3)) as usize];
    packet[1] = H84[(row >> 1) as usize];
    let mut payload = [b' '; 40];
    for (slot, &byte) in payload.iter_mut().zip(bytes) {
        *slot = byte;
    }
    for (target, byte) in packet.iter_mut().skip(2).zip(payload) {
        *target = parity(byte);
    }
    packet
}

/// Centers text within the 40-column row.
fn centered(text: &[u8]) -> Vec<u8> {
    let margin = (40 - text.len()) / 2;
    let mut row = vec![b' '; margin];
    row.extend_from_slice(text);
    row
}

fn vanc(packets: &[[u8; 42]]) -> Vec<u8> {
    let mut capture = Vec::new();
    for packet in packets {
        capture.extend_from_slice(&[0x55, 0x55, 0x27]);
        capture.extend_from_slice(packet);
    }
    capture
}

#[test]
fn capture_to_stl_to_captions() {
    let packets = [
        header_packet(1, 0x88, true, true),
        row_packet(1, 20, &centered(b"News at ten")),
        header_packet(1, 0x88, true, true),
        {
            let mut bytes = centered(b"Breaking");
            bytes.insert(0, 0x01); // red
            row_packet(1, 20, &bytes)
        },
    ];
    let capture = vanc(&packets);
    // Packet offsets advance by 45; the third packet starts the second page
    // at the five-second mark.
    let timing = Timing::Samples(vec![(0, 1_000_000), (90, 5_000_000)]);

    let stl = Extractor::new()
        .with_timing(timing)
        .with_title("Ten o'clock bulletin")
        .extract(&capture);

    assert!(stl.len() > GSI_LEN);
    assert_eq!((stl.len() - GSI_LEN) % TTI_LEN, 0);

    let document = StlReader::new().read(&stl).unwrap();
    assert_eq!(document.frame_rate, FrameRate::Fps25);
    assert_eq!(document.gsi.program_title, "Ten o'clock bulletin");
    assert_eq!(document.captions.len(), 2);

    let first = &document.captions[0];
    assert_eq!(first.text, "News at ten");
    assert_eq!(first.start_us, 1_000_000);
    // The erase transition at five seconds closes the first page.
    assert_eq!(first.end_us, 5_000_000);
    assert_eq!(first.start_timecode, "00:00:01:00");
    // Boxed broadcast subtitles read back with a black background.
    assert_eq!(
        first.style,
        Some(Style {
            background_color: Some(TeletextColor::Black),
            ..Style::default()
        })
    );
    let layout = first.layout.unwrap();
    assert_eq!(layout.vertical_position, Some(20));
    assert_eq!(layout.text_align, Some(TextAlign::Center));

    let second = &document.captions[1];
    assert_eq!(second.text, "Breaking");
    assert_eq!(second.start_us, 5_000_000);
    assert_eq!(
        second.style,
        Some(Style {
            color: Some(TeletextColor::Red),
            background_color: Some(TeletextColor::Black),
            ..Style::default()
        })
    );
}

#[test]
fn long_page_splits_into_continuation_blocks() {
    let line = [b'x'; 38];
    let packets = [
        header_packet(1, 0x88, true, true),
        row_packet(1, 20, &line),
        row_packet(1, 21, &line),
        row_packet(1, 22, &line),
    ];
    let capture = vanc(&packets);
    let stl = Extractor::new().extract(&capture);

    // Three 38-character rows with box codes exceed one 112-byte text
    // field.
    let blocks = (stl.len() - GSI_LEN) / TTI_LEN;
    assert!(blocks >= 2, "expected continuation blocks, got {}", blocks);

    let document = StlReader::new().read(&stl).unwrap();
    assert_eq!(document.captions.len(), 1);
    let expected: String = vec![String::from_utf8_lossy(&line).to_string(); 3].join("\n");
    assert_eq!(document.captions[0].text, expected);
    assert!(document.diagnostics.is_empty());
}

#[test]
fn damaged_packets_are_dropped_not_fatal() {
    let mut bad_header = header_packet(1, 0x88, true, true);
    bad_header[0] ^= 0x03; // two bit errors: uncorrectable address

    let packets = [
        bad_header,
        header_packet(1, 0x88, true, true),
        row_packet(1, 20, b"Still here"),
    ];
    let capture = vanc(&packets);
    let stl = Extractor::new().extract(&capture);
    let document = StlReader::new().read(&stl).unwrap();

    assert_eq!(document.captions.len(), 1);
    assert_eq!(document.captions[0].text, "Still here");
}

#[test]
fn non_subtitle_pages_produce_no_output() {
    let packets = [
        header_packet(1, 0x00, true, false),
        row_packet(1, 5, b"INDEX  100  NEWS  200"),
    ];
    let capture = vanc(&packets);
    let stl = Extractor::new().extract(&capture);
    assert_eq!(stl.len(), GSI_LEN);

    let document = StlReader::new().read(&stl).unwrap();
    assert!(document.captions.is_empty());
}

#[test]
fn raw_capture_without_sync_patterns() {
    let mut capture = Vec::new();
    capture.extend_from_slice(&header_packet(1, 0x88, true, true));
    capture.extend_from_slice(&row_packet(1, 20, b"Raw dump"));
    let stl = Extractor::new().extract(&capture);

    let document = StlReader::new().read(&stl).unwrap();
    assert_eq!(document.captions.len(), 1);
    assert_eq!(document.captions[0].text, "Raw dump");
}

#[test]
fn double_height_survives_the_round_trip() {
    let mut bytes = vec![0x0D];
    bytes.extend_from_slice(b"Tall line");
    let packets = [
        header_packet(1, 0x88, true, true),
        row_packet(1, 20, &bytes),
    ];
    let capture = vanc(&packets);
    let stl = Extractor::new().extract(&capture);
    let document = StlReader::new().read(&stl).unwrap();

    let style = document.captions[0].style.unwrap();
    assert!(style.double_height);
    assert_eq!(document.captions[0].text, "Tall line");
}
