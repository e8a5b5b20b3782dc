//! Teletext packet parsing and stream splitting.
//!
//! A teletext packet is 42 bytes: two Hamming 8/4 address bytes carrying the
//! magazine and packet number, then 40 payload bytes. In OP-47/VANC carriage
//! each packet is preceded by the clock run-in and framing code
//! `0x55 0x55 0x27`; some captures carry the whole line bit-reversed, which
//! shows up as a `0xE4` framing code.

use crate::error::{Result, TeletextError};
use subtext_core::{hamming_8_4, hamming_8_4_pair};

/// Packet length: 2 address bytes + 40 payload bytes.
pub const PACKET_LEN: usize = 42;

/// Clock run-in preceding the framing code in VANC carriage.
pub const CLOCK_RUN_IN: u8 = 0x55;

/// Framing code closing the clock run-in.
pub const FRAMING_CODE: u8 = 0x27;

/// Control bits C4..C14 from the page header, assembled into one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageControl(pub u16);

impl PageControl {
    /// C4: previously displayed content of this page is to be cleared.
    pub fn erase_page(&self) -> bool {
        self.0 & 0x0010 != 0
    }

    /// C5: newsflash page.
    pub fn newsflash(&self) -> bool {
        self.0 & 0x0020 != 0
    }

    /// C6: subtitle page.
    pub fn subtitle(&self) -> bool {
        self.0 & 0x0040 != 0
    }

    /// C12..C14: national option subset designation.
    pub fn national_option(&self) -> u8 {
        ((self.0 >> 12) & 0x07) as u8
    }
}

/// A decoded page header (packet 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    /// Magazine 1..=8.
    pub magazine: u8,
    /// Page units and tens digits, BCD.
    pub page: u8,
    /// Subcode S1..S4.
    pub subcode: u16,
    pub control: PageControl,
}

/// One parsed packet, classified by packet number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketView {
    /// Packet 0: page header.
    Header(PageHeader),
    /// Packets 1..=25: display rows.
    Row {
        magazine: u8,
        row: u8,
        payload: [u8; 40],
    },
    /// Packets 26..=31: enhancement and service data, not needed for
    /// subtitles.
    Other { magazine: u8, row: u8 },
}

impl PacketView {
    /// Parses a 42-byte packet.
    ///
    /// Uncorrectable Hamming damage in the address or header fields makes
    /// the whole packet unusable.
    pub fn parse(data: &[u8]) -> Result<PacketView> {
        if data.len() < PACKET_LEN {
            return Err(TeletextError::TooShort { len: data.len() });
        }

        let address = hamming_8_4_pair(data[0], data[1])?;
        let magazine = match address & 0x07 {
            0 => 8,
            magazine => magazine,
        };
        let row = address >> 3;

        match row {
            0 => {
                let page = hamming_8_4_pair(data[2], data[3])?;
                let s1 = u16::from(hamming_8_4(data[4])?);
                let s2 = u16::from(hamming_8_4(data[5])?);
                let s3 = u16::from(hamming_8_4(data[6])?);
                let s4 = u16::from(hamming_8_4(data[7])?);
                let c7_c10 = u16::from(hamming_8_4(data[8])?);
                let c11_c14 = u16::from(hamming_8_4(data[9])?);

                let subcode = (s1 & 0xF) | ((s2 & 0x7) << 4) | ((s3 & 0xF) << 8) | ((s4 & 0x3) << 12);
                let control = PageControl(
                    ((s2 & 0x8) << 1) | ((s4 & 0xC) << 3) | (c7_c10 << 7) | (c11_c14 << 11),
                );

                Ok(PacketView::Header(PageHeader {
                    magazine,
                    page,
                    subcode,
                    control,
                }))
            }
            1..=25 => {
                let mut payload = [0u8; 40];
                payload.copy_from_slice(&data[2..42]);
                Ok(PacketView::Row {
                    magazine,
                    row,
                    payload,
                })
            }
            _ => Ok(PacketView::Other { magazine, row }),
        }
    }
}

/// A packet with its presentation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedPacket {
    pub pts_us: u64,
    pub data: [u8; PACKET_LEN],
}

/// How packet timestamps are derived from the capture.
#[derive(Debug, Clone, PartialEq)]
pub enum Timing {
    /// Two packets per 25 fps frame, counted from zero. The fallback when
    /// the demux stage provides no timing.
    PacketIndex,
    /// Byte offsets map proportionally onto the stream duration.
    Linear { duration_us: u64 },
    /// A parallel stream of `(byte_offset, pts_us)` samples, sorted by
    /// offset; each packet takes the timestamp of the latest sample at or
    /// before its offset.
    Samples(Vec<(usize, u64)>),
}

impl Timing {
    fn pts_for(&self, offset: usize, index: usize, total_len: usize) -> u64 {
        match self {
            Timing::PacketIndex => (index as u64 / 2) * 40_000,
            Timing::Linear { duration_us } => {
                if total_len == 0 {
                    0
                } else {
                    (offset as u128 * *duration_us as u128 / total_len as u128) as u64
                }
            }
            Timing::Samples(samples) => {
                match samples.binary_search_by_key(&offset, |&(sample_offset, _)| sample_offset) {
                    Ok(at) => samples[at].1,
                    Err(0) => samples.first().map_or(0, |&(_, pts)| pts),
                    Err(after) => samples[after - 1].1,
                }
            }
        }
    }
}

/// Splits a capture into timed 42-byte packets.
///
/// The stream head is probed for VANC sync patterns; without one the input
/// is treated as a raw 42-byte-aligned packet dump.
#[derive(Debug)]
pub struct PacketStream<'a> {
    data: &'a [u8],
    timing: Timing,
    format: StreamFormat,
    pos: usize,
    index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamFormat {
    Vanc,
    Raw,
}

impl<'a> PacketStream<'a> {
    pub fn new(data: &'a [u8], timing: Timing) -> Self {
        let probe = &data[..data.len().min(1000)];
        let format = if find_sync(probe).is_some() {
            StreamFormat::Vanc
        } else {
            StreamFormat::Raw
        };
        log::debug!(
            "teletext capture: {} bytes, {} framing",
            data.len(),
            match format {
                StreamFormat::Vanc => "OP-47/VANC",
                StreamFormat::Raw => "raw",
            }
        );
        PacketStream {
            data,
            timing,
            format,
            pos: 0,
            index: 0,
        }
    }

    fn next_vanc(&mut self) -> Option<TimedPacket> {
        let (at, reversed) = find_sync(&self.data[self.pos..])?;
        let start = self.pos + at + 3;
        if start + PACKET_LEN > self.data.len() {
            return None;
        }
        self.pos = start + PACKET_LEN;

        let mut data = [0u8; PACKET_LEN];
        data.copy_from_slice(&self.data[start..start + PACKET_LEN]);
        if reversed {
            for byte in &mut data {
                *byte = byte.reverse_bits();
            }
        }
        Some(self.emit(start, data))
    }

    fn next_raw(&mut self) -> Option<TimedPacket> {
        while self.pos + PACKET_LEN <= self.data.len() {
            let start = self.pos;
            self.pos += PACKET_LEN;
            // Idle lines are zero- or one-filled; skip them.
            if self.data[start] == 0x00 || self.data[start] == 0xFF {
                continue;
            }
            let mut data = [0u8; PACKET_LEN];
            data.copy_from_slice(&self.data[start..start + PACKET_LEN]);
            return Some(self.emit(start, data));
        }
        None
    }

    fn emit(&mut self, offset: usize, data: [u8; PACKET_LEN]) -> TimedPacket {
        let pts_us = self.timing.pts_for(offset, self.index, self.data.len());
        self.index += 1;
        TimedPacket { pts_us, data }
    }
}

impl<'a> Iterator for PacketStream<'a> {
    type Item = TimedPacket;

    fn next(&mut self) -> Option<TimedPacket> {
        match self.format {
            StreamFormat::Vanc => self.next_vanc(),
            StreamFormat::Raw => self.next_raw(),
        }
    }
}

/// Finds the next sync pattern; the flag reports a bit-reversed line.
fn find_sync(data: &[u8]) -> Option<(usize, bool)> {
    data.windows(3).enumerate().find_map(|(at, window)| {
        if window[0] == CLOCK_RUN_IN && window[1] == CLOCK_RUN_IN && window[2] == FRAMING_CODE {
            Some((at, false))
        } else if window[0] == CLOCK_RUN_IN.reverse_bits()
            && window[1] == CLOCK_RUN_IN.reverse_bits()
            && window[2] == FRAMING_CODE.reverse_bits()
        {
            Some((at, true))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// The 16 valid Hamming 8/4 codewords, indexed by nibble.
    const H84: [u8; 16] = [
        0x15, 0x02, 0x49, 0x5E, 0x64, 0x73, 0x38, 0x2F, 0xD0, 0xC7, 0x8C, 0x9B, 0xA1, 0xB6, 0xFD,
        0xEA,
    ];

    fn header_packet(magazine: u8, page: u8, control_c4_c6: (bool, bool)) -> [u8; 42] {
        let (erase, subtitle) = control_c4_c6;
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

    fn parity(byte: u8) -> u8 {
        if byte.count_ones() % 2 == 1 {
            byte
        } else {
            byte | 0x80
        }
    }

    #[test]
    fn test_parse_header() {
        let packet = header_packet(1, 0x88, (true, true));
        match PacketView::parse(&packet).unwrap() {
            PacketView::Header(header) => {
                assert_eq!(header.magazine, 1);
                assert_eq!(header.page, 0x88);
                assert!(header.control.erase_page());
                assert!(header.control.subtitle());
                assert!(!header.control.newsflash());
            }
            other => panic!("expected header, got {:?}", other),
        }
    }

    #[test]
    fn test_magazine_zero_means_eight() {
        let packet = header_packet(0, 0x01, (false, false));
        match PacketView::parse(&packet).unwrap() {
            PacketView::Header(header) => assert_eq!(header.magazine, 8),
            other => panic!("expected header, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_row_address() {
        let mut packet = [0u8; 42];
        // Magazine 2, row 20: address nibbles lo = 2 | (20 & 1) << 3,
        // hi = 20 >> 1.
        packet[0] = H84[(2 | ((20 & 0x01) << 3)) as usize];
        packet[1] = H84[(20 >> 1) as usize];
        for byte in packet.iter_mut().skip(2) {
            *byte = parity(b'X');
        }
        match PacketView::parse(&packet).unwrap() {
            PacketView::Row { magazine, row, payload } => {
                assert_eq!(magazine, 2);
                assert_eq!(row, 20);
                assert_eq!(payload[0] & 0x7F, b'X');
            }
            other => panic!("expected row, got {:?}", other),
        }
    }

    #[test]
    fn test_enhancement_rows_are_other() {
        let mut packet = [0u8; 42];
        packet[0] = H84[(1 | ((26 & 0x01) << 3)) as usize];
        packet[1] = H84[(26 >> 1) as usize];
        assert_eq!(
            PacketView::parse(&packet).unwrap(),
            PacketView::Other {
                magazine: 1,
                row: 26
            }
        );
    }

    #[test]
    fn test_uncorrectable_address_fails() {
        let mut packet = header_packet(1, 0x88, (false, true));
        packet[0] ^= 0x03;
        assert!(PacketView::parse(&packet).is_err());
    }

    #[test]
    fn test_short_packet_fails() {
        assert_eq!(
            PacketView::parse(&[0u8; 10]),
            Err(TeletextError::TooShort { len: 10 })
        );
    }

    #[test]
    fn test_vanc_stream_splitting() {
        let packet = header_packet(1, 0x88, (false, true));
        let mut capture = Vec::new();
        for _ in 0..3 {
            capture.extend_from_slice(&[0x00, 0x00, CLOCK_RUN_IN, CLOCK_RUN_IN, FRAMING_CODE]);
            capture.extend_from_slice(&packet);
        }
        let packets: Vec<_> = PacketStream::new(&capture, Timing::PacketIndex).collect();
        assert_eq!(packets.len(), 3);
        assert_eq!(packets[0].data, packet);
        assert_eq!(packets[0].pts_us, 0);
        assert_eq!(packets[2].pts_us, 40_000);
    }

    #[test]
    fn test_bit_reversed_vanc_line() {
        let packet = header_packet(1, 0x88, (false, true));
        let mut capture = vec![
            CLOCK_RUN_IN.reverse_bits(),
            CLOCK_RUN_IN.reverse_bits(),
            FRAMING_CODE.reverse_bits(),
        ];
        capture.extend(packet.iter().map(|byte| byte.reverse_bits()));
        let packets: Vec<_> = PacketStream::new(&capture, Timing::PacketIndex).collect();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].data, packet);
    }

    #[test]
    fn test_raw_stream_skips_idle_lines() {
        let packet = header_packet(1, 0x88, (false, true));
        let mut capture = Vec::new();
        capture.extend_from_slice(&[0x00; PACKET_LEN]);
        capture.extend_from_slice(&packet);
        capture.extend_from_slice(&[0xFF; PACKET_LEN]);
        let packets: Vec<_> = PacketStream::new(&capture, Timing::PacketIndex).collect();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].data, packet);
    }

    #[test]
    fn test_linear_timing() {
        let packet = header_packet(1, 0x88, (false, true));
        let mut capture = Vec::new();
        for _ in 0..2 {
            capture.extend_from_slice(&[CLOCK_RUN_IN, CLOCK_RUN_IN, FRAMING_CODE]);
            capture.extend_from_slice(&packet);
        }
        let duration = 9_000_000u64;
        let packets: Vec<_> = PacketStream::new(
            &capture,
            Timing::Linear {
                duration_us: duration,
            },
        )
        .collect();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].pts_us, 3 * duration / 90);
        assert!(packets[1].pts_us > packets[0].pts_us);
    }

    #[test]
    fn test_sample_timing() {
        let packet = header_packet(1, 0x88, (false, true));
        let mut capture = Vec::new();
        for _ in 0..2 {
            capture.extend_from_slice(&[CLOCK_RUN_IN, CLOCK_RUN_IN, FRAMING_CODE]);
            capture.extend_from_slice(&packet);
        }
        let samples = vec![(0usize, 1_000_000u64), (45usize, 2_000_000u64)];
        let packets: Vec<_> =
            PacketStream::new(&capture, Timing::Samples(samples)).collect();
        assert_eq!(packets[0].pts_us, 1_000_000);
        assert_eq!(packets[1].pts_us, 2_000_000);
    }
}
