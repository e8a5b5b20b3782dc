//! The teletext-to-STL extraction pipeline.
//!
//! Feeds a demuxed ancillary-data capture through the packet splitter and
//! page aggregator, settles page display times, and renders the result as
//! an STL file. The demux step itself (pulling the data stream out of the
//! container) is the caller's concern; this pipeline starts at raw packet
//! bytes.

use crate::writer::StlWriter;
use subtext_teletext::{PacketStream, PacketView, PageAggregator, SubtitlePage, Timing};
use subtext_timecode::FrameRate;

/// Display duration for pages whose erase event was never observed.
const DEFAULT_DURATION_US: u64 = 3_000_000;

/// Shortest display duration a page is given.
const MIN_DURATION_US: u64 = 1_000_000;

/// Teletext capture to STL converter.
#[derive(Debug, Clone)]
pub struct Extractor {
    timing: Timing,
    frame_rate: FrameRate,
    program_title: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Extractor {
            timing: Timing::PacketIndex,
            frame_rate: FrameRate::Fps25,
            program_title: String::new(),
        }
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the packet timing source.
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Sets the output frame rate (default PAL 25 fps).
    pub fn with_frame_rate(mut self, frame_rate: FrameRate) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Sets the programme title written into the GSI block.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.program_title = title.into();
        self
    }

    /// Converts a packet capture into STL bytes.
    ///
    /// Packets with unreadable protected fields are dropped; decoding
    /// continues with the next packet.
    pub fn extract(&self, capture: &[u8]) -> Vec<u8> {
        let mut aggregator = PageAggregator::new();
        let mut dropped = 0usize;
        for packet in PacketStream::new(capture, self.timing.clone()) {
            match PacketView::parse(&packet.data) {
                Ok(view) => aggregator.push(packet.pts_us, &view),
                Err(err) => {
                    dropped += 1;
                    log::debug!("dropping packet: {}", err);
                }
            }
        }
        if dropped > 0 {
            log::debug!("{} packet(s) dropped on protection errors", dropped);
        }

        let mut pages = aggregator.finish();
        settle_display_times(&mut pages);
        log::debug!("{} subtitle page(s) extracted", pages.len());

        StlWriter::new(self.frame_rate)
            .with_title(self.program_title.clone())
            .write(&pages)
    }
}

/// Gives every page a definite display window. An observed erase time is
/// kept as-is; pages that never saw one get a default duration, capped at
/// the next page's onset and floored so flicker-length pages stay readable.
fn settle_display_times(pages: &mut [SubtitlePage]) {
    for index in 0..pages.len() {
        let onset = pages[index].onset_us;
        let clear = match pages[index].clear_us {
            Some(observed) => observed.max(onset),
            None => {
                let mut clear = onset + DEFAULT_DURATION_US;
                if let Some(next) = pages.get(index + 1) {
                    clear = clear.min(next.onset_us);
                }
                clear.max(onset + MIN_DURATION_US)
            }
        };
        pages[index].clear_us = Some(clear);
    }
}
