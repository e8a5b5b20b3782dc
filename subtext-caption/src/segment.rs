//! Inline-style segmentation.
//!
//! The segmenter is a state machine over the decoded control/glyph stream of
//! one logical subtitle. Runs close whenever a control code changes the
//! active style; the line-break event resets the foreground color to white
//! for the following run (teletext convention, also what Adobe Premiere
//! expects), while every other attribute persists across lines.

use crate::types::{Segment, Style, TeletextColor};

/// One decoded event from a subtitle text field.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEvent {
    /// Decoded glyph text.
    Text(String),
    /// Foreground color spacing attribute.
    Color(TeletextColor),
    /// Black background attribute.
    BlackBackground,
    /// Background takes the current foreground color.
    NewBackground,
    Flash(bool),
    BoxOn,
    BoxOff,
    DoubleHeight(bool),
    Italic(bool),
    Underline(bool),
    Bold(bool),
    LineBreak,
}

/// The flattened result of a segmentation pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentedText {
    /// Concatenation of all runs.
    pub text: String,
    /// Set when one non-default style covers the whole text.
    pub style: Option<Style>,
    /// Set when two or more distinct styles appear inline.
    pub segments: Option<Vec<Segment>>,
}

#[derive(Debug, Clone, PartialEq)]
struct Run {
    text: String,
    style: Style,
}

/// Builds styled runs from a [`TextEvent`] stream.
#[derive(Debug, Default)]
pub struct Segmenter {
    style: Style,
    buffer: String,
    runs: Vec<Run>,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one event into the state machine.
    pub fn push(&mut self, event: TextEvent) {
        match event {
            TextEvent::Text(text) => self.buffer.push_str(&text),
            TextEvent::Color(color) => {
                let color = (color != TeletextColor::White).then_some(color);
                if self.style.color != color {
                    // The color code occupies a display cell and renders as
                    // a space between the neighbouring runs.
                    if !self.buffer.is_empty() && !self.buffer.ends_with(' ') {
                        self.buffer.push(' ');
                    }
                    self.flush();
                    self.style.color = color;
                }
            }
            TextEvent::BlackBackground => {
                self.apply(|style| style.background_color = Some(TeletextColor::Black));
            }
            TextEvent::NewBackground => {
                let foreground = self.style.color.unwrap_or(TeletextColor::White);
                self.apply(|style| style.background_color = Some(foreground));
            }
            TextEvent::Flash(on) => self.apply(|style| style.flash = on),
            TextEvent::BoxOn => {
                self.apply(|style| style.background_color = Some(TeletextColor::Black));
            }
            TextEvent::BoxOff => {}
            TextEvent::DoubleHeight(on) => self.apply(|style| style.double_height = on),
            TextEvent::Italic(on) => self.apply(|style| style.italic = on),
            TextEvent::Underline(on) => self.apply(|style| style.underline = on),
            TextEvent::Bold(on) => self.apply(|style| style.bold = on),
            TextEvent::LineBreak => {
                // Consecutive breaks collapse to one.
                let at_break = self.buffer.ends_with('\n')
                    || (self.buffer.is_empty()
                        && self.runs.last().is_some_and(|run| run.text.ends_with('\n')));
                if !at_break {
                    self.buffer.push('\n');
                    self.flush();
                    self.style.color = None;
                }
            }
        }
    }

    /// Closes the last run and resolves the style/segments split.
    pub fn finish(mut self) -> SegmentedText {
        self.flush();

        // Merge neighbours that ended up with the same style (a control
        // code that did not actually change anything, or the post-newline
        // white reset on an already-white run).
        let mut runs: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs {
            match runs.last_mut() {
                Some(last) if last.style == run.style => last.text.push_str(&run.text),
                _ => runs.push(run),
            }
        }

        // Trim trailing line breaks.
        while let Some(last) = runs.last_mut() {
            while last.text.ends_with('\n') {
                last.text.pop();
            }
            if last.text.is_empty() {
                runs.pop();
            } else {
                break;
            }
        }

        let text: String = runs.iter().map(|run| run.text.as_str()).collect();
        let uniform = runs
            .windows(2)
            .all(|pair| pair[0].style == pair[1].style);

        let (style, segments) = match (&runs[..], uniform) {
            ([], _) => (None, None),
            (all, true) if all[0].style.is_default() => (None, None),
            (all, true) => (Some(all[0].style), None),
            (all, false) => {
                let segments = all
                    .iter()
                    .map(|run| Segment {
                        text: run.text.clone(),
                        style: (!run.style.is_default()).then_some(run.style),
                    })
                    .collect();
                (None, Some(segments))
            }
        };

        SegmentedText {
            text,
            style,
            segments,
        }
    }

    fn apply(&mut self, change: impl FnOnce(&mut Style)) {
        let mut updated = self.style;
        change(&mut updated);
        if updated != self.style {
            self.flush();
            self.style = updated;
        }
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.runs.push(Run {
                text: std::mem::take(&mut self.buffer),
                style: self.style,
            });
        }
    }
}
