//! # subtext-stl
//!
//! EBU Tech 3264-E (STL) subtitle data exchange files: a lenient reader
//! producing structured, styled captions, a writer used by the teletext
//! extraction path, and the pipeline tying the teletext decoder to it.
//!
//! ## Reading
//!
//! ```no_run
//! use subtext_stl::{ReadOptions, StlReader};
//!
//! let raw: Vec<u8> = std::fs::read("subtitles.stl").unwrap();
//! let document = StlReader::new().read(&raw).unwrap();
//! for caption in &document.captions {
//!     println!("{} -> {}: {}", caption.start_timecode, caption.end_timecode, caption.text);
//! }
//! for diagnostic in &document.diagnostics {
//!     eprintln!("warning: {}", diagnostic.message);
//! }
//! ```
//!
//! The reader never aborts on mid-stream corruption: it reads to the end of
//! the input and surfaces what it could parse, reporting continuation
//! protocol violations through the diagnostic channel. Fatal errors are
//! limited to a missing GSI block and an unrecognized disk format code
//! without an `fps_override`.
//!
//! ## Extraction
//!
//! ```no_run
//! use subtext_stl::Extractor;
//!
//! let capture: Vec<u8> = std::fs::read("ancillary.bin").unwrap();
//! let stl = Extractor::new().with_title("Evening News").extract(&capture);
//! std::fs::write("subtitles.stl", stl).unwrap();
//! ```

pub mod error;
pub mod extract;
pub mod gsi;
pub mod reader;
pub mod text;
pub mod tti;
pub mod writer;

pub use error::{Result, StlError};
pub use extract::Extractor;
pub use gsi::{Gsi, GSI_LEN};
pub use reader::{
    Diagnostic, DiagnosticCategory, ReadOptions, StlDocument, StlReader, WarningMode,
};
pub use tti::{Tti, EBN_LAST, TEXT_FIELD_LEN, TTI_LEN};
pub use writer::StlWriter;
