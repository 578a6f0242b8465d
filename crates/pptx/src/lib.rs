//! PPTX (Office Open XML) writer and inspector for generated slide decks.
//!
//! A .pptx file is a ZIP archive of XML parts; [`PptxDocument`] builds one
//! from text boxes and PNG pictures, and [`PptxInspector`] reads one back.

pub mod document;
pub mod inspect;
mod package;

pub use document::{inches, Frame, Paragraph, PptxDocument, SlidePage, EMU_PER_INCH};
pub use inspect::{DeckSummary, PptxInspector, SlideSummary};
pub use package::{DEFAULT_FILE_NAME, PPTX_CONTENT_TYPE};
