//! Error types for slide deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a JSON outline into a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The input is not well-formed JSON.
    #[error("Invalid JSON: check the document syntax (e.g. unclosed brackets): {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON is well-formed but is not a list of slides.
    #[error("Invalid deck: {0}")]
    InvalidDeck(String),

    /// A slide could not be rendered.
    #[error("Rendering error: {0}")]
    RenderError(String),

    /// A chart figure could not be rasterized.
    #[error("Raster error: {0}")]
    RasterError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}

impl Error {
    /// Whether this error means the input document itself could not be parsed.
    ///
    /// Front ends use this to tell the user to fix their JSON rather than
    /// reporting an internal failure.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::InvalidJson(_))
    }
}
