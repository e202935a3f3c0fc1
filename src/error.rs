//! Error types for the pagelayer library.

use std::io;
use thiserror::Error;

/// Result type alias for pagelayer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while exporting a document.
///
/// Most failures inside the export core are contained (logged and replaced
/// by an empty placeholder). The variants that reach the caller come from
/// I/O, the document input, or the host collaborators (text shaper, drawing
/// surface).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document input could not be understood.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// A picture could not be decoded or encoded.
    #[error("Image error: {0}")]
    Image(String),

    /// The drawing surface could not be created or read back.
    #[error("Surface error: {0}")]
    Surface(String),

    /// The text shaper failed to lay out an object's text.
    #[error("Text shaping error: {0}")]
    TextShaping(String),

    /// A linked page could not be loaded.
    #[error("Linked page error: {0}")]
    LinkedPage(String),

    /// Error while producing markup.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::InvalidDocument(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Image("bad header".into());
        assert_eq!(err.to_string(), "Image error: bad header");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::InvalidDocument(_)));
    }
}
