//! Error types for extraction
//!
//! One flat enum for everything that can abort a copy. Conversion itself never
//! fails: unknown markup is passed through, so there is no variant for it.

use thiserror::Error;

use crate::extractors::Field;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Element not found for {field} (selector: {selector})")]
    ElementNotFound { field: Field, selector: String },

    #[error("Unsupported page: {location}")]
    UnsupportedPage { location: String },

    #[error("Clipboard write failed")]
    ClipboardWriteFailed,

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid page location '{location}': {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
