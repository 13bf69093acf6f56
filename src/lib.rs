//! Issue and article reports for the clipboard
//!
//! Turns a rendered tracker page into a short plain-text report:
//! - field lookup with primary/fallback CSS selectors
//! - HTML body to Markdown-like text (blocks, list items, bold, italic)
//! - newline flattening, length cap and indentation
//! - clipboard delivery through an ordered strategy chain
//!
//! ```text
//! Page → Extractor (selectors) → DocumentNode copy → Converter → normalize
//!      → template → ClipboardWriter → CopyReport
//! ```

pub mod clipboard;
pub mod config;
pub mod convert;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod ffi;
pub mod normalize;
pub mod report;

pub use self::clipboard::{ClipboardStrategy, ClipboardWriter};
pub use config::Config;
pub use convert::{convert, Converter};
pub use dom::DocumentNode;
pub use error::{ExtractError, Result};
pub use extractors::{Extraction, Extractor, Page, PageKind};
pub use normalize::{normalize, NormalizeOptions};
pub use report::{copy_page, CopyReport};
