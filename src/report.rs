//! Copy outcome handed back to the caller
//!
//! The flow is linear: extraction completes before the clipboard is touched,
//! and the clipboard write completes before a report exists. Nothing here
//! returns an error; every outcome is a [`CopyReport`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clipboard::ClipboardWriter;
use crate::error::ExtractError;
use crate::extractors::{Extractor, Page, PageKind};

/// Result record for user notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Debug rendering of the error, for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CopyReport {
    pub fn success(markdown: String) -> Self {
        Self {
            success: true,
            markdown: Some(markdown),
            error: None,
            details: None,
        }
    }

    pub fn failure(err: &ExtractError) -> Self {
        Self {
            success: false,
            markdown: None,
            error: Some(err.to_string()),
            details: Some(format!("{:?}", err)),
        }
    }

    /// The report was assembled but could not be delivered.
    pub fn undelivered(markdown: String) -> Self {
        let err = ExtractError::ClipboardWriteFailed;
        Self {
            markdown: Some(markdown),
            ..Self::failure(&err)
        }
    }
}

/// Extract `page` and deliver the report to the clipboard.
///
/// The writer is never invoked when extraction fails.
pub fn copy_page(
    extractor: &Extractor,
    page: &Page,
    pinned: Option<PageKind>,
    writer: &ClipboardWriter,
) -> CopyReport {
    let extraction = match extractor.extract(page, pinned) {
        Ok(extraction) => extraction,
        Err(err) => {
            warn!(error = %err, "extraction failed");
            return CopyReport::failure(&err);
        }
    };

    if writer.write(&extraction.markdown) {
        debug!(identifier = %extraction.identifier, "report copied");
        CopyReport::success(extraction.markdown)
    } else {
        warn!(identifier = %extraction.identifier, "report extracted but not copied");
        CopyReport::undelivered(extraction.markdown)
    }
}

/// Extract `page` without touching the clipboard.
pub fn extract_report(extractor: &Extractor, page: &Page, pinned: Option<PageKind>) -> CopyReport {
    match extractor.extract(page, pinned) {
        Ok(extraction) => CopyReport::success(extraction.markdown),
        Err(err) => CopyReport::failure(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::Field;

    #[test]
    fn test_failure_report_serialization() {
        let err = ExtractError::ElementNotFound {
            field: Field::Body,
            selector: ".description__e030".to_string(),
        };
        let report = CopyReport::failure(&err);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(
            json["error"],
            "Element not found for body (selector: .description__e030)"
        );
        assert!(json["details"].as_str().unwrap().contains("ElementNotFound"));
        assert!(json.get("markdown").is_none());
    }

    #[test]
    fn test_undelivered_keeps_markdown() {
        let report = CopyReport::undelivered("text".to_string());
        assert!(!report.success);
        assert_eq!(report.markdown.as_deref(), Some("text"));
        assert_eq!(report.error.as_deref(), Some("Clipboard write failed"));
    }

    #[test]
    fn test_success_report_serialization() {
        let json = serde_json::to_string(&CopyReport::success("md".to_string())).unwrap();
        assert_eq!(json, r#"{"success":true,"markdown":"md"}"#);
    }
}
