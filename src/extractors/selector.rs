//! CSS selector lookup with a fallback
//!
//! Uses the scraper crate to select elements by CSS selectors. A field is
//! looked up with its primary selector first; the fallback is only consulted
//! when the primary matches nothing.

use std::fmt;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExtractError, Result};

/// A required field of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Project,
    Identifier,
    Title,
    Body,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Project => "project",
            Field::Identifier => "identifier",
            Field::Title => "title",
            Field::Body => "body",
        })
    }
}

/// Primary selector plus an optional looser alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSpec {
    pub primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl SelectorSpec {
    pub fn new(primary: &str) -> Self {
        Self {
            primary: primary.to_string(),
            fallback: None,
        }
    }

    pub fn with_fallback(primary: &str, fallback: &str) -> Self {
        Self {
            primary: primary.to_string(),
            fallback: Some(fallback.to_string()),
        }
    }
}

pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// First element matching `selector`, in document order.
pub fn select_first<'a>(document: &'a Html, selector: &str) -> Result<Option<ElementRef<'a>>> {
    let selector = parse_selector(selector)?;
    Ok(document.select(&selector).next())
}

/// Resolve exactly one element for `field`, or fail the lookup.
pub fn resolve<'a>(document: &'a Html, field: Field, spec: &SelectorSpec) -> Result<ElementRef<'a>> {
    if let Some(element) = select_first(document, &spec.primary)? {
        debug!(%field, selector = %spec.primary, "resolved with primary selector");
        return Ok(element);
    }

    if let Some(fallback) = &spec.fallback {
        if let Some(element) = select_first(document, fallback)? {
            debug!(%field, selector = %fallback, "resolved with fallback selector");
            return Ok(element);
        }
    }

    Err(ExtractError::ElementNotFound {
        field,
        selector: spec.primary.clone(),
    })
}

/// Trimmed text content of the element resolved for `field`.
pub fn resolve_text(document: &Html, field: Field, spec: &SelectorSpec) -> Result<String> {
    resolve(document, field, spec).map(element_text)
}

pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
