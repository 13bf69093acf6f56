//! Parsed pages and page-kind classification

use std::fmt;
use std::str::FromStr;

use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ExtractError, Result};

/// The two kinds of page a report can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Issue,
    KnowledgeBase,
}

impl PageKind {
    /// Classify a page from its location path.
    ///
    /// Issue pages: `/issue/<something>`, agile boards and issue lists.
    /// Knowledge base pages: `/articles/...`. Anything else is unknown.
    pub fn classify(location: &Url) -> Option<Self> {
        let path = location.path();

        let single_issue = path
            .find("/issue/")
            .is_some_and(|pos| path.len() > pos + "/issue/".len());

        if single_issue || path.contains("/agiles/") || path.contains("/issues/") {
            Some(PageKind::Issue)
        } else if path.contains("/articles/") {
            Some(PageKind::KnowledgeBase)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Issue => "issue",
            PageKind::KnowledgeBase => "knowledge_base",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "issue" => Ok(PageKind::Issue),
            "knowledge_base" | "knowledge-base" | "kb" | "article" => Ok(PageKind::KnowledgeBase),
            other => Err(format!("unknown page kind '{}'", other)),
        }
    }
}

/// A rendered document together with the location it was loaded from.
pub struct Page {
    document: Html,
    location: Url,
}

impl Page {
    pub fn parse(html: &str, location: &str) -> Result<Self> {
        let location = Url::parse(location).map_err(|source| ExtractError::InvalidLocation {
            location: location.to_string(),
            source,
        })?;
        Ok(Self::from_document(Html::parse_document(html), location))
    }

    pub fn from_document(document: Html, location: Url) -> Self {
        Self { document, location }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    /// `scheme://host[:port]` of the location.
    pub fn origin(&self) -> String {
        self.location.origin().ascii_serialization()
    }

    pub fn kind(&self) -> Option<PageKind> {
        PageKind::classify(&self.location)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("location", &self.location.as_str())
            .finish_non_exhaustive()
    }
}
