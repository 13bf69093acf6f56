//! Content extraction from tracker pages
//!
//! Resolves the required fields of an issue or knowledge-base article, runs
//! the body through conversion and normalization and fills the report
//! template. Any missing field aborts the whole extraction.

mod page;
mod selector;
mod template;

pub use page::*;
pub use selector::*;
pub use template::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::convert::{ConversionRules, Converter};
use crate::dom::DocumentNode;
use crate::error::{ExtractError, Result};
use crate::normalize::{normalize, NormalizeOptions};

/// Selectors for the four required fields of one page kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelectors {
    pub project: SelectorSpec,
    pub identifier: SelectorSpec,
    pub title: SelectorSpec,
    pub body: SelectorSpec,
}

impl FieldSelectors {
    pub fn issue_defaults() -> Self {
        Self {
            project: SelectorSpec::with_fallback(
                r#".fieldValue__e480[data-test="ring-tooltip field-value"]"#,
                ".fieldValueButton__a700",
            ),
            identifier: SelectorSpec::with_fallback(
                ".idLink__ee62 .ring-ui-link_c238",
                r#"[data-test="ring-link"]"#,
            ),
            title: SelectorSpec::new(r#"[data-test="ticket-summary"]"#),
            body: SelectorSpec::new(".description__e030"),
        }
    }

    pub fn knowledge_base_defaults() -> Self {
        Self {
            project: SelectorSpec::new(".breadCrumb__c48e.nonShrinkable__cca0"),
            identifier: SelectorSpec::new(".idLink__ee62 .articleId__ca09"),
            title: SelectorSpec::new(".header__efad h1"),
            body: SelectorSpec::new(".articleContent__cdf9"),
        }
    }

    pub fn get(&self, field: Field) -> &SelectorSpec {
        match field {
            Field::Project => &self.project,
            Field::Identifier => &self.identifier,
            Field::Title => &self.title,
            Field::Body => &self.body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSelectors {
    pub issue: FieldSelectors,
    pub knowledge_base: FieldSelectors,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            issue: FieldSelectors::issue_defaults(),
            knowledge_base: FieldSelectors::knowledge_base_defaults(),
        }
    }
}

impl PageSelectors {
    pub fn for_kind(&self, kind: PageKind) -> &FieldSelectors {
        match kind {
            PageKind::Issue => &self.issue,
            PageKind::KnowledgeBase => &self.knowledge_base,
        }
    }
}

/// A completed extraction. `markdown` is the assembled report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub kind: PageKind,
    pub project: String,
    pub identifier: String,
    pub title: String,
    pub link: String,
    pub content: String,
    pub markdown: String,
}

/// Builds reports from pages.
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: PageSelectors,
    converter: Converter,
    normalize: NormalizeOptions,
}

impl Extractor {
    pub fn new(selectors: PageSelectors, rules: &ConversionRules, normalize: NormalizeOptions) -> Self {
        Self {
            selectors,
            converter: Converter::new(rules),
            normalize,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.selectors.clone(),
            &config.conversion,
            config.normalize.clone(),
        )
    }

    /// Extract a report from `page`.
    ///
    /// A `pinned` kind is used as given; otherwise the kind is classified
    /// from the page location and an unknown location is an
    /// [`ExtractError::UnsupportedPage`].
    pub fn extract(&self, page: &Page, pinned: Option<PageKind>) -> Result<Extraction> {
        let kind = match pinned {
            Some(kind) => kind,
            None => page.kind().ok_or_else(|| ExtractError::UnsupportedPage {
                location: page.location().to_string(),
            })?,
        };
        debug!(%kind, location = %page.location(), "extracting page");

        let selectors = self.selectors.for_kind(kind);
        let document = page.document();

        let project = resolve_text(document, Field::Project, &selectors.project)?;
        let identifier = resolve_text(document, Field::Identifier, &selectors.identifier)?;
        let title = resolve_text(document, Field::Title, &selectors.title)?;

        let link = match kind {
            PageKind::Issue => format!("{}/issue/{}", page.origin(), identifier),
            PageKind::KnowledgeBase => page.location().to_string(),
        };

        let body = resolve(document, Field::Body, &selectors.body)?;
        let formatted = self.converter.convert(&DocumentNode::from_element(body));
        let content = normalize(&formatted, &self.normalize);

        let markdown = render(&ReportFields {
            project: &project,
            identifier: &identifier,
            title: &title,
            link: &link,
            content: &content,
        });

        Ok(Extraction {
            kind,
            project,
            identifier,
            title,
            link,
            content,
            markdown,
        })
    }

    /// Convert and normalize a standalone HTML fragment.
    pub fn convert_fragment(&self, html: &str) -> String {
        let formatted = self.converter.convert(&DocumentNode::from_fragment(html));
        normalize(&formatted, &self.normalize)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(
            PageSelectors::default(),
            &ConversionRules::default(),
            NormalizeOptions::default(),
        )
    }
}
