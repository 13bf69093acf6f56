//! Fixed report template

pub const SEPARATOR_GLYPH: char = '━';
pub const SEPARATOR_WIDTH: usize = 20;
pub const LINK_LABEL: &str = "▶ Link";
pub const CONTENT_LABEL: &str = "▶ Content";

/// Values substituted into the template. `content` is already normalized.
#[derive(Debug, Clone, Copy)]
pub struct ReportFields<'a> {
    pub project: &'a str,
    pub identifier: &'a str,
    pub title: &'a str,
    pub link: &'a str,
    pub content: &'a str,
}

pub fn separator() -> String {
    std::iter::repeat(SEPARATOR_GLYPH).take(SEPARATOR_WIDTH).collect()
}

pub fn render(fields: &ReportFields<'_>) -> String {
    let separator = separator();
    format!(
        "{sep}\n[{project}/{id}] {title}\n{sep}\n{link_label}\n  {link}\n{content_label}\n{content}\n{sep}",
        sep = separator,
        project = fields.project,
        id = fields.identifier,
        title = fields.title,
        link_label = LINK_LABEL,
        link = fields.link,
        content_label = CONTENT_LABEL,
        content = fields.content,
    )
}
