//! Whitespace collapsing, truncation and indentation of converted text

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_LENGTH: usize = 200;
pub const DEFAULT_INDENT: &str = "  ";
pub const ELLIPSIS: &str = "...";

/// Options for [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Maximum number of characters kept before the ellipsis.
    pub max_length: usize,
    /// Prefix applied to every output line, after truncation.
    pub indent: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            indent: DEFAULT_INDENT.to_string(),
        }
    }
}

/// Flatten paragraph breaks, cap the length and indent every line.
///
/// Steps run in this order:
/// 1. runs of two or more newlines become one newline
/// 2. text longer than `max_length` characters is cut at exactly
///    `max_length` characters and `...` is appended
/// 3. every line, empty ones included, is prefixed with `indent`
///
/// Lengths count `char`s, so a cut never splits a UTF-8 sequence.
pub fn normalize(text: &str, options: &NormalizeOptions) -> String {
    let flattened = collapse_newlines(text, 1);
    let truncated = truncate(&flattened, options.max_length);
    indent_lines(&truncated, &options.indent)
}

/// Replace every run of more than `max_run` consecutive newlines with exactly
/// `max_run` newlines.
pub fn collapse_newlines(text: &str, max_run: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0;

    for c in text.chars() {
        if c == '\n' {
            run += 1;
            if run > max_run {
                continue;
            }
        } else {
            run = 0;
        }
        out.push(c);
    }

    out
}

/// Hard cut at `max_length` characters with an ellipsis marker.
pub fn truncate(text: &str, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

pub fn indent_lines(text: &str, indent: &str) -> String {
    text.split('\n')
        .map(|line| format!("{}{}", indent, line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("a\n\n\n\nb", 2, "a\n\nb")]
    #[case("a\n\nb\nc", 2, "a\n\nb\nc")]
    #[case("a\n\n\nb\n\nc", 1, "a\nb\nc")]
    #[case("\n\n\n", 2, "\n\n")]
    #[case("no breaks", 1, "no breaks")]
    fn test_collapse_newlines(#[case] input: &str, #[case] max_run: usize, #[case] expected: &str) {
        assert_eq!(collapse_newlines(input, max_run), expected);
    }

    #[test]
    fn test_truncate_is_a_hard_cut() {
        assert_eq!(truncate("hello world", 7), "hello w...");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("", 0), "");
        assert_eq!(truncate("x", 0), "...");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "가나다라마바사";
        assert_eq!(truncate(text, 3), "가나다...");
    }

    #[test]
    fn test_normalize_long_input() {
        let input = "x".repeat(250);
        let output = normalize(&input, &NormalizeOptions::default());

        assert!(output.starts_with("  "));
        let core = output.strip_prefix("  ").unwrap();
        assert_eq!(core.chars().count(), 203);
        assert!(core.ends_with("..."));
    }

    #[test]
    fn test_normalize_flattens_and_indents() {
        let output = normalize("first\n\nsecond\n\n\nthird", &NormalizeOptions::default());
        assert_eq!(output, "  first\n  second\n  third");
    }

    #[test]
    fn test_normalize_indents_empty_lines() {
        let options = NormalizeOptions {
            max_length: 200,
            indent: "> ".to_string(),
        };
        assert_eq!(normalize("", &options), "> ");
        assert_eq!(normalize("a\n", &options), "> a\n> ");

        for line in normalize("\na\n\n\nb\n", &options).split('\n') {
            assert!(line.starts_with("> "), "unindented line: {:?}", line);
        }
    }

    #[test]
    fn test_indent_is_not_counted_against_budget() {
        let options = NormalizeOptions {
            max_length: 10,
            indent: "    ".to_string(),
        };
        let output = normalize("0123456789abcdef", &options);
        assert_eq!(output, "    0123456789...");
    }
}
