//! Inline text runs and their Markdown rendering.

use serde::{Deserialize, Serialize};

/// Inline styling of a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

/// One styled run of text, optionally linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextRun {
    pub plain_text: String,
    pub href: Option<String>,
    pub annotations: Annotations,
}

impl RichTextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            href: None,
            annotations: Annotations::default(),
        }
    }

    /// Renders this run as Markdown.
    pub fn to_markdown(&self) -> String {
        if self.plain_text.is_empty() {
            return String::new();
        }

        // Markdown emphasis cannot wrap surrounding whitespace, so style the
        // core and put the whitespace back outside the markers.
        let text = self.plain_text.as_str();
        let core = text.trim();
        if core.is_empty() {
            return text.to_string();
        }
        let leading = &text[..text.len() - text.trim_start().len()];
        let trailing = &text[text.trim_end().len()..];

        let a = &self.annotations;
        let mut result = core.to_string();
        if a.code {
            result = format!("`{}`", result);
        }
        if a.strikethrough {
            result = format!("~~{}~~", result);
        }
        if a.bold {
            result = format!("**{}**", result);
        }
        if a.italic {
            result = format!("*{}*", result);
        }
        if a.underline {
            result = format!("<u>{}</u>", result);
        }
        if let Some(href) = &self.href {
            result = format!("[{}]({})", result, href);
        }

        format!("{}{}{}", leading, result, trailing)
    }
}

/// A sequence of runs, as Notion stores paragraph text, captions and titles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText(pub Vec<RichTextRun>);

impl RichText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self(vec![RichTextRun::plain(text)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|run| run.plain_text.is_empty())
    }

    /// Concatenated text without styling.
    pub fn plain_text(&self) -> String {
        self.0.iter().map(|run| run.plain_text.as_str()).collect()
    }

    pub fn to_markdown(&self) -> String {
        self.0.iter().map(RichTextRun::to_markdown).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(text: &str, annotations: Annotations) -> RichTextRun {
        RichTextRun {
            plain_text: text.to_string(),
            href: None,
            annotations,
        }
    }

    #[test]
    fn test_styles_are_applied() {
        let bold = Annotations {
            bold: true,
            ..Default::default()
        };
        let code_italic = Annotations {
            code: true,
            italic: true,
            ..Default::default()
        };
        assert_eq!(styled("hi", bold).to_markdown(), "**hi**");
        assert_eq!(styled("x", code_italic).to_markdown(), "*`x`*");
    }

    #[test]
    fn test_whitespace_stays_outside_markers() {
        let bold = Annotations {
            bold: true,
            ..Default::default()
        };
        assert_eq!(styled(" word ", bold).to_markdown(), " **word** ");
        assert_eq!(styled("   ", bold).to_markdown(), "   ");
    }

    #[test]
    fn test_links_and_plain_text() {
        let text = RichText(vec![
            RichTextRun::plain("See "),
            RichTextRun {
                plain_text: "docs".to_string(),
                href: Some("https://example.com".to_string()),
                annotations: Annotations::default(),
            },
        ]);
        assert_eq!(text.to_markdown(), "See [docs](https://example.com)");
        assert_eq!(text.plain_text(), "See docs");
        assert!(!text.is_empty());
        assert!(RichText::default().is_empty());
    }
}
