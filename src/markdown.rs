//! Markdown to HTML conversion for release notes.

use comrak::{Options, markdown_to_html};

/// Converts Markdown into HTML that is safe to embed in a page.
#[cfg_attr(test, mockall::automock)]
pub trait MarkdownRenderer: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}

/// GitHub-flavoured Markdown via comrak.
///
/// Raw HTML in the input is not passed through, and neither are
/// `javascript:` style link targets.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComrakMarkdown;

impl MarkdownRenderer for ComrakMarkdown {
    fn to_html(&self, markdown: &str) -> String {
        let mut options = Options::default();
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        markdown_to_html(markdown, &options)
    }
}
