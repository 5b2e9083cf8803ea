//! Markdown preview rendering.

use pulldown_cmark::{html as md_html, Options, Parser};

/// Converts a CommonMark markdown string to an HTML string.
///
/// Enables the GFM extensions the editor advertises: strikethrough, tables
/// and task lists. Inline HTML is passed through untouched; sanitising the
/// result is the embedding view's job.
pub fn render_markdown_to_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(text, options);
    let mut html_output = String::with_capacity(text.len() * 3 / 2);
    md_html::push_html(&mut html_output, parser);
    html_output
}
