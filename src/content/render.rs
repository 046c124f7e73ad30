// src/content/render.rs
// =============================================================================
// Markdown -> HTML for wiki pages.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Ships an HTML writer for those events (pulldown_cmark::html)
//
// Wiki pages on GitHub are written with GitHub's extensions in mind, so we
// switch on tables, strikethrough and task lists.
// =============================================================================

use pulldown_cmark::{html, Options, Parser};

// Renders Markdown text into an HTML fragment.
//
// Example input:
//   "# Home\n\nWelcome to the [wiki](https://example.com)!"
//
// Example output:
//   "<h1>Home</h1>\n<p>Welcome to the <a href=\"https://example.com\">wiki</a>!</p>\n"
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);

    // HTML is usually a bit longer than its Markdown source
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_link() {
        let out = markdown_to_html("# Home\n\nWelcome to the [wiki](https://example.com)!");
        assert!(out.contains("<h1>Home</h1>"));
        assert!(out.contains(r#"<a href="https://example.com">wiki</a>"#));
    }

    #[test]
    fn test_tables_enabled() {
        let out = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(out.contains("<table>"));
    }

    #[test]
    fn test_strikethrough_enabled() {
        let out = markdown_to_html("~~old~~");
        assert!(out.contains("<del>old</del>"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(markdown_to_html(""), "");
    }
}
