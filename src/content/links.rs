// src/content/links.rs
// =============================================================================
// Rewrites relative links in README Markdown so they still work once the
// text is embedded in some other site.
//
// Inside GitHub, `![logo](./docs/logo.png)` resolves against the repository.
// On our generated page it would resolve against *our* site and break. So:
//
//   ![alt](./img.png)   ->  ![alt](<base>/img.png)
//   [doc](guide.md)     ->  doc (see the owner/repo repository on GitHub)
//   [x](notes.txt)      ->  unchanged
//   [x](https://...)    ->  unchanged
//   [x](/abs), [x](#a)  ->  unchanged
//
// Links to other .md files are neutralized rather than rewritten: they only
// make sense inside GitHub's own renderer.
//
// We deliberately do not use pulldown-cmark here. Its events tell us *what*
// the links are but rewriting needs the exact source text around them. A
// single regex pass over bracket syntax keeps everything else byte-for-byte.
// =============================================================================

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// One pattern for both images and links so matching is a single
// left-to-right pass with no overlaps:
//   group 1: "!" for images, "" for links
//   group 2: the alt / link text (no nested brackets)
//   group 3: the target inside the parentheses
static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(!?)\[([^\[\]\n]*)\]\(([^)\n]*)\)").expect("link pattern is valid")
});

/// Everything the rewriter needs to know about where a document lives.
#[derive(Debug, Clone)]
pub struct RewriteContext {
    /// Directory URL the README was served from (no trailing slash needed)
    pub base_url: String,
    pub owner: String,
    pub repo: String,
    /// Forge web host used when pointing readers at the repository page
    pub web_base: String,
}

impl RewriteContext {
    pub fn new(base_url: &str, owner: &str, repo: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            web_base: "https://github.com".to_string(),
        }
    }

    pub fn with_web_base(mut self, web_base: &str) -> Self {
        self.web_base = web_base.trim_end_matches('/').to_string();
        self
    }

    fn repo_url(&self) -> String {
        format!("{}/{}/{}", self.web_base, self.owner, self.repo)
    }
}

// Rewrites relative image and document links in `text`.
//
// Pure function: no I/O, same input always gives the same output, and the
// replacement text is never scanned again.
pub fn rewrite(text: &str, ctx: &RewriteContext) -> String {
    MARKDOWN_LINK
        .replace_all(text, |caps: &Captures| {
            let is_image = !caps[1].is_empty();
            let label = &caps[2];
            let target = &caps[3];

            if is_image {
                rewrite_image(label, target, ctx)
            } else {
                rewrite_link(label, target, ctx)
                    .unwrap_or_else(|| caps[0].to_string())
            }
        })
        .into_owned()
}

fn rewrite_image(alt: &str, path: &str, ctx: &RewriteContext) -> String {
    if path.is_empty() || path.starts_with("http") || path.starts_with('/') {
        return format!("![{}]({})", alt, path);
    }

    let path = path.strip_prefix("./").unwrap_or(path);
    format!("![{}]({}/{})", alt, ctx.base_url, path)
}

// Returns None when the link should be left exactly as written.
fn rewrite_link(text: &str, path: &str, ctx: &RewriteContext) -> Option<String> {
    if path.starts_with("http") || path.starts_with('/') || path.starts_with('#') {
        return None;
    }

    if !path.ends_with(".md") {
        return None;
    }

    Some(format!(
        "{} (see the [{}/{}]({}) repository on GitHub)",
        text,
        ctx.owner,
        ctx.repo,
        ctx.repo_url()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RewriteContext {
        RewriteContext::new("https://x/y", "octo", "demo")
    }

    #[test]
    fn test_relative_image_gets_base_url() {
        assert_eq!(
            rewrite("![a](./img.png)", &ctx()),
            "![a](https://x/y/img.png)"
        );
        assert_eq!(
            rewrite("![a](docs/img.png)", &ctx()),
            "![a](https://x/y/docs/img.png)"
        );
    }

    #[test]
    fn test_absolute_images_unchanged() {
        let text = "![a](https://cdn/img.png) ![b](/static/b.png)";
        assert_eq!(rewrite(text, &ctx()), text);
    }

    #[test]
    fn test_trailing_slash_on_base_is_ignored() {
        let ctx = RewriteContext::new("https://x/y/", "octo", "demo");
        assert_eq!(rewrite("![a](img.png)", &ctx), "![a](https://x/y/img.png)");
    }

    #[test]
    fn test_md_link_points_to_repository() {
        let out = rewrite("Read [doc](other.md) first", &ctx());
        assert_eq!(
            out,
            "Read doc (see the [octo/demo](https://github.com/octo/demo) repository on GitHub) first"
        );
        assert!(!out.contains("other.md"));
    }

    #[test]
    fn test_md_link_uses_custom_web_base() {
        let ctx = ctx().with_web_base("https://git.example.com/");
        let out = rewrite("[doc](./docs/setup.md)", &ctx);
        assert!(out.contains("(https://git.example.com/octo/demo)"));
    }

    #[test]
    fn test_other_links_unchanged() {
        for text in [
            "[doc](other.txt)",
            "[doc](https://x/y)",
            "[doc](/abs/page.md)",
            "[top](#install)",
            "[mail](mailto:a@b.c)",
        ] {
            assert_eq!(rewrite(text, &ctx()), text);
        }
    }

    #[test]
    fn test_bare_urls_in_prose_untouched() {
        let text = "See docs/img.png or other.md or (other.md) for more";
        assert_eq!(rewrite(text, &ctx()), text);
    }

    #[test]
    fn test_multiple_matches_single_pass() {
        let text = "![one](a.png) and [two](b.md) and ![three](./c.png)";
        let out = rewrite(text, &ctx());
        assert_eq!(
            out,
            "![one](https://x/y/a.png) and two (see the [octo/demo](https://github.com/octo/demo) repository on GitHub) and ![three](https://x/y/c.png)"
        );
    }

    #[test]
    fn test_badge_inside_link_rewrites_image_only() {
        let text = "[![ci](badge.svg)](https://ci.example.com)";
        assert_eq!(
            rewrite(text, &ctx()),
            "[![ci](https://x/y/badge.svg)](https://ci.example.com)"
        );
    }

    #[test]
    fn test_deterministic() {
        let text = "![a](b.png) [c](d.md)";
        assert_eq!(rewrite(text, &ctx()), rewrite(text, &ctx()));
    }
}
