// src/content/mod.rs
// =============================================================================
// Everything that happens to a document between "bytes arrived" and "text
// goes into the page".
//
// Submodules:
// - encoding: bytes -> valid, BOM-free UTF-8 text
// - links: relative README links -> absolute URLs
// - render: Markdown -> HTML (wiki pages only)
//
// All three are pure functions with no I/O.
// =============================================================================

mod encoding;
mod links;
mod render;

pub use encoding::normalize;
pub use links::{rewrite, RewriteContext};
pub use render::markdown_to_html;
