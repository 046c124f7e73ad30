// src/content/encoding.rs
// =============================================================================
// Turns the raw bytes we got from GitHub into text we can safely work with.
//
// GitHub hands us bytes (base64-decoded README payloads, raw wiki bodies).
// Most of the time they are valid UTF-8, but repositories contain all sorts
// of things: Latin-1 READMEs, truncated multi-byte characters, files saved
// with a byte-order mark. None of that is allowed to break a site build, so
// normalization never fails. Bad sequences become U+FFFD instead.
// =============================================================================

use std::borrow::Cow;
use tracing::warn;

const BOM: char = '\u{feff}';

// Converts raw bytes into valid, BOM-free UTF-8 text.
//
// Valid input is taken as-is (no copy beyond the final String). Invalid input
// is repaired with U+FFFD replacement characters and a warning is logged.
pub fn normalize(raw: &[u8]) -> String {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => Cow::Borrowed(text),
        Err(e) => {
            warn!(
                valid_up_to = e.valid_up_to(),
                "document is not valid UTF-8, replacing invalid sequences"
            );
            String::from_utf8_lossy(raw)
        }
    };

    text.strip_prefix(BOM).unwrap_or(&text).to_string()
}
