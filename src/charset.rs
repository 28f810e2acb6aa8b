//! Character encoding detection for article pages
//!
//! Wikipedia serves UTF-8, but the converter also accepts pages saved to disk
//! or piped through other tools, so the charset is resolved through a
//! three-level cascade before parsing:
//!
//! 1. `charset` parameter of the HTTP `Content-Type` header, when the caller
//!    has one (URL retrieval does, stdin does not)
//! 2. `<meta charset>` / `<meta http-equiv="Content-Type">` declarations in
//!    the first 1 KiB of the document
//! 3. UTF-8 as the default

use regex::Regex;
use std::sync::OnceLock;

/// Charset assumed when the cascade finds nothing
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Meta declarations must appear early; scanning stops after this many bytes
const META_SCAN_LIMIT: usize = 1024;

/// Resolve the character encoding of an article page
///
/// Always returns a charset name, falling back to [`DEFAULT_CHARSET`] when
/// neither the header nor the document declares one. Names are normalized to
/// uppercase.
///
/// # Examples
///
/// ```rust
/// use wikitrans::charset::detect_charset;
///
/// let html = b"<html><head><meta charset=\"iso-8859-1\"></head></html>";
/// assert_eq!(detect_charset(None, html), "ISO-8859-1");
/// assert_eq!(detect_charset(Some("text/html; charset=UTF-8"), html), "UTF-8");
/// assert_eq!(detect_charset(None, b"<html></html>"), "UTF-8");
/// ```
pub fn detect_charset(content_type: Option<&str>, html: &[u8]) -> String {
    if let Some(charset) = content_type.and_then(charset_from_content_type) {
        return charset.to_uppercase();
    }

    if let Some(charset) = charset_from_meta(html) {
        return charset.to_uppercase();
    }

    DEFAULT_CHARSET.to_string()
}

/// Pull the charset parameter out of a `Content-Type` header value
///
/// Accepts the usual parameter shapes: `charset=UTF-8`, `charset="UTF-8"`,
/// with or without whitespace around `=`, and ignores trailing parameters.
fn charset_from_content_type(content_type: &str) -> Option<String> {
    static PARAM: OnceLock<Option<Regex>> = OnceLock::new();
    let param = PARAM
        .get_or_init(|| Regex::new(r#"(?i)charset\s*=\s*"?([^";,\s]+)"?"#).ok())
        .as_ref()?;

    param
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Scan the document head for a meta charset declaration
///
/// Checks the HTML5 form first, then the HTML4 `http-equiv` form. Only the
/// first [`META_SCAN_LIMIT`] bytes are examined; the lossy UTF-8 view is
/// sufficient because charset names are ASCII.
fn charset_from_meta(html: &[u8]) -> Option<String> {
    let prefix = &html[..html.len().min(META_SCAN_LIMIT)];
    let head = String::from_utf8_lossy(prefix);

    static HTML5_META: OnceLock<Option<Regex>> = OnceLock::new();
    let html5 = HTML5_META
        .get_or_init(|| Regex::new(r#"(?i)<meta\s+charset\s*=\s*"?([^";>\s]+)"?"#).ok())
        .as_ref()?;
    if let Some(caps) = html5.captures(&head) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }

    static HTML4_META: OnceLock<Option<Regex>> = OnceLock::new();
    let html4 = HTML4_META
        .get_or_init(|| {
            Regex::new(
                r#"(?i)<meta\s+http-equiv\s*=\s*"?Content-Type"?\s+content\s*=\s*"?[^">]*charset\s*=\s*([^";>\s]+)"?"#,
            )
            .ok()
        })
        .as_ref()?;
    html4
        .captures(&head)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
