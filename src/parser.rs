//! HTML5 document loading using html5ever
//!
//! Parsing is tolerant by design: unclosed tags, stray attributes and
//! misnested markup all produce a usable tree, because html5ever implements
//! the WHATWG recovery algorithm browsers use. The only loader failure is a
//! byte stream that cannot be decoded as text for its detected charset.
//!
//! # Examples
//!
//! ```rust
//! use wikitrans::parser::parse_html;
//!
//! // Malformed markup still yields a tree
//! let dom = parse_html(b"<html><body><h1>Hello").expect("tolerant parse");
//! let _ = dom;
//! ```

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;
use std::borrow::Cow;

use crate::charset::detect_charset;
use crate::error::ConversionError;

/// Parse HTML bytes into a DOM tree, honoring an optional `Content-Type`
///
/// The charset cascade (header parameter, meta declaration, UTF-8 default)
/// decides how the bytes are decoded; non-UTF-8 input is transcoded before
/// html5ever sees it.
///
/// # Errors
///
/// Returns [`ConversionError::Encoding`] when the bytes are invalid for the
/// detected charset or the charset itself is unknown. Merely malformed HTML
/// is not an error.
pub fn parse_html_with_charset(
    html: &[u8],
    content_type: Option<&str>,
) -> Result<RcDom, ConversionError> {
    let charset = detect_charset(content_type, html);
    let text = decode_to_utf8(html, &charset)?;

    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut text.as_bytes())?;

    Ok(dom)
}

/// Parse HTML bytes into a DOM tree
///
/// Convenience wrapper over [`parse_html_with_charset`] for callers without
/// transport metadata (stdin, tests).
pub fn parse_html(html: &[u8]) -> Result<RcDom, ConversionError> {
    parse_html_with_charset(html, None)
}

fn decode_to_utf8<'a>(html: &'a [u8], charset: &str) -> Result<Cow<'a, str>, ConversionError> {
    if charset.eq_ignore_ascii_case("UTF-8") {
        return std::str::from_utf8(html).map(Cow::Borrowed).map_err(|e| {
            ConversionError::Encoding(format!(
                "invalid UTF-8 at byte position {}: {}",
                e.valid_up_to(),
                e
            ))
        });
    }

    let encoding = encoding_rs::Encoding::for_label(charset.as_bytes()).ok_or_else(|| {
        ConversionError::Encoding(format!("unsupported charset '{}'", charset))
    })?;

    encoding
        .decode_without_bom_handling_and_without_replacement(html)
        .ok_or_else(|| {
            ConversionError::Encoding(format!("invalid byte sequence for charset '{}'", charset))
        })
}
