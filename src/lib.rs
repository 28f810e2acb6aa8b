//! wikitrans - Wikipedia article to Markdown conversion and translation
//!
//! Converts the readable body of a Wikipedia article into clean Markdown and
//! optionally translates it through the DeepL API.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `parser`: tolerant HTML5 parsing using html5ever
//! - `charset`: character encoding detection for fetched pages
//! - `article`: the rule-driven DOM-to-Markdown transducer
//! - `rules`: tag-keyed rewrite rules applied during rendering
//! - `source`: article retrieval from a URL or stdin
//! - `deepl`: DeepL translation API client
//!
//! # Example
//!
//! ```rust
//! use wikitrans::ArticleParser;
//!
//! let html = "<h1 id=\"firstHeading\">Hearth</h1>\
//!             <div class=\"mw-parser-output\"><p>A hearth is a fireplace.</p></div>";
//! let markdown = ArticleParser::new()
//!     .parse(html.as_bytes())
//!     .expect("conversion should succeed");
//! assert_eq!(markdown, "# Hearth\n\nA hearth is a fireplace.\n\n");
//! ```

pub mod article;
pub mod charset;
pub mod deepl;
pub mod error;
pub mod parser;
pub mod rules;
pub mod source;

// Re-export main types for convenience
pub use article::ArticleParser;
pub use deepl::DeeplClient;
pub use error::ConversionError;
pub use parser::parse_html;
pub use source::ArticleSource;
