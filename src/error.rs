//! Error types for article conversion

use std::fmt;

/// Errors that can occur while converting an article to Markdown
///
/// Structural oddities of the document (missing title heading, missing
/// content container) are deliberately *not* errors: the pipeline degrades
/// to a best-effort result for those. Only undecodable input, I/O failures
/// on the source stream and rewrite-rule failures abort a conversion.
#[derive(Debug)]
pub enum ConversionError {
    /// Reading the source byte stream failed
    Io(std::io::Error),
    /// The byte stream could not be decoded as text at all
    Encoding(String),
    /// A rewrite rule could not produce output for a node
    RuleFailure(String),
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::Io(err) => write!(f, "failed to read input: {}", err),
            ConversionError::Encoding(msg) => write!(f, "encoding error: {}", msg),
            ConversionError::RuleFailure(msg) => write!(f, "rule application failed: {}", msg),
        }
    }
}

impl std::error::Error for ConversionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConversionError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_encoding() {
        let err = ConversionError::Encoding("invalid UTF-8 at byte 3".to_string());
        assert_eq!(err.to_string(), "encoding error: invalid UTF-8 at byte 3");
    }

    #[test]
    fn test_display_rule_failure() {
        let err = ConversionError::RuleFailure("anchor without usable content".to_string());
        assert!(err.to_string().starts_with("rule application failed:"));
    }

    #[test]
    fn test_io_source_is_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stream closed");
        let err = ConversionError::from(io);
        assert!(std::error::Error::source(&err).is_some());
    }
}
