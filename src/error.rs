//! Error types for XFA extraction, repair, and parsing.
//!
//! The interpreter itself (classification, rendering, shim synthesis,
//! document assembly) is infallible by construction; errors can only
//! arise while locating and decoding the XFA packet inside the PDF
//! container or while parsing the repaired XML into an element tree.

use core::fmt;

/// Crate-wide error type.
///
/// Each variant names the pipeline phase it originated in and carries a
/// human-readable message with the relevant context already formatted in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XfaError {
    /// Failure while locating or decoding the XFA packet in the PDF.
    Extract(String),
    /// Failure while parsing the repaired XML into an element tree.
    Parse(String),
    /// A configured limit was exceeded (packet size, node count, depth).
    Limit(String),
    /// File I/O failure (CLI and path-based convenience entry points only).
    Io(String),
}

impl fmt::Display for XfaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XfaError::Extract(msg) => write!(f, "XFA extraction error: {}", msg),
            XfaError::Parse(msg) => write!(f, "XML parse error: {}", msg),
            XfaError::Limit(msg) => write!(f, "Limit exceeded: {}", msg),
            XfaError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for XfaError {}

impl From<std::io::Error> for XfaError {
    fn from(err: std::io::Error) -> Self {
        XfaError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_phase_and_message() {
        let err = XfaError::Extract("no XFA data found in the PDF".into());
        assert_eq!(
            err.to_string(),
            "XFA extraction error: no XFA data found in the PDF"
        );

        let err = XfaError::Parse("unexpected end of file at byte 42".into());
        assert!(err.to_string().starts_with("XML parse error:"));
    }
}
