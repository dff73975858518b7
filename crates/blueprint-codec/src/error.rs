//! Error types for blueprint decoding.

use thiserror::Error;

/// Errors raised while decoding a blueprint string.
///
/// Every failure mode of the pipeline maps to exactly one variant; the
/// engine never panics on malformed input. Per-entry anomalies inside an
/// otherwise well-formed document (an entity missing its position, say)
/// are salvaged by dropping the entry and do not surface here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The leading version marker is not one of the known markers
    /// (`None` when the input string is empty).
    #[error("unsupported version marker {found:?}")]
    UnsupportedVersion { found: Option<char> },

    /// The payload is not valid base64.
    #[error("payload is not valid base64: {0}")]
    InvalidEncoding(String),

    /// The zlib stream is truncated or corrupt.
    #[error("corrupt compressed stream: {0}")]
    CorruptStream(String),

    /// Inflating the payload exceeded the configured ceiling.
    #[error("decompressed payload exceeds {max} bytes")]
    DecompressedTooLarge { max: usize },

    /// The decompressed payload is not well-formed JSON.
    #[error("payload is not a well-formed document: {0}")]
    MalformedDocument(String),

    /// The document parses but is neither a blueprint nor a blueprint
    /// book.
    #[error("document is neither a blueprint nor a blueprint book")]
    UnrecognizedSchema,

    /// Blueprint book nesting exceeded the configured depth ceiling.
    #[error("blueprint book nesting exceeds depth {max}")]
    NestingTooDeep { max: usize },

    /// The document holds more nodes and records than the configured
    /// ceiling allows.
    #[error("document exceeds {max} total records")]
    TooManyEntries { max: usize },
}
