//! Resource limits for blueprint decoding.
//!
//! Blueprint strings are user-submitted, and zlib compression combined
//! with nested blueprint books lets a tiny input expand into an enormous
//! or deeply recursive document. Every stage of the decode pipeline
//! checks these ceilings.

/// Maximum decompressed payload size (64 MB).
pub const MAX_DECOMPRESSED_BYTES: usize = 64 * 1024 * 1024;

/// Maximum blueprint book nesting depth.
///
/// Kept below the JSON parser's own recursion ceiling (128 containers,
/// roughly 40 book levels) so this guard, not the parser, owns the
/// depth failure mode.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Maximum nodes plus entity/tile entries visited in one decode.
pub const MAX_TOTAL_RECORDS: usize = 1_000_000;

/// Version markers accepted at the start of a blueprint string.
///
/// Every exchange-format revision the game has shipped so far uses `'0'`.
pub const KNOWN_VERSION_MARKERS: &[char] = &['0'];

/// Decode-time resource ceilings.
///
/// The defaults are sized for untrusted input arriving over an API;
/// embedders can tighten them per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Ceiling on the inflated payload, checked while streaming.
    pub max_decompressed_bytes: usize,
    /// Ceiling on book-in-book nesting depth.
    pub max_nesting_depth: usize,
    /// Ceiling on total nodes and records visited.
    pub max_total_records: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_decompressed_bytes: MAX_DECOMPRESSED_BYTES,
            max_nesting_depth: MAX_NESTING_DEPTH,
            max_total_records: MAX_TOTAL_RECORDS,
        }
    }
}
