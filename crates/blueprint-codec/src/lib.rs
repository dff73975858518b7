//! Decoder and metadata extractor for Factorio blueprint strings.
//!
//! A blueprint string is a one-character version marker followed by the
//! base64 encoding of a zlib-compressed JSON document. The document
//! holds either a single blueprint or a blueprint book whose children
//! nest arbitrarily deep. This crate reverses the envelope, builds a
//! typed node tree and reduces it to one [`BlueprintMetadata`] summary:
//! entity counts, bounding extent, leaf count and game version.
//!
//! Decoding is a pure, stateless transformation and is safe to run
//! concurrently on distinct inputs. Input is treated as hostile:
//! decompression size, book nesting depth and total record count are
//! all capped by [`Limits`], so a crafted string cannot blow up memory
//! or the stack. This is a decode-only pipeline; it does not construct
//! blueprint strings.
//!
//! ```
//! use std::io::Write;
//! use base64::Engine;
//!
//! let document = br#"{"blueprint":{"label":"Belt line","entities":[
//!     {"entity_number":1,"name":"transport-belt","position":{"x":0.5,"y":0.5}},
//!     {"entity_number":2,"name":"transport-belt","position":{"x":1.5,"y":0.5}}
//! ],"version":281474976710656}}"#;
//! let mut encoder =
//!     flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
//! encoder.write_all(document).unwrap();
//! let raw = format!(
//!     "0{}",
//!     base64::engine::general_purpose::STANDARD.encode(encoder.finish().unwrap())
//! );
//!
//! let meta = blueprint_codec::parse(&raw).unwrap();
//! assert_eq!(meta.label.as_deref(), Some("Belt line"));
//! assert_eq!(meta.entity_counts.get("transport-belt"), Some(&2));
//! assert_eq!(meta.version.map(|v| v.major), Some(1));
//! ```

pub mod codec;
pub mod error;
pub mod limits;
pub mod metadata;
pub mod model;

pub use codec::{decode_envelope, deserialize};
pub use error::DecodeError;
pub use limits::Limits;
pub use metadata::{BlueprintMetadata, extract_metadata};
pub use model::{Blueprint, BlueprintBook, Entity, GameVersion, Icon, Node, Position, Tile};

/// Decodes a blueprint string and extracts its metadata, using the
/// default [`Limits`].
pub fn parse(raw: &str) -> Result<BlueprintMetadata, DecodeError> {
    parse_with_limits(raw, &Limits::default())
}

/// Decodes a blueprint string under caller-supplied limits.
///
/// The pipeline stops at the first failing stage; a failed decode never
/// yields a partial record.
pub fn parse_with_limits(raw: &str, limits: &Limits) -> Result<BlueprintMetadata, DecodeError> {
    let bytes = codec::decode_envelope(raw, limits)?;
    let tree = codec::deserialize(&bytes, limits)?;
    Ok(metadata::extract_metadata(&tree))
}

/// Decodes a blueprint string into its node tree without summarizing,
/// for callers that want the full entity and tile listings.
pub fn parse_tree(raw: &str, limits: &Limits) -> Result<Node, DecodeError> {
    let bytes = codec::decode_envelope(raw, limits)?;
    codec::deserialize(&bytes, limits)
}
