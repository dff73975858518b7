//! Blueprint string codec.
//!
//! Decoding runs in two stages: the envelope stage turns the exchange
//! string into raw bytes, and the document stage turns those bytes into
//! a typed node tree. Both stages enforce the crate's resource limits.

pub mod document;
pub mod envelope;

pub use document::deserialize;
pub use envelope::decode_envelope;
