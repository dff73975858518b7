//! Envelope decoding for blueprint strings.
//!
//! An exchange string is a one-character version marker followed by the
//! base64 encoding of a zlib-compressed JSON document. This module
//! reverses the envelope only; the document stage interprets the bytes.

use std::borrow::Cow;
use std::io::Read;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::read::ZlibDecoder;

use crate::error::DecodeError;
use crate::limits::{KNOWN_VERSION_MARKERS, Limits};

/// Decodes the envelope of a blueprint string, producing the raw
/// document bytes.
///
/// Fails with [`DecodeError::UnsupportedVersion`] on an unknown marker,
/// [`DecodeError::InvalidEncoding`] on bad base64,
/// [`DecodeError::CorruptStream`] on an unreadable zlib stream, and
/// [`DecodeError::DecompressedTooLarge`] when inflation would exceed
/// `limits.max_decompressed_bytes`.
pub fn decode_envelope(raw: &str, limits: &Limits) -> Result<Vec<u8>, DecodeError> {
    let mut chars = raw.chars();
    match chars.next() {
        Some(marker) if KNOWN_VERSION_MARKERS.contains(&marker) => {}
        found => return Err(DecodeError::UnsupportedVersion { found }),
    }

    let compressed = decode_base64(chars.as_str())?;
    inflate(&compressed, limits)
}

/// Decodes the base64 payload, re-inserting trailing padding first.
///
/// Exported strings routinely lose their `=` padding in transit (URL
/// mangling, copy-paste), so a short final quantum is padded out before
/// decoding. Characters outside the standard alphabet still fail.
fn decode_base64(payload: &str) -> Result<Vec<u8>, DecodeError> {
    let padded: Cow<'_, str> = if payload.len() % 4 == 0 {
        Cow::Borrowed(payload)
    } else {
        let mut s = String::with_capacity(payload.len() + 3);
        s.push_str(payload);
        while s.len() % 4 != 0 {
            s.push('=');
        }
        Cow::Owned(s)
    };

    STANDARD
        .decode(padded.as_bytes())
        .map_err(|e| DecodeError::InvalidEncoding(e.to_string()))
}

/// Inflates the zlib stream under the decompression ceiling.
///
/// The decoder is read through a `take` capped one byte past the
/// ceiling, so an amplification bomb aborts after at most `max + 1`
/// bytes are materialized rather than after the full expansion.
fn inflate(compressed: &[u8], limits: &Limits) -> Result<Vec<u8>, DecodeError> {
    let max = limits.max_decompressed_bytes;

    let decoder = ZlibDecoder::new(compressed);
    let mut limited = decoder.take(max as u64 + 1);
    let mut inflated = Vec::new();
    limited
        .read_to_end(&mut inflated)
        .map_err(|e| DecodeError::CorruptStream(e.to_string()))?;

    if inflated.len() > max {
        return Err(DecodeError::DecompressedTooLarge { max });
    }

    Ok(inflated)
}
