//! Game version tag decoding.
//!
//! Blueprints carry the exporting game version as a single u64 packing
//! four 16-bit fields, high bits first:
//!
//! ```text
//! major << 48 | minor << 32 | patch << 16 | dev
//! ```
//!
//! The dev field is build metadata and is not retained.

use std::fmt;

/// A decoded `major.minor.patch` game version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl GameVersion {
    /// Unpacks a version from its wire representation.
    pub fn from_u64(raw: u64) -> GameVersion {
        GameVersion {
            major: (raw >> 48) as u16,
            minor: (raw >> 32) as u16,
            patch: (raw >> 16) as u16,
        }
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_1_0_0() {
        // 1 << 48, the version the exchange format stabilized on
        let v = GameVersion::from_u64(281_474_976_710_656);
        assert_eq!(v, GameVersion { major: 1, minor: 0, patch: 0 });
    }

    #[test]
    fn test_unpack_fields() {
        let raw = (2u64 << 48) | (1u64 << 32) | (37u64 << 16) | 99;
        let v = GameVersion::from_u64(raw);
        assert_eq!(v.major, 2);
        assert_eq!(v.minor, 1);
        assert_eq!(v.patch, 37);
    }

    #[test]
    fn test_display() {
        let v = GameVersion::from_u64(1u64 << 48 | 1u64 << 32);
        assert_eq!(v.to_string(), "1.1.0");
    }

    #[test]
    fn test_zero_version() {
        assert_eq!(
            GameVersion::from_u64(0),
            GameVersion { major: 0, minor: 0, patch: 0 }
        );
    }
}
