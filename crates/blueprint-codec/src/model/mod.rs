//! Data model types for decoded blueprints.
//!
//! This module contains the core types the deserializer produces:
//! - The node tree (blueprints and blueprint books)
//! - Placed entities, tiles and icons
//! - The packed game version tag

pub mod node;
pub mod version;

pub use node::{Blueprint, BlueprintBook, Entity, Icon, Node, Position, Tile};
pub use version::GameVersion;
