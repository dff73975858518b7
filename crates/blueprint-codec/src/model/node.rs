//! The decoded blueprint tree.
//!
//! A blueprint string encodes either a single blueprint or a blueprint
//! book; a book holds an ordered sequence of children, each of which is
//! again a blueprint or a book. Nesting is unbounded in the format and
//! bounded by [`Limits`](crate::limits::Limits) in practice.

use crate::model::GameVersion;

/// A position in tile units. Fractional coordinates are normal; most
/// entities sit on half-tile centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A placed entity: prototype name plus position.
///
/// Entries that arrive without a name or a numeric position are dropped
/// during deserialization, so both fields are always present here.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub position: Position,
}

/// A ground tile entry.
///
/// Tiles contribute to the bounding extent but are not counted as
/// entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub name: String,
    pub position: Position,
}

/// An icon signal shown on the blueprint's toolbar slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub index: u32,
    pub signal: String,
}

/// A single blueprint, the leaf of the tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Blueprint {
    pub label: Option<String>,
    pub description: Option<String>,
    pub entities: Vec<Entity>,
    pub tiles: Vec<Tile>,
    pub icons: Vec<Icon>,
    /// Game version the blueprint was exported from, if declared.
    pub version: Option<GameVersion>,
}

/// A blueprint book: an ordered group of blueprints and further books.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlueprintBook {
    pub label: Option<String>,
    pub description: Option<String>,
    pub blueprints: Vec<Node>,
    pub version: Option<GameVersion>,
}

/// A node in the decoded tree. Exactly one of the two cases.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Blueprint(Blueprint),
    Book(BlueprintBook),
}

impl Node {
    /// Returns the node's label, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Node::Blueprint(bp) => bp.label.as_deref(),
            Node::Book(book) => book.label.as_deref(),
        }
    }

}
