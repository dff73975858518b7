//! Metadata extraction from decoded blueprint trees.
//!
//! Flattens a node tree into one consolidated summary: entity name
//! frequencies, bounding extent, leaf count and the declared game
//! version. Books of books collapse into a single record.

use std::collections::BTreeMap;

use crate::model::{Blueprint, GameVersion, Node, Position};

/// Aggregated metadata for one decoded blueprint string.
///
/// Entity counts use an ordered map so repeated decodes of identical
/// input serialize identically.
#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintMetadata {
    pub label: Option<String>,
    pub description: Option<String>,
    /// Entity prototype name to occurrence count, across all leaves.
    pub entity_counts: BTreeMap<String, u64>,
    /// Total placed entities across all leaves.
    pub entity_count: u64,
    /// Number of blueprint leaves (1 for a bare blueprint, N for a
    /// book).
    pub blueprint_count: u64,
    /// Bounding extent in whole tiles. Zero when nothing is positioned.
    pub width: u32,
    pub height: u32,
    pub version: Option<GameVersion>,
}

/// Extracts metadata from a decoded tree.
///
/// Infallible: the deserializer already enforced the record ceilings,
/// so this traversal is bounded by construction.
pub fn extract_metadata(node: &Node) -> BlueprintMetadata {
    let leaves = flatten(node);

    let mut entity_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut entity_count = 0u64;
    let mut bounds = Bounds::default();

    for blueprint in &leaves {
        for entity in &blueprint.entities {
            *entity_counts.entry(entity.name.clone()).or_insert(0) += 1;
            entity_count += 1;
            bounds.include(entity.position);
        }
        for tile in &blueprint.tiles {
            bounds.include(tile.position);
        }
    }

    let (width, height) = bounds.extent();
    let first = leaves.first();

    // A book explicitly names the whole assembly, so the root's label
    // wins over the first leaf's.
    let (root_label, root_description, root_version) = match node {
        Node::Blueprint(bp) => (bp.label.clone(), bp.description.clone(), bp.version),
        Node::Book(book) => (book.label.clone(), book.description.clone(), book.version),
    };

    BlueprintMetadata {
        label: root_label.or_else(|| first.and_then(|bp| bp.label.clone())),
        description: root_description.or_else(|| first.and_then(|bp| bp.description.clone())),
        entity_counts,
        entity_count,
        blueprint_count: leaves.len() as u64,
        width,
        height,
        version: root_version.or_else(|| first.and_then(|bp| bp.version)),
    }
}

/// Collects every blueprint leaf in document order, iteratively.
fn flatten(node: &Node) -> Vec<&Blueprint> {
    let mut leaves = Vec::new();
    let mut work = vec![node];

    while let Some(node) = work.pop() {
        match node {
            Node::Blueprint(bp) => leaves.push(bp),
            // Reversed so the LIFO work list yields document order.
            Node::Book(book) => work.extend(book.blueprints.iter().rev()),
        }
    }

    leaves
}

/// Running axis-aligned bounds over all positioned records.
#[derive(Debug, Default, Clone, Copy)]
struct Bounds {
    seen: bool,
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Bounds {
    fn include(&mut self, p: Position) {
        if !self.seen {
            *self = Bounds {
                seen: true,
                min_x: p.x,
                max_x: p.x,
                min_y: p.y,
                max_y: p.y,
            };
        } else {
            self.min_x = self.min_x.min(p.x);
            self.max_x = self.max_x.max(p.x);
            self.min_y = self.min_y.min(p.y);
            self.max_y = self.max_y.max(p.y);
        }
    }

    /// Extent in whole tiles: spans round up, and anything positioned
    /// occupies at least one tile even when it is a single point.
    fn extent(&self) -> (u32, u32) {
        if !self.seen {
            return (0, 0);
        }
        let width = ((self.max_x - self.min_x).ceil() as u32).max(1);
        let height = ((self.max_y - self.min_y).ceil() as u32).max(1);
        (width, height)
    }
}
