//! Document deserialization for decoded blueprint payloads.
//!
//! The payload is a JSON document whose top level is either
//! `{"blueprint": {...}}` or `{"blueprint_book": {...}}`. A book's
//! `"blueprints"` array holds children of either shape again (each
//! wrapped in an `{"index": n, ...}` object), nested arbitrarily deep.
//!
//! The format evolves additively across game revisions with no formal
//! compatibility contract, so field extraction is permissive: optional
//! fields default to absent, and entity/tile entries missing a name or a
//! numeric position are dropped rather than failing the whole decode.
//! Only a structurally unrecognizable document is an error.

use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::limits::Limits;
use crate::model::{Blueprint, BlueprintBook, Entity, GameVersion, Icon, Node, Position, Tile};

/// Parses raw payload bytes into a blueprint node tree.
///
/// Book nesting is walked with an explicit frame stack rather than
/// recursive calls, so the depth ceiling holds regardless of the host
/// call-stack size.
pub fn deserialize(bytes: &[u8], limits: &Limits) -> Result<Node, DecodeError> {
    let document: Value =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::MalformedDocument(e.to_string()))?;

    build_tree(&document, limits)
}

/// The two recognized top-level shapes, in classification order.
enum Shape<'a> {
    Book(&'a Map<String, Value>),
    Blueprint(&'a Map<String, Value>),
}

/// Classifies a document by its distinguishing key. Book children carry
/// an extra `index` wrapper field, which this ignores.
fn classify(value: &Value) -> Option<Shape<'_>> {
    let obj = value.as_object()?;
    if let Some(book) = obj.get("blueprint_book").and_then(Value::as_object) {
        return Some(Shape::Book(book));
    }
    if let Some(bp) = obj.get("blueprint").and_then(Value::as_object) {
        return Some(Shape::Blueprint(bp));
    }
    None
}

/// An open book whose remaining children are still being classified.
struct BookFrame<'a> {
    book: BlueprintBook,
    children: std::slice::Iter<'a, Value>,
}

fn build_tree(document: &Value, limits: &Limits) -> Result<Node, DecodeError> {
    let mut visited = 0usize;
    let mut stack: Vec<BookFrame<'_>> = Vec::new();
    let mut current = document;

    loop {
        charge(&mut visited, 1, limits)?;

        // `finished` holds a completed subtree awaiting attachment.
        let mut finished = match classify(current) {
            None => return Err(DecodeError::UnrecognizedSchema),
            Some(Shape::Blueprint(obj)) => {
                Some(Node::Blueprint(read_blueprint(obj, &mut visited, limits)?))
            }
            Some(Shape::Book(obj)) => {
                if stack.len() >= limits.max_nesting_depth {
                    return Err(DecodeError::NestingTooDeep {
                        max: limits.max_nesting_depth,
                    });
                }
                let children: &[Value] = obj
                    .get("blueprints")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                stack.push(BookFrame {
                    book: read_book_header(obj),
                    children: children.iter(),
                });
                None
            }
        };

        // Attach the finished subtree and pull the next pending child,
        // closing exhausted books along the way.
        loop {
            if let Some(node) = finished.take() {
                match stack.last_mut() {
                    None => return Ok(node),
                    Some(frame) => frame.book.blueprints.push(node),
                }
            }
            // A frame is always present here: a taken `finished` either
            // returned above or was attached to one.
            let next_child = match stack.last_mut() {
                Some(frame) => frame.children.next(),
                None => return Err(DecodeError::UnrecognizedSchema),
            };
            match next_child {
                Some(child) => {
                    current = child;
                    break;
                }
                None => {
                    if let Some(frame) = stack.pop() {
                        finished = Some(Node::Book(frame.book));
                    }
                }
            }
        }
    }
}

fn charge(visited: &mut usize, n: usize, limits: &Limits) -> Result<(), DecodeError> {
    *visited = visited.saturating_add(n);
    if *visited > limits.max_total_records {
        return Err(DecodeError::TooManyEntries {
            max: limits.max_total_records,
        });
    }
    Ok(())
}

fn read_book_header(obj: &Map<String, Value>) -> BlueprintBook {
    BlueprintBook {
        label: read_string(obj, "label"),
        description: read_string(obj, "description"),
        blueprints: Vec::new(),
        version: read_version(obj),
    }
}

fn read_blueprint(
    obj: &Map<String, Value>,
    visited: &mut usize,
    limits: &Limits,
) -> Result<Blueprint, DecodeError> {
    let mut blueprint = Blueprint {
        label: read_string(obj, "label"),
        description: read_string(obj, "description"),
        version: read_version(obj),
        ..Blueprint::default()
    };

    for entry in read_array(obj, "entities") {
        charge(visited, 1, limits)?;
        if let Some((name, position)) = read_placed(entry) {
            blueprint.entities.push(Entity { name, position });
        }
    }

    for entry in read_array(obj, "tiles") {
        charge(visited, 1, limits)?;
        if let Some((name, position)) = read_placed(entry) {
            blueprint.tiles.push(Tile { name, position });
        }
    }

    for entry in read_array(obj, "icons") {
        if let Some(icon) = read_icon(entry) {
            blueprint.icons.push(icon);
        }
    }

    Ok(blueprint)
}

/// Reads a name + position pair, the common shape of entity and tile
/// entries. Returns `None` when either half is missing or non-numeric;
/// the caller drops the entry.
fn read_placed(entry: &Value) -> Option<(String, Position)> {
    let obj = entry.as_object()?;
    let name = obj.get("name")?.as_str()?.to_owned();
    let position = obj.get("position")?.as_object()?;
    let x = position.get("x")?.as_f64()?;
    let y = position.get("y")?.as_f64()?;
    Some((name, Position { x, y }))
}

fn read_icon(entry: &Value) -> Option<Icon> {
    let obj = entry.as_object()?;
    let index = obj.get("index")?.as_u64()? as u32;
    let signal = obj
        .get("signal")?
        .as_object()?
        .get("name")?
        .as_str()?
        .to_owned();
    Some(Icon { index, signal })
}

fn read_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn read_version(obj: &Map<String, Value>) -> Option<GameVersion> {
    obj.get("version")
        .and_then(Value::as_u64)
        .map(GameVersion::from_u64)
}

fn read_array<'a>(obj: &'a Map<String, Value>, key: &str) -> std::slice::Iter<'a, Value> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn deserialize_value(document: &Value, limits: &Limits) -> Result<Node, DecodeError> {
        deserialize(document.to_string().as_bytes(), limits)
    }

    /// A book nested `depth` books deep with a single blueprint at the
    /// bottom.
    fn nested_book(depth: usize) -> Value {
        let mut node = json!({"blueprint": {"entities": []}});
        for _ in 0..depth {
            node = json!({"blueprint_book": {"blueprints": [node]}});
        }
        node
    }

    #[test]
    fn test_single_blueprint() {
        let document = json!({
            "blueprint": {
                "item": "blueprint",
                "label": "Belt line",
                "description": "Early game bus",
                "entities": [
                    {"entity_number": 1, "name": "transport-belt", "position": {"x": 0.5, "y": 0.5}},
                    {"entity_number": 2, "name": "inserter", "position": {"x": 2.5, "y": 0.5}}
                ],
                "icons": [{"signal": {"type": "item", "name": "transport-belt"}, "index": 1}],
                "version": 281474976710656u64
            }
        });

        let node = deserialize_value(&document, &Limits::default()).unwrap();
        let Node::Blueprint(bp) = node else {
            panic!("expected blueprint leaf");
        };
        assert_eq!(bp.label.as_deref(), Some("Belt line"));
        assert_eq!(bp.description.as_deref(), Some("Early game bus"));
        assert_eq!(bp.entities.len(), 2);
        assert_eq!(bp.entities[0].name, "transport-belt");
        assert_eq!(bp.entities[1].position, Position { x: 2.5, y: 0.5 });
        assert_eq!(bp.icons, vec![Icon { index: 1, signal: "transport-belt".into() }]);
        assert_eq!(bp.version.map(|v| v.major), Some(1));
    }

    #[test]
    fn test_book_with_nested_book() {
        let document = json!({
            "blueprint_book": {
                "label": "Outer",
                "blueprints": [
                    {"index": 0, "blueprint": {"label": "A", "entities": []}},
                    {"index": 1, "blueprint_book": {
                        "label": "Inner",
                        "blueprints": [
                            {"index": 0, "blueprint": {"label": "B", "entities": []}}
                        ]
                    }}
                ]
            }
        });

        let node = deserialize_value(&document, &Limits::default()).unwrap();
        let Node::Book(book) = node else {
            panic!("expected book");
        };
        assert_eq!(book.label.as_deref(), Some("Outer"));
        assert_eq!(book.blueprints.len(), 2);
        assert_eq!(book.blueprints[0].label(), Some("A"));
        let Node::Book(inner) = &book.blueprints[1] else {
            panic!("expected nested book");
        };
        assert_eq!(inner.label.as_deref(), Some("Inner"));
        assert_eq!(inner.blueprints[0].label(), Some("B"));
    }

    #[test]
    fn test_empty_book() {
        let document = json!({"blueprint_book": {"label": "Empty"}});

        let node = deserialize_value(&document, &Limits::default()).unwrap();
        let Node::Book(book) = node else {
            panic!("expected book");
        };
        assert!(book.blueprints.is_empty());
    }

    #[test]
    fn test_malformed_document() {
        let result = deserialize(b"{\"blueprint\": ", &Limits::default());
        assert!(matches!(result, Err(DecodeError::MalformedDocument(_))));
    }

    #[test]
    fn test_unrecognized_schema() {
        let document = json!({"upgrade_planner": {"settings": {}}});
        let result = deserialize_value(&document, &Limits::default());
        assert_eq!(result, Err(DecodeError::UnrecognizedSchema));
    }

    #[test]
    fn test_unrecognized_child_in_book() {
        let document = json!({
            "blueprint_book": {
                "blueprints": [{"index": 0, "deconstruction_planner": {}}]
            }
        });
        let result = deserialize_value(&document, &Limits::default());
        assert_eq!(result, Err(DecodeError::UnrecognizedSchema));
    }

    #[test]
    fn test_entry_salvage() {
        let document = json!({
            "blueprint": {
                "entities": [
                    {"entity_number": 1, "name": "inserter", "position": {"x": 1.5, "y": 0.5}},
                    {"entity_number": 2, "name": "no-position"},
                    {"entity_number": 3, "position": {"x": 0.0, "y": 0.0}},
                    {"entity_number": 4, "name": "bad-coords", "position": {"x": "east", "y": 0}}
                ],
                "tiles": [
                    {"name": "stone-path", "position": {"x": 0, "y": 0}},
                    {"name": "no-position-tile"}
                ]
            }
        });

        let node = deserialize_value(&document, &Limits::default()).unwrap();
        let Node::Blueprint(bp) = node else {
            panic!("expected blueprint leaf");
        };
        assert_eq!(bp.entities.len(), 1);
        assert_eq!(bp.entities[0].name, "inserter");
        assert_eq!(bp.tiles.len(), 1);
        assert_eq!(bp.tiles[0].name, "stone-path");
    }

    #[test]
    fn test_optional_fields_absent() {
        let document = json!({"blueprint": {}});

        let node = deserialize_value(&document, &Limits::default()).unwrap();
        let Node::Blueprint(bp) = node else {
            panic!("expected blueprint leaf");
        };
        assert_eq!(bp.label, None);
        assert_eq!(bp.description, None);
        assert_eq!(bp.version, None);
        assert!(bp.entities.is_empty());
        assert!(bp.tiles.is_empty());
        assert!(bp.icons.is_empty());
    }

    #[test]
    fn test_nesting_within_ceiling() {
        let limits = Limits {
            max_nesting_depth: 8,
            ..Limits::default()
        };
        let node = deserialize_value(&nested_book(8), &limits).unwrap();
        assert!(matches!(node, Node::Book(_)));
    }

    #[test]
    fn test_nesting_too_deep() {
        let limits = Limits {
            max_nesting_depth: 8,
            ..Limits::default()
        };
        let result = deserialize_value(&nested_book(9), &limits);
        assert_eq!(result, Err(DecodeError::NestingTooDeep { max: 8 }));
    }

    #[test]
    fn test_too_many_entries() {
        let entities: Vec<Value> = (0..100)
            .map(|i| json!({"name": "wall", "position": {"x": i, "y": 0}}))
            .collect();
        let document = json!({"blueprint": {"entities": entities}});
        let limits = Limits {
            max_total_records: 50,
            ..Limits::default()
        };

        let result = deserialize_value(&document, &limits);
        assert_eq!(result, Err(DecodeError::TooManyEntries { max: 50 }));
    }

    #[test]
    fn test_record_count_spans_leaves() {
        // 3 nodes (book + 2 blueprints) + 2x20 entities = 43 records.
        let entities: Vec<Value> = (0..20)
            .map(|i| json!({"name": "wall", "position": {"x": i, "y": 0}}))
            .collect();
        let document = json!({
            "blueprint_book": {
                "blueprints": [
                    {"index": 0, "blueprint": {"entities": entities.clone()}},
                    {"index": 1, "blueprint": {"entities": entities}}
                ]
            }
        });

        let ok = Limits { max_total_records: 43, ..Limits::default() };
        assert!(deserialize_value(&document, &ok).is_ok());

        let tight = Limits { max_total_records: 42, ..Limits::default() };
        assert_eq!(
            deserialize_value(&document, &tight),
            Err(DecodeError::TooManyEntries { max: 42 })
        );
    }
}
