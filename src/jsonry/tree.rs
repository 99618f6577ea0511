//
//  cf-client
//  jsonry/tree.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Attaching values into, and fetching values out of, a JSON object tree.

use serde_json::{Map, Value};

use super::path::Segment;

/// Writes `value` at `segments` inside `tree`.
///
/// Intermediate objects are created as needed. A list segment spreads the
/// value's elements across an array of objects, merging into any objects
/// already written there by earlier fields.
pub fn attach(tree: &mut Map<String, Value>, segments: &[Segment], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        let value = match value {
            Value::Array(_) => value,
            other if head.list => Value::Array(vec![other]),
            other => other,
        };
        tree.insert(head.name.clone(), value);
        return;
    }

    if head.list {
        let existing = tree.remove(&head.name);
        tree.insert(head.name.clone(), Value::Array(spread(rest, value, existing)));
        return;
    }

    let child = tree
        .entry(head.name.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    if let Value::Object(child) = child {
        attach(child, rest, value);
    }
}

fn spread(rest: &[Segment], value: Value, existing: Option<Value>) -> Vec<Value> {
    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    let mut list = match existing {
        Some(Value::Array(list)) => list,
        _ => Vec::new(),
    };

    for (i, item) in items.into_iter().enumerate() {
        match list.get_mut(i) {
            Some(Value::Object(entry)) => attach(entry, rest, item),
            Some(slot) => {
                let mut entry = Map::new();
                attach(&mut entry, rest, item);
                *slot = Value::Object(entry);
            }
            None => {
                let mut entry = Map::new();
                attach(&mut entry, rest, item);
                list.push(Value::Object(entry));
            }
        }
    }
    list
}

/// Reads the value at `segments`.
///
/// Arrays met along the way broadcast the remaining path to every element;
/// elements where the path does not resolve are dropped. Returns `None` if
/// nothing is found.
pub fn fetch(tree: &Map<String, Value>, segments: &[Segment]) -> Option<Value> {
    let (head, rest) = segments.split_first()?;
    let value = tree.get(&head.name)?;
    if rest.is_empty() {
        return Some(value.clone());
    }
    fetch_value(value, rest)
}

fn fetch_value(value: &Value, rest: &[Segment]) -> Option<Value> {
    match value {
        Value::Object(child) => fetch(child, rest),
        Value::Array(items) => Some(Value::Array(
            items
                .iter()
                .filter_map(|item| fetch_value(item, rest))
                .collect(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonry::Path;
    use serde_json::json;

    fn segments(tag: &str) -> Vec<Segment> {
        Path::parse(tag, "unused").segments
    }

    #[test]
    fn test_attach_creates_nested_objects() {
        let mut tree = Map::new();
        attach(&mut tree, &segments("a.b.c"), json!(1));
        attach(&mut tree, &segments("a.b.d"), json!(2));
        assert_eq!(Value::Object(tree), json!({"a": {"b": {"c": 1, "d": 2}}}));
    }

    #[test]
    fn test_spread_merges_and_keeps_longer_entries() {
        let mut tree = Map::new();
        attach(&mut tree, &segments("items[].name"), json!(["x", "y", "z"]));
        attach(&mut tree, &segments("items[].id"), json!([1, 2]));
        assert_eq!(
            Value::Object(tree),
            json!({"items": [{"name": "x", "id": 1}, {"name": "y", "id": 2}, {"name": "z"}]})
        );
    }

    #[test]
    fn test_scalar_spreads_as_single_element() {
        let mut tree = Map::new();
        attach(&mut tree, &segments("data[].guid"), json!("g"));
        assert_eq!(Value::Object(tree), json!({"data": [{"guid": "g"}]}));
    }

    #[test]
    fn test_fetch_broadcasts_over_arrays() {
        let doc = json!({"errors": [{"detail": "a"}, {"code": 1}, {"detail": "b"}]});
        let tree = doc.as_object().unwrap();
        assert_eq!(fetch(tree, &segments("errors[].detail")), Some(json!(["a", "b"])));
        assert_eq!(fetch(tree, &segments("errors.detail")), Some(json!(["a", "b"])));
    }

    #[test]
    fn test_fetch_missing_path() {
        let doc = json!({"a": {"b": 1}});
        let tree = doc.as_object().unwrap();
        assert_eq!(fetch(tree, &segments("a.c")), None);
        assert_eq!(fetch(tree, &segments("a.b.c")), None);
    }
}
