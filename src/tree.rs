//! Nested key tree operations: flattening and rehydration.
//!
//! A locale file is a nested JSON object whose leaves are translatable
//! values. Flattening projects the leaves into an ordered dot-path map;
//! rehydration merges translated leaves back into the tree at their
//! original paths without disturbing anything else.

use indexmap::IndexMap;
use serde_json::{
    Map,
    Value,
};

use crate::error::LocaleError;

/// Ordered dot-path → leaf value projection of a key tree.
///
/// Insertion order is the depth-first pre-order traversal of the source
/// tree, which makes the key sequence reproducible and positionally
/// meaningful for batching.
pub type FlatKeyMap = IndexMap<String, Value>;

/// Flatten a nested key tree into a dot-separated key map.
///
/// Nulls, strings, numbers, booleans and arrays are leaves; only object
/// nodes are recursed into. Arrays are kept atomic on purpose: index-keyed
/// paths could not be rehydrated without turning the array into an object.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use locale_sync::tree::flatten;
///
/// let tree = json!({
///     "common": {
///         "hello": "Hello",
///         "goodbye": "Goodbye"
///     }
/// });
///
/// let flat = flatten(&tree);
/// assert_eq!(flat.get("common.hello"), Some(&json!("Hello")));
/// assert_eq!(flat.get("common.goodbye"), Some(&json!("Goodbye")));
/// ```
#[must_use]
pub fn flatten(tree: &Value) -> FlatKeyMap {
    let mut flat = FlatKeyMap::new();
    flatten_value(tree, None, &mut flat);
    flat
}

fn flatten_value(value: &Value, prefix: Option<&str>, flat: &mut FlatKeyMap) {
    // Null must be classified before the object test: it is a leaf,
    // never a node to recurse into.
    if value.is_null() {
        if let Some(key) = prefix {
            flat.insert(key.to_string(), Value::Null);
        }
        return;
    }

    if let Value::Object(map) = value {
        for (key, child) in map {
            let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}.{key}"));
            flatten_value(child, Some(&full_key), flat);
        }
    } else if let Some(key) = prefix {
        flat.insert(key.to_string(), value.clone());
    }
}

/// Merge translated leaf values back into `tree` at their dot paths.
///
/// Intermediate object nodes are created as needed. Keys outside
/// `translated` are never touched. The whole map is validated against the
/// tree before any mutation, so a structural conflict leaves the tree
/// exactly as it was.
///
/// # Errors
/// [`LocaleError::StructuralConflict`] if an intermediate path segment is
/// occupied by a leaf value, if the terminal segment is occupied by an
/// object node whose descendant leaves would be destroyed, or if one key
/// of `translated` nests under another.
pub fn rehydrate(tree: &mut Value, translated: &FlatKeyMap) -> Result<(), LocaleError> {
    // A key nested under another would be silently dropped by the apply
    // pass once the shorter path became a leaf. Flattened maps are
    // prefix-free, so this only rejects hand-built input.
    for path in translated.keys() {
        let prefix = format!("{path}.");
        if translated.keys().any(|other| other.starts_with(&prefix)) {
            return Err(LocaleError::StructuralConflict { path: path.clone() });
        }
    }
    for path in translated.keys() {
        check_path(tree, path)?;
    }
    for (path, value) in translated {
        insert_at_path(tree, path, value.clone());
    }
    Ok(())
}

/// Walk `path` through the existing tree and reject any intermediate
/// segment already occupied by a non-object value, as well as a terminal
/// segment already occupied by an object node.
fn check_path(tree: &Value, path: &str) -> Result<(), LocaleError> {
    if !tree.is_object() {
        return Err(LocaleError::StructuralConflict { path: String::new() });
    }

    let mut node = tree;
    let mut walked = String::new();
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(segment);

        let Some(child) = node.get(segment) else {
            // Missing segments are created during the apply pass.
            return Ok(());
        };

        if segments.peek().is_none() {
            // An existing leaf at the terminal segment is replaced in
            // place. An object node is not: overwriting it would delete
            // every leaf underneath, keys that are not in the batch.
            if child.is_object() {
                return Err(LocaleError::StructuralConflict { path: walked });
            }
            return Ok(());
        }

        if !child.is_object() {
            return Err(LocaleError::StructuralConflict { path: walked });
        }
        node = child;
    }

    Ok(())
}

/// Set `path` to `value`, creating intermediate object nodes.
///
/// Callers must have validated the path with [`check_path`] first.
fn insert_at_path(tree: &mut Value, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return;
    };

    let mut node = tree;
    for segment in segments {
        let Some(map) = node.as_object_mut() else {
            return;
        };
        node = map.entry(segment.to_string()).or_insert_with(|| Value::Object(Map::new()));
    }

    if let Some(map) = node.as_object_mut() {
        map.insert(last.to_string(), value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;

    use super::*;

    #[googletest::test]
    fn flatten_simple() {
        let tree = json!({
            "hello": "Hello",
            "goodbye": "Goodbye"
        });

        let flat = flatten(&tree);

        expect_that!(flat.get("hello"), some(eq(&json!("Hello"))));
        expect_that!(flat.get("goodbye"), some(eq(&json!("Goodbye"))));
        expect_that!(flat.len(), eq(2));
    }

    #[googletest::test]
    fn flatten_nested() {
        let tree = json!({
            "common": {
                "hello": "Hello",
                "goodbye": "Goodbye"
            },
            "errors": {
                "notFound": "Not found"
            }
        });

        let flat = flatten(&tree);

        expect_that!(flat.get("common.hello"), some(eq(&json!("Hello"))));
        expect_that!(flat.get("common.goodbye"), some(eq(&json!("Goodbye"))));
        expect_that!(flat.get("errors.notFound"), some(eq(&json!("Not found"))));
        expect_that!(flat.len(), eq(3));
    }

    #[googletest::test]
    fn flatten_deep_nested() {
        let tree = json!({
            "a": {
                "b": {
                    "c": "Deep value"
                }
            }
        });

        let flat = flatten(&tree);

        expect_that!(flat.get("a.b.c"), some(eq(&json!("Deep value"))));
        expect_that!(flat.len(), eq(1));
    }

    #[googletest::test]
    fn flatten_preserves_traversal_order() {
        let tree = json!({
            "b": { "y": "1", "x": "2" },
            "a": "3",
            "c": { "z": "4" }
        });

        let flat = flatten(&tree);
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["b.y", "b.x", "a", "c.z"]);
    }

    #[googletest::test]
    fn flatten_null_is_a_leaf() {
        let tree = json!({
            "present": "yes",
            "missing": null
        });

        let flat = flatten(&tree);

        expect_that!(flat.get("missing"), some(eq(&Value::Null)));
        expect_that!(flat.len(), eq(2));
    }

    #[googletest::test]
    fn flatten_scalars_are_leaves() {
        let tree = json!({
            "number": 42,
            "boolean": true
        });

        let flat = flatten(&tree);

        expect_that!(flat.get("number"), some(eq(&json!(42))));
        expect_that!(flat.get("boolean"), some(eq(&json!(true))));
    }

    #[googletest::test]
    fn flatten_arrays_are_atomic_leaves() {
        let tree = json!({
            "items": ["apple", "banana"],
            "nested": { "list": [1, 2, 3] }
        });

        let flat = flatten(&tree);

        expect_that!(flat.get("items"), some(eq(&json!(["apple", "banana"]))));
        expect_that!(flat.get("nested.list"), some(eq(&json!([1, 2, 3]))));
        expect_that!(flat.len(), eq(2));
    }

    #[googletest::test]
    fn rehydrate_creates_intermediate_nodes() {
        let mut tree = json!({});
        let translated: FlatKeyMap =
            [("a.b.c".to_string(), json!("Deep"))].into_iter().collect();

        rehydrate(&mut tree, &translated).unwrap();

        assert_eq!(tree, json!({ "a": { "b": { "c": "Deep" } } }));
    }

    #[googletest::test]
    fn rehydrate_preserves_existing_content() {
        let mut tree = json!({
            "a": { "b": "Hola" },
            "keep": "me"
        });
        let translated: FlatKeyMap = [("c".to_string(), json!("Mundo"))].into_iter().collect();

        rehydrate(&mut tree, &translated).unwrap();

        assert_eq!(tree, json!({ "a": { "b": "Hola" }, "keep": "me", "c": "Mundo" }));
    }

    #[googletest::test]
    fn rehydrate_is_idempotent() {
        let mut tree = json!({ "a": { "b": "Hola" } });
        let translated: FlatKeyMap = [("c".to_string(), json!("Mundo"))].into_iter().collect();

        rehydrate(&mut tree, &translated).unwrap();
        let once = tree.clone();
        rehydrate(&mut tree, &translated).unwrap();

        assert_eq!(tree, once);
    }

    #[googletest::test]
    fn rehydrate_rejects_leaf_on_intermediate_segment() {
        let mut tree = json!({ "a": "leaf" });
        let before = tree.clone();
        let translated: FlatKeyMap = [("a.b".to_string(), json!("value"))].into_iter().collect();

        let result = rehydrate(&mut tree, &translated);

        expect_that!(
            result,
            err(matches_pattern!(LocaleError::StructuralConflict { path: eq("a") }))
        );
        // Conflict detection happens before any mutation.
        assert_eq!(tree, before);
    }

    #[googletest::test]
    fn rehydrate_rejects_object_on_terminal_segment() {
        // Overwriting the object at "a.b" would delete the "a.b.c" leaf,
        // a key outside the translated set.
        let mut tree = json!({ "a": { "b": { "c": "Hola" } } });
        let before = tree.clone();
        let translated: FlatKeyMap = [("a.b".to_string(), json!("Hello"))].into_iter().collect();

        let result = rehydrate(&mut tree, &translated);

        expect_that!(
            result,
            err(matches_pattern!(LocaleError::StructuralConflict { path: eq("a.b") }))
        );
        assert_eq!(tree, before);
    }

    #[googletest::test]
    fn rehydrate_rejects_nested_key_pairs() {
        let mut tree = json!({});
        let before = tree.clone();
        let translated: FlatKeyMap = [
            ("a".to_string(), json!("Leaf")),
            ("a.b".to_string(), json!("Nested")),
        ]
        .into_iter()
        .collect();

        let result = rehydrate(&mut tree, &translated);

        expect_that!(
            result,
            err(matches_pattern!(LocaleError::StructuralConflict { path: eq("a") }))
        );
        assert_eq!(tree, before);
    }

    #[googletest::test]
    fn rehydrate_conflict_leaves_tree_untouched() {
        let mut tree = json!({ "x": { "y": "leaf" } });
        let before = tree.clone();
        let translated: FlatKeyMap = [
            ("fresh".to_string(), json!("New")),
            ("x.y.z".to_string(), json!("Broken")),
        ]
        .into_iter()
        .collect();

        let result = rehydrate(&mut tree, &translated);

        expect_that!(result, err(anything()));
        assert_eq!(tree, before);
    }

    #[googletest::test]
    fn flatten_rehydrate_round_trip() {
        let original = json!({
            "a": { "b": "Hello", "c": { "d": null } },
            "e": "World",
            "f": 7,
            "g": [1, "two"]
        });

        let mut rebuilt = json!({});
        rehydrate(&mut rebuilt, &flatten(&original)).unwrap();

        assert_eq!(rebuilt, original);
    }
}
