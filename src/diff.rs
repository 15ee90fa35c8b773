//! Missing-key computation between a base and a target flat map.

use crate::tree::FlatKeyMap;

/// Entries of `base` whose key is absent from `target`, in base order.
///
/// Membership is presence-only: a key that exists in the target keeps
/// whatever value it has, even an empty or stale one. Only true gaps are
/// filled. The returned map carries the base values so the batcher can
/// source the text to translate, and its key order inherits the base
/// map's order, which downstream batch alignment relies on.
#[must_use]
pub fn missing_entries(base: &FlatKeyMap, target: &FlatKeyMap) -> FlatKeyMap {
    base.iter()
        .filter(|(key, _)| !target.contains_key(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
