use std::collections::BTreeSet;

use serde_json::Value;

use crate::path::{FieldPath, Segment};

/// The field paths found in some of `items` but not in all of them, relative
/// to each item.
pub(super) fn uncommon_paths<'v>(items: impl IntoIterator<Item = &'v Value>) -> BTreeSet<FieldPath> {
    let per_item = items
        .into_iter()
        .map(|item| {
            let mut paths = BTreeSet::new();
            collect(&mut paths, &FieldPath::root(), item);
            paths
        })
        .collect::<Vec<_>>();

    let distinct = per_item.iter().flatten().cloned().collect::<BTreeSet<_>>();
    distinct
        .into_iter()
        .filter(|path| per_item.iter().any(|paths| !paths.contains(path)))
        .collect()
}

fn collect(paths: &mut BTreeSet<FieldPath>, parent: &FieldPath, value: &Value) {
    match value {
        Value::Object(object) => {
            for (key, child) in object {
                let path = parent.child(Segment::Name(key.clone()));
                collect(paths, &path, child);
                paths.insert(path);
            }
        }
        Value::Array(items) => {
            let path = parent.child(Segment::AnyArrayElement);
            for item in items {
                collect(paths, &path, item);
            }
            paths.insert(path);
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}
