use jsonptr::PointerBuf;
use jsonptr::delete::Delete;
use jsonptr::resolve::Resolve;
use serde_json::Value;

use super::matcher::extract;
use crate::path::FieldPath;

/// Removes the values matched by `path`.
///
/// Scalars, `null` and arrays of scalars are removed. An object, or an array
/// holding objects or arrays, is only removed once nothing but empty
/// containers remain inside it, so documenting it does not document its
/// content.
pub(crate) fn remove(path: &FieldPath, document: &mut Value) {
    for pointer in locations(path, document) {
        let removable = document.resolve(&pointer).is_ok_and(is_leaf);
        if removable {
            let _ = document.delete(&pointer);
        }
    }
}

/// Removes the values matched by `path` along with everything beneath them.
pub(crate) fn remove_subsection(path: &FieldPath, document: &mut Value) {
    for pointer in locations(path, document) {
        let _ = document.delete(&pointer);
    }
}

/// Whether the value is an object or array holding nothing but hollow containers.
pub(crate) fn is_hollow(value: &Value) -> bool {
    match value {
        Value::Object(object) => object.values().all(is_hollow),
        Value::Array(items) => items.iter().all(is_hollow),
        _ => false,
    }
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

fn is_leaf(value: &Value) -> bool {
    match value {
        Value::Object(_) => is_hollow(value),
        Value::Array(items) => items
            .iter()
            .all(|item| !is_container(item) || is_hollow(item)),
        _ => true,
    }
}

// Last location first so that removing an array element does not shift the
// indices of locations still to be removed
fn locations(path: &FieldPath, document: &Value) -> Vec<PointerBuf> {
    let mut pointers = extract(path, document)
        .matches()
        .map(|matches| {
            matches
                .iter()
                .map(|found| found.pointer().clone())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    pointers.reverse();
    pointers
}
