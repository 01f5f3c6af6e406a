//! Detection of the parts of a payload no descriptor documents.

use serde_json::Value;
use tracing::debug;

use crate::descriptor::FieldDescriptor;
use crate::path::Segment;
use crate::processor::{is_hollow, remove, remove_subsection};

/// Returns what remains of `document` once every documented field is removed.
///
/// Deeper paths are removed first. An object or array described by a plain
/// descriptor only counts as documented once everything inside it has been
/// removed too, whereas a subsection descriptor, or a path ending with `*`,
/// documents everything beneath it. Empty objects and arrays left behind do not
/// count as undocumented content.
///
/// The document itself is left untouched.
///
/// ```rust
/// use clawdoc_core::{FieldDescriptor, find_undocumented_content};
/// use serde_json::json;
///
/// let document = json!({"a": {"b": 1, "c": 2}, "d": [{"e": true}]});
/// let descriptors = [
///     FieldDescriptor::new("a.b"),
///     FieldDescriptor::subsection_with_path("d"),
/// ];
///
/// let undocumented = find_undocumented_content(&document, &descriptors);
///
/// assert_eq!(undocumented, Some(json!({"a": {"c": 2}})));
/// ```
pub fn find_undocumented_content(
    document: &Value,
    descriptors: &[FieldDescriptor],
) -> Option<Value> {
    let mut ordered = descriptors.iter().collect::<Vec<_>>();
    ordered.sort_by_key(|descriptor| std::cmp::Reverse(descriptor.path().len()));

    let mut remainder = document.clone();
    for descriptor in ordered {
        let path = descriptor.path();
        let covers_descendants = descriptor.is_subsection()
            || matches!(path.segments().last(), Some(Segment::AnyRemainder));
        if covers_descendants {
            remove_subsection(path, &mut remainder);
        } else {
            remove(path, &mut remainder);
        }
    }

    if remainder.is_null() || is_hollow(&remainder) {
        None
    } else {
        debug!(descriptors = descriptors.len(), "payload has undocumented content");
        Some(remainder)
    }
}
