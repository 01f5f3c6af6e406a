//! Detection of documented fields missing from a payload.
//!
//! A required field is missing when its path does not reach a value on every
//! branch. It is excused when one of its ancestors is documented as optional
//! and that ancestor is itself absent, `null`, or an empty array: nothing can
//! be expected beneath a structure that is not there.
//!
//! Declared paths are arranged in a prefix tree so that excusals propagate
//! top-down, through any number of nested optional ancestors.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::descriptor::FieldDescriptor;
use crate::path::{FieldPath, Segment};
use crate::processor::{ExtractedField, extract, has_field};

#[derive(Debug, Default)]
struct Node<'d> {
    descriptors: Vec<(usize, &'d FieldDescriptor)>,
    children: IndexMap<Segment, Node<'d>>,
}

impl<'d> Node<'d> {
    fn path(&self) -> Option<&'d FieldPath> {
        self.descriptors
            .first()
            .map(|(_, descriptor)| descriptor.path())
    }

    fn is_optional(&self) -> bool {
        self.descriptors
            .iter()
            .any(|(_, descriptor)| descriptor.is_optional())
    }
}

/// The declared paths of a set of descriptors, arranged by segment.
#[derive(Debug, Default)]
pub(crate) struct DeclaredPaths<'d> {
    root: Node<'d>,
}

impl<'d> DeclaredPaths<'d> {
    pub(crate) fn new(descriptors: &'d [FieldDescriptor]) -> Self {
        let mut root = Node::default();
        for (index, descriptor) in descriptors.iter().enumerate() {
            let node = descriptor
                .path()
                .segments()
                .iter()
                .fold(&mut root, |node, segment| {
                    node.children.entry(segment.clone()).or_default()
                });
            node.descriptors.push((index, descriptor));
        }
        Self { root }
    }

    /// The declared strict ancestors of `path`, outermost first.
    fn ancestors<'t>(&'t self, path: &'t FieldPath) -> impl Iterator<Item = &'t Node<'d>> {
        let mut node = Some(&self.root);
        path.segments().iter().map_while(move |segment| {
            let current = node?;
            node = current.children.get(segment);
            Some(current)
        })
    }

    /// Whether one of the strict ancestors of `path` is declared optional.
    pub(crate) fn has_optional_ancestor(&self, path: &FieldPath) -> bool {
        self.ancestors(path).any(Node::is_optional)
    }
}

/// Finds the documented fields that are missing from a document.
///
/// ```rust
/// use clawdoc_core::{FieldDescriptor, MissingFieldDetector};
/// use serde_json::json;
///
/// let document = json!({"outer": []});
/// let descriptors = [
///     FieldDescriptor::new("outer"),
///     FieldDescriptor::new("outer[]").optional(),
///     FieldDescriptor::new("outer[].inner"),
///     FieldDescriptor::new("other"),
/// ];
///
/// let detector = MissingFieldDetector::new(&document, &descriptors);
/// let missing = detector.find_missing();
///
/// assert_eq!(missing.len(), 1);
/// assert_eq!(missing[0].raw_path(), "other");
/// ```
#[derive(Debug)]
pub struct MissingFieldDetector<'a> {
    document: &'a Value,
    descriptors: &'a [FieldDescriptor],
    declared: DeclaredPaths<'a>,
}

impl<'a> MissingFieldDetector<'a> {
    /// Prepares the detection of `descriptors` against `document`.
    pub fn new(document: &'a Value, descriptors: &'a [FieldDescriptor]) -> Self {
        Self {
            document,
            descriptors,
            declared: DeclaredPaths::new(descriptors),
        }
    }

    /// The missing descriptors, in declaration order.
    pub fn find_missing(&self) -> Vec<&'a FieldDescriptor> {
        let mut missing = vec![false; self.descriptors.len()];
        self.visit(&self.declared.root, false, &mut missing);

        self.descriptors
            .iter()
            .zip(missing)
            .filter_map(|(descriptor, missing)| missing.then_some(descriptor))
            .collect()
    }

    /// Whether `descriptor` would be reported missing alongside the known descriptors.
    ///
    /// The descriptor does not need to be one of them.
    pub fn is_missing(&self, descriptor: &FieldDescriptor) -> bool {
        if descriptor.is_optional() || has_field(descriptor.path(), self.document) {
            return false;
        }
        let excused = self
            .declared
            .ancestors(descriptor.path())
            .any(|ancestor| self.excuses_descendants(ancestor));
        if excused {
            debug!(path = %descriptor.path(), "field beneath an absent optional field is not missing");
        }
        !excused
    }

    fn visit(&self, node: &Node<'a>, excused: bool, missing: &mut [bool]) {
        if !excused && !node.descriptors.is_empty() {
            let present = node
                .path()
                .is_some_and(|path| has_field(path, self.document));
            for (index, descriptor) in &node.descriptors {
                if !descriptor.is_optional()
                    && !present
                    && let Some(flag) = missing.get_mut(*index)
                {
                    *flag = true;
                }
            }
        }

        let excused = excused || self.excuses_descendants(node);
        for child in node.children.values() {
            self.visit(child, excused, missing);
        }
    }

    fn excuses_descendants(&self, node: &Node<'a>) -> bool {
        if !node.is_optional() {
            return false;
        }
        let Some(path) = node.path() else {
            return false;
        };
        let vacant = is_vacant(&extract(path, self.document));
        if vacant {
            debug!(%path, "optional field is absent, excusing the fields beneath it");
        }
        vacant
    }
}

/// Whether an optional structure should be considered not there.
fn is_vacant(extracted: &ExtractedField<'_>) -> bool {
    match extracted {
        ExtractedField::Absent => true,
        ExtractedField::Present(matches) => {
            !matches.is_complete()
                || matches
                    .values()
                    .all(|value| value.is_null() || value.as_array().is_some_and(Vec::is_empty))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn missing_paths(document: &Value, descriptors: &[FieldDescriptor]) -> Vec<String> {
        MissingFieldDetector::new(document, descriptors)
            .find_missing()
            .into_iter()
            .map(|descriptor| descriptor.raw_path().to_string())
            .collect()
    }

    #[test]
    fn should_report_described_field_that_is_not_present() {
        let descriptors = [
            FieldDescriptor::new("a"),
            FieldDescriptor::new("b"),
            FieldDescriptor::new("c"),
        ];

        let missing = missing_paths(&json!({"a": "alpha", "b": "bravo"}), &descriptors);

        assert_eq!(missing, vec!["c"]);
    }

    #[test]
    fn should_not_report_optional_field_that_is_not_present() {
        let descriptors = [
            FieldDescriptor::new("a"),
            FieldDescriptor::new("b"),
            FieldDescriptor::new("c").optional(),
        ];

        let missing = missing_paths(&json!({"a": "alpha", "b": "bravo"}), &descriptors);

        assert!(missing.is_empty());
    }

    #[test]
    fn should_report_field_beneath_optional_field_that_is_present() {
        let descriptors = [
            FieldDescriptor::new("a").optional(),
            FieldDescriptor::new("b"),
            FieldDescriptor::new("a.c"),
        ];

        let missing = missing_paths(&json!({"a": "alpha", "b": "bravo"}), &descriptors);

        assert_eq!(missing, vec!["a.c"]);
    }

    #[test]
    fn should_not_report_field_beneath_optional_field_that_is_not_present() {
        let descriptors = [
            FieldDescriptor::new("a").optional(),
            FieldDescriptor::new("b"),
            FieldDescriptor::new("a.c"),
        ];

        let missing = missing_paths(&json!({"b": "bravo"}), &descriptors);

        assert!(missing.is_empty());
    }

    #[test]
    fn should_not_report_field_beneath_optional_array_that_is_empty() {
        let descriptors = [
            FieldDescriptor::new("outer"),
            FieldDescriptor::new("outer[]").optional(),
            FieldDescriptor::new("outer[].inner"),
        ];

        let missing = missing_paths(&json!({"outer": []}), &descriptors);

        assert!(missing.is_empty());
    }

    #[test]
    fn should_not_report_child_of_sometimes_present_optional_field() {
        let descriptors = [
            FieldDescriptor::new("a.[].c").optional(),
            FieldDescriptor::new("a.[].c.d"),
        ];
        let document = json!({"a": [{"b": "bravo"}, {"b": "bravo", "c": {"d": "delta"}}]});

        let missing = missing_paths(&document, &descriptors);

        assert!(missing.is_empty());
    }

    #[test]
    fn should_not_report_child_of_nested_optional_array_that_is_empty() {
        let descriptors = [
            FieldDescriptor::new("a.[].b").optional(),
            FieldDescriptor::new("a.[].b.[]").optional(),
            FieldDescriptor::new("a.[].b.[].c"),
        ];

        let missing = missing_paths(&json!({"a": [{"b": []}]}), &descriptors);

        assert!(missing.is_empty());
    }

    #[test]
    fn should_report_child_of_nested_optional_array_that_contains_an_object() {
        let descriptors = [
            FieldDescriptor::new("a.[].b").optional(),
            FieldDescriptor::new("a.[].b.[]").optional(),
            FieldDescriptor::new("a.[].b.[].c"),
        ];

        let missing = missing_paths(&json!({"a": [{"b": [{}]}]}), &descriptors);

        assert_eq!(missing, vec!["a.[].b.[].c"]);
    }

    #[test]
    fn should_not_report_child_of_optional_object_that_is_null() {
        let descriptors = [
            FieldDescriptor::new("a").optional(),
            FieldDescriptor::new("a.b"),
        ];

        let missing = missing_paths(&json!({"a": null}), &descriptors);

        assert!(missing.is_empty());
    }

    #[test]
    fn should_excuse_through_several_optional_levels() {
        let descriptors = [
            FieldDescriptor::new("a.[].b").optional(),
            FieldDescriptor::new("a.[].b.c"),
            FieldDescriptor::new("a.[].b.c.d"),
        ];

        let missing = missing_paths(&json!({"a": [{"x": 1}]}), &descriptors);

        assert!(missing.is_empty());
    }

    #[test]
    fn should_report_field_absent_from_some_array_elements() {
        let descriptors = [FieldDescriptor::new("a[].b")];

        let missing = missing_paths(&json!({"a": [{"b": 1}, {}]}), &descriptors);

        assert_eq!(missing, vec!["a[].b"]);
    }

    #[test]
    fn should_not_confuse_textual_prefixes_with_ancestors() {
        let descriptors = [
            FieldDescriptor::new("ab").optional(),
            FieldDescriptor::new("abc"),
        ];

        let missing = missing_paths(&json!({}), &descriptors);

        assert_eq!(missing, vec!["abc"]);
    }

    #[test]
    fn should_check_undeclared_descriptor_against_declared_ancestors() {
        let descriptors = [FieldDescriptor::new("a[]").optional()];
        let empty = json!({"a": []});
        let with_element = json!({"a": [{}]});
        let detector = MissingFieldDetector::new(&empty, &descriptors);
        let sibling_detector = MissingFieldDetector::new(&with_element, &descriptors);

        assert!(!detector.is_missing(&FieldDescriptor::new("a[].c")));
        assert!(sibling_detector.is_missing(&FieldDescriptor::new("a[].c")));
        assert!(!sibling_detector.is_missing(&FieldDescriptor::new("a[].c").optional()));
    }

    #[test]
    fn should_find_optional_ancestors() {
        let descriptors = [
            FieldDescriptor::new("a"),
            FieldDescriptor::new("a.b[]").optional(),
        ];
        let declared = DeclaredPaths::new(&descriptors);

        assert!(declared.has_optional_ancestor(&FieldPath::parse("a.b[].c")));
        assert!(!declared.has_optional_ancestor(&FieldPath::parse("a.b[]")));
        assert!(!declared.has_optional_ancestor(&FieldPath::parse("a.c")));
    }
}
