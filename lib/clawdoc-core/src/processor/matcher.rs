use jsonptr::PointerBuf;
use serde_json::Value;

use crate::path::{FieldPath, Segment};

/// A value matched by a field path, with its location in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch<'a> {
    pointer: PointerBuf,
    value: &'a Value,
}

impl<'a> FieldMatch<'a> {
    /// The concrete location of the value, e.g. `/items/0/id`.
    pub fn pointer(&self) -> &PointerBuf {
        &self.pointer
    }

    /// The matched value.
    pub fn value(&self) -> &'a Value {
        self.value
    }
}

/// All values matched by a field path.
#[derive(Debug, Clone, PartialEq)]
pub struct Matches<'a> {
    found: Vec<FieldMatch<'a>>,
    absent: usize,
}

impl<'a> Matches<'a> {
    /// The matched values in document order.
    pub fn values(&self) -> impl Iterator<Item = &'a Value> + '_ {
        self.found.iter().map(|found| found.value)
    }

    /// The matches in document order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldMatch<'a>> {
        self.found.iter()
    }

    /// The first match in document order.
    pub fn first(&self) -> Option<&'a Value> {
        self.found.first().map(|found| found.value)
    }

    /// Number of matched values.
    pub fn len(&self) -> usize {
        self.found.len()
    }

    /// Always `false`: an empty match set is [`ExtractedField::Absent`].
    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    /// Whether every branch explored reached a value.
    ///
    /// `a[].b` is not complete when one element of `a` has no `b`.
    pub fn is_complete(&self) -> bool {
        self.absent == 0
    }
}

/// The result of matching a field path against a document.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedField<'a> {
    /// The path denotes no location of the document.
    ///
    /// Distinct from a location holding `null`, which is a match.
    Absent,
    /// The path denotes at least one location.
    Present(Matches<'a>),
}

impl<'a> ExtractedField<'a> {
    /// Whether the path matched nothing.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The matches, if any.
    pub fn matches(&self) -> Option<&Matches<'a>> {
        match self {
            Self::Absent => None,
            Self::Present(matches) => Some(matches),
        }
    }
}

/// Matches a path against a document.
///
/// ```rust
/// use clawdoc_core::{ExtractedField, FieldPath, extract};
/// use serde_json::json;
///
/// let document = json!({"a": [{"id": 1}, {"id": null}, {}]});
///
/// let ExtractedField::Present(matches) = extract(&FieldPath::parse("a[].id"), &document) else {
///     panic!("a[].id should match");
/// };
/// assert_eq!(matches.values().collect::<Vec<_>>(), vec![&json!(1), &json!(null)]);
/// assert!(!matches.is_complete());
///
/// assert!(extract(&FieldPath::parse("b"), &document).is_absent());
/// ```
pub fn extract<'a>(path: &FieldPath, document: &'a Value) -> ExtractedField<'a> {
    let mut matches = Matches {
        found: Vec::new(),
        absent: 0,
    };
    let mut location = PointerBuf::new();
    traverse(path.segments(), document, &mut location, &mut matches);

    if matches.found.is_empty() {
        ExtractedField::Absent
    } else {
        ExtractedField::Present(matches)
    }
}

/// Whether the path reaches a value, possibly `null`, on every branch.
pub fn has_field(path: &FieldPath, document: &Value) -> bool {
    match extract(path, document) {
        ExtractedField::Absent => false,
        ExtractedField::Present(matches) => matches.is_complete(),
    }
}

fn traverse<'a>(
    segments: &[Segment],
    value: &'a Value,
    location: &mut PointerBuf,
    matches: &mut Matches<'a>,
) {
    let Some((segment, rest)) = segments.split_first() else {
        matches.found.push(FieldMatch {
            pointer: location.clone(),
            value,
        });
        return;
    };

    match segment {
        Segment::AnyRemainder => matches.found.push(FieldMatch {
            pointer: location.clone(),
            value,
        }),
        Segment::Name(name) => match value.as_object().and_then(|object| object.get(name)) {
            Some(child) => {
                location.push_back(name.as_str());
                traverse(rest, child, location, matches);
                location.pop_back();
            }
            None => matches.absent += 1,
        },
        Segment::AnyArrayElement => match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    location.push_back(index);
                    traverse(rest, item, location, matches);
                    location.pop_back();
                }
            }
            _ => matches.absent += 1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values<'a>(path: &str, document: &'a Value) -> Vec<&'a Value> {
        match extract(&FieldPath::parse(path), document) {
            ExtractedField::Absent => vec![],
            ExtractedField::Present(matches) => matches.values().collect(),
        }
    }

    fn pointers(path: &str, document: &Value) -> Vec<String> {
        extract(&FieldPath::parse(path), document)
            .matches()
            .map(|matches| matches.iter().map(|found| found.pointer().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn should_extract_top_level_field() {
        let document = json!({"a": "alpha"});
        assert_eq!(values("a", &document), vec![&json!("alpha")]);
    }

    #[test]
    fn should_extract_nested_field() {
        let document = json!({"a": {"b": {"c": 3}}});
        assert_eq!(values("a.b.c", &document), vec![&json!(3)]);
    }

    #[test]
    fn should_extract_field_from_every_array_element() {
        let document = json!({"a": [{"b": 1}, {"b": 2}, {"b": 3}]});
        assert_eq!(
            values("a[].b", &document),
            vec![&json!(1), &json!(2), &json!(3)]
        );
        assert_eq!(
            pointers("a[].b", &document),
            vec!["/a/0/b", "/a/1/b", "/a/2/b"]
        );
    }

    #[test]
    fn should_expand_nested_arrays_in_document_order() {
        let document = json!({"a": [{"b": [1, 2]}, {"b": [3]}, {"b": []}]});
        assert_eq!(
            values("a[].b[]", &document),
            vec![&json!(1), &json!(2), &json!(3)]
        );
        assert_eq!(
            pointers("a.[].b.[]", &document),
            vec!["/a/0/b/0", "/a/0/b/1", "/a/1/b/0"]
        );
    }

    #[test]
    fn should_extract_array_elements_of_top_level_array() {
        let document = json!([{"id": "x"}, {"id": "y"}]);
        assert_eq!(values("[].id", &document), vec![&json!("x"), &json!("y")]);
    }

    #[test]
    fn should_match_remainder_at_current_value() {
        let document = json!({"a": [{"b": {"deep": [1]}}, {"b": 5}]});
        assert_eq!(
            values("a[].b.*", &document),
            vec![&json!({"deep": [1]}), &json!(5)]
        );
    }

    #[test]
    fn should_distinguish_null_from_absent() {
        let document = json!({"a": null});
        let extracted = extract(&FieldPath::parse("a"), &document);
        assert_eq!(
            extracted.matches().and_then(Matches::first),
            Some(&Value::Null)
        );
        assert!(extract(&FieldPath::parse("b"), &document).is_absent());
    }

    #[test]
    fn should_be_absent_beneath_empty_array() {
        let document = json!({"outer": []});
        assert!(extract(&FieldPath::parse("outer[]"), &document).is_absent());
        assert!(extract(&FieldPath::parse("outer[].inner"), &document).is_absent());
        assert!(has_field(&FieldPath::parse("outer"), &document));
    }

    #[test]
    fn should_not_descend_into_non_objects() {
        let document = json!({"a": "alpha", "b": null, "c": [1]});
        assert!(extract(&FieldPath::parse("a.b"), &document).is_absent());
        assert!(extract(&FieldPath::parse("b.c"), &document).is_absent());
        assert!(extract(&FieldPath::parse("c.d"), &document).is_absent());
        assert!(extract(&FieldPath::parse("a[]"), &document).is_absent());
    }

    #[test]
    fn should_report_field_missing_in_some_elements_as_incomplete() {
        let document = json!({"a": [{"b": 1}, {"c": 2}]});
        let extracted = extract(&FieldPath::parse("a[].b"), &document);
        let matches = extracted.matches().expect("should match");
        assert_eq!(matches.len(), 1);
        assert!(!matches.is_complete());
        assert!(!has_field(&FieldPath::parse("a[].b"), &document));
        assert!(has_field(&FieldPath::parse("a[].b"), &json!({"a": [{"b": null}]})));
    }

    #[test]
    fn should_match_root_with_empty_path() {
        let document = json!({"a": 1});
        assert_eq!(values("", &document), vec![&document]);
        assert_eq!(pointers("", &document), vec![""]);
    }

    #[test]
    fn should_escape_pointer_tokens() {
        let document = json!({"a/b": {"c.d": 1}});
        assert_eq!(pointers("a/b.['c.d']", &document), vec!["/a~1b/c.d"]);
    }

    #[test]
    fn should_match_identically_when_repeated() {
        let document = json!({"a": [{"b": [1, {"c": 2}]}, {"b": "x"}]});
        let path = FieldPath::parse("a[].b[]");
        assert_eq!(extract(&path, &document), extract(&path, &document));
    }
}
