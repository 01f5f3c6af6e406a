//! Field paths locating values inside a JSON payload.
//!
//! A field path is a dotted expression where each segment names an object key,
//! with two wildcards:
//!
//! - `[]` - every element of an array (`items[].id` or `items.[].id`)
//! - `*` - as the last segment, whatever lies at that point (`metadata.*`)
//!
//! Keys containing dots can be written with brackets: `a['b.c']`.
//!
//! ```rust
//! use clawdoc_core::{FieldPath, Segment};
//!
//! let path = FieldPath::parse("items[].id");
//! assert_eq!(
//!     path.segments(),
//!     &[
//!         Segment::Name("items".to_string()),
//!         Segment::AnyArrayElement,
//!         Segment::Name("id".to_string()),
//!     ]
//! );
//! assert!(path.is_multi());
//! assert_eq!(path.to_string(), "items.[].id");
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod cache;
mod tokenizer;

use self::tokenizer::Token;

/// A single step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// An object key.
    Name(String),
    /// Every element of an array, written `[]`.
    AnyArrayElement,
    /// The value at this point regardless of its shape, written `*`.
    ///
    /// Only ever produced as the last segment of a path.
    AnyRemainder,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) if name.contains("']") => write!(f, "[\"{name}\"]"),
            Self::Name(name) if needs_brackets(name) => write!(f, "['{name}']"),
            Self::Name(name) => f.write_str(name),
            Self::AnyArrayElement => f.write_str("[]"),
            Self::AnyRemainder => f.write_str("*"),
        }
    }
}

fn needs_brackets(name: &str) -> bool {
    name.is_empty() || name == "*" || name.contains(['.', '[', ']'])
}

/// A compiled field path.
///
/// Paths are values: two paths with the same segments are equal, whatever text
/// they were compiled from (`a[].b` and `a.[].b` are the same path).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Compiles a path, reusing a previously compiled instance for the same text.
    ///
    /// The cache is shared by the whole process and safe to populate from
    /// several threads.
    pub fn compile(text: &str) -> Arc<Self> {
        cache::compile(text)
    }

    #[cfg(test)]
    pub(crate) fn is_cached(text: &str) -> bool {
        cache::is_cached(text)
    }

    /// Compiles a path without going through the cache.
    ///
    /// Compilation never fails: segment boundaries are purely syntactic.
    pub fn parse(text: &str) -> Self {
        let tokens = tokenizer::tokenize(text);
        let last = tokens.len().saturating_sub(1);
        let segments = tokens
            .into_iter()
            .enumerate()
            .map(|(index, token)| match token {
                Token::Bare(name) if name == "*" && index == last => Segment::AnyRemainder,
                Token::Bare(name) | Token::Quoted(name) => Segment::Name(name),
                Token::ArrayElement => Segment::AnyArrayElement,
            })
            .collect();
        Self { segments }
    }

    /// The path matching the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from its segments.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// The segments of this path, outermost first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether this path may denote more than one location.
    pub fn is_multi(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::AnyArrayElement | Segment::AnyRemainder))
    }

    /// Whether `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// The path with one more trailing segment.
    #[must_use]
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// The path made of this path followed by `relative`.
    #[must_use]
    pub fn join(&self, relative: &Self) -> Self {
        Self::from_segments(self.segments.iter().chain(&relative.segments).cloned())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(text))
    }
}

impl From<&str> for FieldPath {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn name(value: &str) -> Segment {
        Segment::Name(value.to_string())
    }

    #[rstest]
    #[case::single_name("a", vec![name("a")])]
    #[case::dotted("a.b.c", vec![name("a"), name("b"), name("c")])]
    #[case::trailing_brackets("a[].c", vec![name("a"), Segment::AnyArrayElement, name("c")])]
    #[case::standalone_brackets("a.[].c", vec![name("a"), Segment::AnyArrayElement, name("c")])]
    #[case::root_array("[]", vec![Segment::AnyArrayElement])]
    #[case::nested_arrays("a[][]", vec![name("a"), Segment::AnyArrayElement, Segment::AnyArrayElement])]
    #[case::remainder("items[].*", vec![name("items"), Segment::AnyArrayElement, Segment::AnyRemainder])]
    #[case::inner_star_is_a_name("a.*.b", vec![name("a"), name("*"), name("b")])]
    #[case::quoted("a['b.c']", vec![name("a"), name("b.c")])]
    #[case::double_quoted("a[\"b.c\"].d", vec![name("a"), name("b.c"), name("d")])]
    #[case::unterminated_quote("a['b.c", vec![name("a"), name("['b.c")])]
    #[case::unterminated_quote_after_dot("a.['b.c", vec![name("a"), name("['b.c")])]
    #[case::leading_dot(".a", vec![name("a")])]
    #[case::empty("", vec![])]
    fn should_compile_segments(#[case] text: &str, #[case] expected: Vec<Segment>) {
        let path = FieldPath::parse(text);
        assert_eq!(path.segments(), expected.as_slice());
    }

    #[test]
    fn should_treat_equivalent_spellings_as_equal() {
        assert_eq!(FieldPath::parse("a[].b"), FieldPath::parse("a.[].b"));
        assert_ne!(FieldPath::parse("a.b"), FieldPath::parse("a.[].b"));
    }

    #[rstest]
    #[case("a.b", false)]
    #[case("a[].b", true)]
    #[case("a.*", true)]
    #[case("", false)]
    fn should_detect_multi_paths(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(FieldPath::parse(text).is_multi(), expected);
    }

    #[rstest]
    #[case("a[].b")]
    #[case("a.['b.c'].d")]
    #[case("items.[].*")]
    #[case("a.['*'].b")]
    #[case("a.[\"x']y.z\"]")]
    #[case("a.['say \"hi\"'].b")]
    fn should_display_canonical_form_that_compiles_back(#[case] text: &str) {
        let path = FieldPath::parse(text);
        let reparsed = FieldPath::parse(&path.to_string());
        assert_eq!(reparsed, path);
    }

    #[test]
    fn should_display_name_with_closing_quote_in_double_quotes() {
        let path = FieldPath::from_segments([name("x']y.z")]);

        insta::assert_snapshot!(path, @r#"["x']y.z"]"#);
        assert_eq!(FieldPath::parse(&path.to_string()), path);
    }

    #[test]
    fn should_display_brackets_as_own_segment() {
        let path = FieldPath::parse("a[].b['c.d']");
        insta::assert_snapshot!(path, @"a.[].b.['c.d']");
    }

    #[test]
    fn should_check_prefixes_by_segment() {
        let path = FieldPath::parse("a.[].b.c");
        assert!(path.starts_with(&FieldPath::parse("a[]")));
        assert!(path.starts_with(&FieldPath::root()));
        assert!(!path.starts_with(&FieldPath::parse("a.b")));
        assert!(!FieldPath::parse("abc").starts_with(&FieldPath::parse("ab")));
    }

    #[test]
    fn should_join_paths() {
        let root = FieldPath::parse("a[]");
        let joined = root.join(&FieldPath::parse("b.c"));
        assert_eq!(joined, FieldPath::parse("a.[].b.c"));
        assert_eq!(root.child(Segment::AnyArrayElement), FieldPath::parse("a[][]"));
    }

    #[test]
    fn should_share_compiled_paths() {
        let first = FieldPath::compile("shared.path[].value");
        let second = FieldPath::compile("shared.path[].value");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, FieldPath::parse("shared.path.[].value"));
    }
}
