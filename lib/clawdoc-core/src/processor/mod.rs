//! Evaluation of field paths against a JSON document.
//!
//! Matching walks the document depth-first, one segment at a time, branching
//! once per element whenever it meets `[]`. Matches are returned in document
//! order together with their concrete location as a JSON Pointer (RFC 6901),
//! e.g. `a[].id` may match `/a/0/id` and `/a/1/id`.
//!
//! Matching never fails: a path denoting nothing yields [`ExtractedField::Absent`].

mod matcher;
mod remove;

pub use self::matcher::{ExtractedField, FieldMatch, Matches, extract, has_field};
pub(crate) use self::remove::{is_hollow, remove, remove_subsection};
