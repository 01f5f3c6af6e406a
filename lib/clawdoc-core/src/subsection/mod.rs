//! Extraction of the part of a payload beneath a field path.
//!
//! A subsection is documented on its own, as if it were a payload. When the
//! path denotes several sections (it goes through `[]`, or it points at an
//! array) they must share a common structure and the first one stands for all
//! of them. A field found in some sections only is tolerated when it is
//! documented as optional, or when it lies beneath an optional field that is
//! absent.

use mime::Mime;
use serde_json::Value;
use tracing::debug;

mod field_paths;

use self::field_paths::uncommon_paths;
use crate::descriptor::FieldDescriptor;
use crate::error::PayloadError;
use crate::missing::MissingFieldDetector;
use crate::path::{FieldPath, Segment};
use crate::payload::JsonPayload;
use crate::processor::{ExtractedField, extract};

/// Extracts the subsection of a JSON payload beneath a field path.
///
/// ```rust
/// use clawdoc_core::{FieldDescriptor, SubsectionExtractor};
///
/// let payload = br#"{"a":[{"b":1},{"b":2,"c":3}]}"#;
/// let extractor = SubsectionExtractor::beneath_path("a");
///
/// let subsection = extractor
///     .extract_subsection(payload, None, &[FieldDescriptor::new("c").optional()])
///     .expect("sections share a common structure");
///
/// assert_eq!(subsection, br#"{"b":1}"#);
/// assert_eq!(extractor.subsection_id(), "beneath-a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsectionExtractor {
    field_path: String,
    subsection_id: String,
}

impl SubsectionExtractor {
    /// Extracts the subsection beneath `path`, identified as `beneath-<path>`.
    pub fn beneath_path(path: impl Into<String>) -> Self {
        let field_path = path.into();
        let subsection_id = format!("beneath-{field_path}");
        Self {
            field_path,
            subsection_id,
        }
    }

    /// Uses another identifier for the subsection.
    #[must_use]
    pub fn with_subsection_id(mut self, subsection_id: impl Into<String>) -> Self {
        self.subsection_id = subsection_id.into();
        self
    }

    /// The path of the extracted subsection.
    pub fn field_path(&self) -> &str {
        &self.field_path
    }

    /// The identifier of the subsection.
    pub fn subsection_id(&self) -> &str {
        &self.subsection_id
    }

    /// Extracts the subsection from raw payload bytes.
    ///
    /// `descriptors` document the subsection, their paths are relative to it.
    /// The result is pretty-printed if the payload was.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the payload is not JSON
    /// - the path matches nothing, or an empty array
    /// - the path matches several sections without a common structure
    pub fn extract_subsection(
        &self,
        payload: &[u8],
        content_type: Option<&Mime>,
        descriptors: &[FieldDescriptor],
    ) -> Result<Vec<u8>, PayloadError> {
        let payload = JsonPayload::parse(payload, content_type)?;
        let subsection = self.extract_value(&payload, descriptors)?;
        payload.to_bytes(subsection)
    }

    /// Extracts the subsection from a parsed payload.
    ///
    /// # Errors
    ///
    /// See [`extract_subsection`](Self::extract_subsection).
    pub fn extract_value<'p>(
        &self,
        payload: &'p JsonPayload,
        descriptors: &[FieldDescriptor],
    ) -> Result<&'p Value, PayloadError> {
        let path = FieldPath::compile(&self.field_path);
        let ExtractedField::Present(matches) = extract(&path, payload.value()) else {
            return Err(PayloadError::SubsectionNotFound {
                path: self.field_path.clone(),
            });
        };

        let (sections_path, sections, prefix) = if path.is_multi() {
            let sections = matches.values().collect::<Vec<_>>();
            (FieldPath::clone(&path), sections, format!("{}.", self.field_path))
        } else {
            match matches.first() {
                Some(Value::Array(items)) => (
                    path.child(Segment::AnyArrayElement),
                    items.iter().collect(),
                    format!("{}.[].", self.field_path),
                ),
                Some(single) => return Ok(single),
                None => {
                    return Err(PayloadError::SubsectionNotFound {
                        path: self.field_path.clone(),
                    });
                }
            }
        };

        let Some(&first) = sections.first() else {
            return Err(PayloadError::EmptySubsection {
                path: self.field_path.clone(),
            });
        };
        if sections.len() == 1 {
            return Ok(first);
        }

        let uncommon =
            required_uncommon_paths(payload, &sections_path, &sections, &prefix, descriptors);
        if uncommon.is_empty() {
            debug!(path = %self.field_path, count = sections.len(), "sections share a common structure");
            Ok(first)
        } else {
            Err(PayloadError::UncommonSubsection {
                path: self.field_path.clone(),
                uncommon,
            })
        }
    }
}

/// Paths found in some sections only that no descriptor excuses, sorted.
fn required_uncommon_paths(
    payload: &JsonPayload,
    sections_path: &FieldPath,
    sections: &[&Value],
    prefix: &str,
    descriptors: &[FieldDescriptor],
) -> Vec<String> {
    let prefixed = descriptors
        .iter()
        .map(|descriptor| descriptor.with_path_prefix(prefix))
        .collect::<Vec<_>>();
    let detector = MissingFieldDetector::new(payload.value(), &prefixed);

    let mut uncommon = uncommon_paths(sections.iter().copied())
        .into_iter()
        .map(|relative| sections_path.join(&relative))
        .filter(|path| {
            let descriptor = prefixed
                .iter()
                .find(|descriptor| descriptor.path() == path)
                .cloned()
                .unwrap_or_else(|| FieldDescriptor::for_path(path));
            detector.is_missing(&descriptor)
        })
        .map(|path| path.to_string())
        .collect::<Vec<_>>();
    uncommon.sort();
    uncommon
}
