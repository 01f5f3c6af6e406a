//! Documentation of the fields of a request or response payload.
//!
//! A [`FieldsSnippet`] checks a captured payload against its descriptors and
//! produces the [`FieldsTable`] a template renders. Documentation is strict by
//! default: a required field missing from the payload, or a part of the
//! payload no descriptor covers, fails the snippet.

use mime::Mime;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::descriptor::FieldDescriptor;
use crate::error::PayloadError;
use crate::missing::MissingFieldDetector;
use crate::payload::{JsonFieldType, JsonPayload};
use crate::resolver::FieldTypeResolver;
use crate::subsection::SubsectionExtractor;
use crate::undocumented::find_undocumented_content;

static EMPTY: Value = Value::Null;

/// Documents the fields of a JSON payload.
///
/// ```rust
/// use clawdoc_core::{FieldDescriptor, FieldsSnippet, JsonFieldType};
///
/// let snippet = FieldsSnippet::new([
///     FieldDescriptor::new("id").described_as("The id"),
///     FieldDescriptor::new("tags[]")
///         .optional()
///         .of_type(JsonFieldType::String),
/// ])
/// .and([FieldDescriptor::new("tags")]);
///
/// let table = snippet
///     .document(br#"{"id": 42, "tags": []}"#, None)
///     .expect("fields are documented");
///
/// assert_eq!(table.fields.len(), 3);
/// assert_eq!(table.fields[0].field_type, JsonFieldType::Number);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldsSnippet {
    descriptors: Vec<FieldDescriptor>,
    relaxed: bool,
    subsection: Option<SubsectionExtractor>,
}

impl FieldsSnippet {
    /// Documents the fields described by `descriptors`.
    pub fn new(descriptors: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        Self {
            descriptors: descriptors.into_iter().collect(),
            relaxed: false,
            subsection: None,
        }
    }

    /// Tolerates parts of the payload that are not documented.
    ///
    /// Documented required fields must still be present.
    #[must_use]
    pub fn relaxed(mut self) -> Self {
        self.relaxed = true;
        self
    }

    /// Adds more descriptors.
    #[must_use]
    pub fn and(mut self, descriptors: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.descriptors.extend(descriptors);
        self
    }

    /// Documents the subsection extracted by `extractor` instead of the whole payload.
    ///
    /// The descriptor paths are then relative to the subsection.
    #[must_use]
    pub fn beneath(mut self, extractor: SubsectionExtractor) -> Self {
        self.subsection = Some(extractor);
        self
    }

    /// The descriptors, in declaration order.
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// Whether undocumented content is tolerated.
    pub fn is_relaxed(&self) -> bool {
        self.relaxed
    }

    /// Documents a captured payload.
    ///
    /// An empty payload documents nothing: only optional fields are then
    /// satisfied.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the payload cannot be parsed, or the subsection cannot be extracted
    /// - required fields are missing or content is undocumented
    /// - the type of a documented field cannot be resolved
    pub fn document(
        &self,
        payload: &[u8],
        content_type: Option<&Mime>,
    ) -> Result<FieldsTable, PayloadError> {
        let parsed;
        let document = if payload.is_empty() {
            &EMPTY
        } else {
            parsed = JsonPayload::parse(payload, content_type)?;
            match &self.subsection {
                Some(extractor) => extractor.extract_value(&parsed, &self.descriptors)?,
                None => parsed.value(),
            }
        };

        self.verify(document, payload.is_empty())?;

        let resolver = FieldTypeResolver::new(document, &self.descriptors);
        let fields = self
            .descriptors
            .iter()
            .filter(|descriptor| !descriptor.is_ignored())
            .map(|descriptor| {
                let field_type = resolver.resolve_field_type(descriptor)?;
                Ok(FieldRow {
                    path: descriptor.raw_path().to_string(),
                    field_type,
                    description: descriptor.description().map(str::to_string),
                    optional: descriptor.is_optional(),
                })
            })
            .collect::<Result<Vec<_>, PayloadError>>()?;

        Ok(FieldsTable {
            subsection_id: self
                .subsection
                .as_ref()
                .map(|extractor| extractor.subsection_id().to_string()),
            fields,
        })
    }

    fn verify(&self, document: &Value, empty: bool) -> Result<(), PayloadError> {
        let missing = MissingFieldDetector::new(document, &self.descriptors)
            .find_missing()
            .into_iter()
            .map(|descriptor| descriptor.raw_path().to_string())
            .collect::<Vec<_>>();

        let undocumented = if self.relaxed || empty {
            None
        } else {
            find_undocumented_content(document, &self.descriptors)
                .map(|remainder| serde_json::to_string_pretty(&remainder))
                .transpose()?
        };

        if missing.is_empty() && undocumented.is_none() {
            debug!(fields = self.descriptors.len(), "payload fields documented");
            return Ok(());
        }
        warn!(?missing, undocumented = undocumented.is_some(), "payload fields not documented");
        Err(PayloadError::FieldsNotDocumented {
            missing,
            undocumented,
        })
    }
}

/// The documented fields of a payload, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldsTable {
    /// Identifier of the documented subsection, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsection_id: Option<String>,
    /// One row per documented field, in declaration order.
    pub fields: Vec<FieldRow>,
}

/// One documented field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    /// The path as written in the descriptor.
    pub path: String,
    /// The declared or resolved type.
    #[serde(rename = "type")]
    pub field_type: JsonFieldType,
    /// The description, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the field may be absent or `null`.
    pub optional: bool,
}
