//! Resolution of the documented type of a field.
//!
//! The type of a field is the type of the values its path matches. When the
//! path goes through arrays, the values may disagree:
//!
//! - only `null` values: the type is [`JsonFieldType::Null`]
//! - `null` and one other type: that type if the field, or one of its declared
//!   ancestors, is optional; an error otherwise
//! - several non-null types: [`JsonFieldType::Varies`]
//!
//! A type declared on the descriptor is returned when it agrees with the
//! payload, when the field is absent, or when an optional field is `null`.
//! Any other disagreement is reported as an error; a required field that is
//! only sometimes `null` is then reported with the actual type
//! [`JsonFieldType::Varies`].

use indexmap::IndexSet;
use serde_json::Value;
use tracing::debug;

use crate::descriptor::FieldDescriptor;
use crate::error::PayloadError;
use crate::missing::DeclaredPaths;
use crate::payload::JsonFieldType;
use crate::processor::{ExtractedField, extract};

/// Resolves the types of documented fields against a document.
///
/// ```rust
/// use clawdoc_core::{FieldDescriptor, FieldTypeResolver, JsonFieldType};
/// use serde_json::json;
///
/// let document = json!({"a": [{"id": 1}, {"id": null}]});
/// let descriptors = [FieldDescriptor::new("a[].id").optional()];
///
/// let resolver = FieldTypeResolver::new(&document, &descriptors);
/// let field_type = resolver.resolve_field_type(&descriptors[0]).expect("should resolve");
///
/// assert_eq!(field_type, JsonFieldType::Number);
/// ```
#[derive(Debug)]
pub struct FieldTypeResolver<'a> {
    document: &'a Value,
    declared: DeclaredPaths<'a>,
}

impl<'a> FieldTypeResolver<'a> {
    /// Prepares type resolution; `descriptors` are consulted for optional ancestors.
    pub fn new(document: &'a Value, descriptors: &'a [FieldDescriptor]) -> Self {
        Self {
            document,
            declared: DeclaredPaths::new(descriptors),
        }
    }

    /// Resolves the type of the field described by `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the field is absent and no type is declared
    /// - a required field is `null` at some locations only
    /// - the declared type disagrees with the payload
    pub fn resolve_field_type(
        &self,
        descriptor: &FieldDescriptor,
    ) -> Result<JsonFieldType, PayloadError> {
        let optional =
            descriptor.is_optional() || self.declared.has_optional_ancestor(descriptor.path());
        let extracted = extract(descriptor.path(), self.document);

        let Some(declared) = descriptor.field_type() else {
            let ExtractedField::Present(matches) = extracted else {
                return Err(PayloadError::FieldDoesNotExist {
                    path: descriptor.raw_path().to_string(),
                });
            };
            return match ObservedTypes::from_values(matches.values()).coalesce(optional) {
                Observed::Type(actual) => Ok(actual),
                Observed::SometimesNull(actual) => {
                    debug!(path = %descriptor.path(), %actual, "required field is sometimes null");
                    Err(PayloadError::InconsistentNullability {
                        path: descriptor.raw_path().to_string(),
                        actual,
                    })
                }
            };
        };

        let ExtractedField::Present(matches) = extracted else {
            return Ok(declared);
        };
        if declared == JsonFieldType::Varies {
            return Ok(declared);
        }
        let actual = match ObservedTypes::from_values(matches.values()).coalesce(optional) {
            Observed::Type(actual) => actual,
            Observed::SometimesNull(_) => JsonFieldType::Varies,
        };
        if actual == declared || (optional && actual == JsonFieldType::Null) {
            Ok(declared)
        } else {
            Err(PayloadError::FieldTypesDoNotMatch {
                path: descriptor.raw_path().to_string(),
                declared,
                actual,
            })
        }
    }
}

/// The type a set of matched values collapses to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observed {
    Type(JsonFieldType),
    /// A required field is `null` at some locations and of this type at the others.
    SometimesNull(JsonFieldType),
}

/// The distinct types of the matched values, in order of appearance.
#[derive(Debug, Default)]
struct ObservedTypes(IndexSet<JsonFieldType>);

impl ObservedTypes {
    fn from_values<'v>(values: impl Iterator<Item = &'v Value>) -> Self {
        Self(values.map(JsonFieldType::of).collect())
    }

    fn coalesce(&self, optional: bool) -> Observed {
        let nullable = self.0.contains(&JsonFieldType::Null);
        let mut concrete = self
            .0
            .iter()
            .copied()
            .filter(|field_type| *field_type != JsonFieldType::Null);

        match (concrete.next(), concrete.next()) {
            (None, _) => Observed::Type(JsonFieldType::Null),
            (Some(actual), None) if nullable && !optional => Observed::SometimesNull(actual),
            (Some(actual), None) => Observed::Type(actual),
            (Some(_), Some(_)) => {
                debug!(types = ?self.0, "field type varies");
                Observed::Type(JsonFieldType::Varies)
            }
        }
    }
}
