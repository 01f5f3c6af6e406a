//! Descriptions of the fields expected in a payload.

use std::sync::Arc;

use crate::path::FieldPath;
use crate::payload::JsonFieldType;

/// Declares one expected field of a JSON payload.
///
/// Descriptors are built with chained calls and are immutable once handed to
/// the engine. Marking a field optional cannot be undone.
///
/// ```rust
/// use clawdoc_core::{FieldDescriptor, JsonFieldType};
///
/// let descriptor = FieldDescriptor::new("items[].id")
///     .of_type(JsonFieldType::Number)
///     .described_as("The id of the item")
///     .optional();
///
/// assert!(descriptor.is_optional());
/// assert_eq!(descriptor.field_type(), Some(JsonFieldType::Number));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    raw_path: String,
    path: Arc<FieldPath>,
    optional: bool,
    field_type: Option<JsonFieldType>,
    description: Option<String>,
    ignored: bool,
    subsection: bool,
}

impl FieldDescriptor {
    /// Describes the field at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        let raw_path = path.into();
        Self {
            path: FieldPath::compile(&raw_path),
            ..Self::uncompiled(raw_path)
        }
    }

    /// Describes a required field at an already compiled path, bypassing the cache.
    pub(crate) fn for_path(path: &FieldPath) -> Self {
        Self {
            path: Arc::new(path.clone()),
            ..Self::uncompiled(path.to_string())
        }
    }

    fn uncompiled(raw_path: String) -> Self {
        Self {
            raw_path,
            path: Arc::default(),
            optional: false,
            field_type: None,
            description: None,
            ignored: false,
            subsection: false,
        }
    }

    /// Describes the field at `path` and everything beneath it.
    ///
    /// Nothing nested inside a documented subsection is reported as undocumented.
    pub fn subsection_with_path(path: impl Into<String>) -> Self {
        Self {
            subsection: true,
            ..Self::new(path)
        }
    }

    /// Marks the field as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Declares the type of the field instead of resolving it from the payload.
    #[must_use]
    pub fn of_type(mut self, field_type: JsonFieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Sets the description shown in the documentation.
    #[must_use]
    pub fn described_as(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Keeps the field out of the documentation while still counting it as documented.
    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// The path as written by the caller.
    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    /// The compiled path.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Whether the field may be absent or `null`.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// The declared type, if any.
    pub fn field_type(&self) -> Option<JsonFieldType> {
        self.field_type
    }

    /// The description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the field is left out of the documentation.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Whether the descriptor covers everything beneath its path.
    pub fn is_subsection(&self) -> bool {
        self.subsection
    }

    /// A copy of this descriptor with `prefix` prepended to its path.
    ///
    /// The prefixed path is compiled on its own, outside the shared cache.
    #[must_use]
    pub fn with_path_prefix(&self, prefix: &str) -> Self {
        let raw_path = format!("{prefix}{}", self.raw_path);
        Self {
            path: Arc::new(FieldPath::parse(&raw_path)),
            raw_path,
            description: self.description.clone(),
            ..*self
        }
    }
}

/// Prepends `prefix` to the path of every descriptor.
///
/// ```rust
/// use clawdoc_core::{FieldDescriptor, apply_path_prefix};
///
/// let descriptors = apply_path_prefix("user.", &[FieldDescriptor::new("name").optional()]);
///
/// assert_eq!(descriptors[0].raw_path(), "user.name");
/// assert!(descriptors[0].is_optional());
/// ```
pub fn apply_path_prefix(prefix: &str, descriptors: &[FieldDescriptor]) -> Vec<FieldDescriptor> {
    descriptors
        .iter()
        .map(|descriptor| descriptor.with_path_prefix(prefix))
        .collect()
}
