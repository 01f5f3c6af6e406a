//! YAML rendering of documentation tables.
//!
//! Only available with the `yaml` feature.
//!
//! ```rust
//! use clawdoc_core::{FieldDescriptor, FieldsSnippet, ToYaml};
//!
//! let table = FieldsSnippet::new([FieldDescriptor::new("id")])
//!     .document(br#"{"id": 1}"#, None)?;
//! let yaml = table.to_yaml()?;
//!
//! assert!(yaml.contains("type: NUMBER"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::Serialize;

use crate::snippet::{FieldRow, FieldsTable};

/// Error raised while rendering a documentation table as YAML.
pub type YamlError = serde_saphyr::ser_error::Error;

/// Documentation tables that render as YAML.
///
/// Rows keep the order of their descriptors and absent descriptions are
/// omitted.
pub trait ToYaml: Serialize + Sized {
    /// Renders the table, or a single row, as a YAML document.
    ///
    /// # Errors
    ///
    /// Returns a [`YamlError`] if the YAML emitter fails.
    fn to_yaml(&self) -> Result<String, YamlError> {
        serde_saphyr::to_string(self)
    }
}

impl ToYaml for FieldsTable {}

impl ToYaml for FieldRow {}
