//! # Clawdoc Core
//!
//! Document the JSON payloads of your HTTP API from your test code.
//!
//! Fields are declared with [`FieldDescriptor`]s using a small path language
//! (`user.name`, `items[].id`, `metadata.*`). The engine then checks a captured
//! payload against them:
//!
//! - **[`MissingFieldDetector`]** - required fields absent from the payload
//! - **[`find_undocumented_content`]** - parts of the payload nobody documented
//! - **[`FieldTypeResolver`]** - the type to document for each field
//! - **[`SubsectionExtractor`]** - the part of a payload beneath a path, to be
//!   documented on its own
//!
//! [`FieldsSnippet`] ties everything together and produces the table a
//! documentation template renders.
//!
//! ## Quick Start
//!
//! ```rust
//! use clawdoc_core::{FieldDescriptor, FieldsSnippet, JsonFieldType};
//!
//! let response = br#"{
//!   "id": 42,
//!   "items": [
//!     {"name": "first", "price": 3.5},
//!     {"name": "second", "price": null}
//!   ]
//! }"#;
//!
//! let snippet = FieldsSnippet::new([
//!     FieldDescriptor::new("id").described_as("The order id"),
//!     FieldDescriptor::new("items").described_as("The ordered items"),
//!     FieldDescriptor::new("items[].name").described_as("The item name"),
//!     FieldDescriptor::new("items[].price").optional(),
//! ]);
//!
//! let table = snippet.document(response, None)?;
//!
//! assert_eq!(table.fields[3].field_type, JsonFieldType::Number);
//! # Ok::<(), clawdoc_core::PayloadError>(())
//! ```
//!
//! ## Path language
//!
//! | Path            | Matches                                        |
//! |-----------------|------------------------------------------------|
//! | `a.b`           | the key `b` of the object at `a`               |
//! | `a[].b`, `a.[].b` | the key `b` of every element of the array `a` |
//! | `a.*`           | whatever lies at `a`, with everything beneath  |
//! | `a['b.c']`      | the key `b.c` of the object at `a`             |
//!
//! A field reached through an array is present only when every element has it.
//! Mark it [`optional`](FieldDescriptor::optional) otherwise.
//!
//! ## Features
//!
//! - `yaml` - render documentation tables as YAML with `ToYaml`

mod descriptor;
mod error;
mod missing;
mod path;
mod payload;
mod processor;
mod resolver;
mod snippet;
mod subsection;
mod undocumented;

#[cfg(feature = "yaml")]
mod yaml;

pub use self::descriptor::{FieldDescriptor, apply_path_prefix};
pub use self::error::PayloadError;
pub use self::missing::MissingFieldDetector;
pub use self::path::{FieldPath, Segment};
pub use self::payload::{JsonFieldType, JsonPayload};
pub use self::processor::{ExtractedField, FieldMatch, Matches, extract, has_field};
pub use self::resolver::FieldTypeResolver;
pub use self::snippet::{FieldRow, FieldsSnippet, FieldsTable};
pub use self::subsection::SubsectionExtractor;
pub use self::undocumented::find_undocumented_content;
#[cfg(feature = "yaml")]
pub use self::yaml::{ToYaml, YamlError};
