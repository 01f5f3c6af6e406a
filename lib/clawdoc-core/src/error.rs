use crate::payload::JsonFieldType;

/// Errors raised while documenting a JSON payload.
///
/// All of them are reported synchronously and abort the documentation of the
/// current payload. Messages are meant to be shown verbatim in test output.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum PayloadError {
    /// JSON serialization error.
    ///
    /// Occurs when writing an extracted value back to bytes.
    JsonValueError(serde_json::Error),

    /// The payload is not valid JSON.
    ///
    /// Reported as soon as the payload is parsed, before any path is matched.
    #[display("Cannot handle content as JSON: {error}")]
    #[from(skip)]
    MalformedContent {
        /// The underlying JSON parsing error.
        error: serde_json::Error,
    },

    /// The declared content type names an unknown charset.
    #[display("Unsupported charset '{charset}'")]
    #[from(skip)]
    UnsupportedCharset {
        /// The declared charset.
        charset: String,
    },

    /// The payload bytes are not valid in their charset.
    #[display("Cannot decode content as {charset}")]
    #[from(skip)]
    UndecodableContent {
        /// The charset used to decode the payload.
        charset: String,
    },

    /// The type of a field was requested but the field is not in the payload.
    #[display(
        "Cannot determine the type of the field '{path}' as it is not present in the payload. Please provide a type using FieldDescriptor::of_type"
    )]
    #[from(skip)]
    FieldDoesNotExist {
        /// The path of the field.
        path: String,
    },

    /// The documented type of a field differs from the type found in the payload.
    #[display("The documented type of the field '{path}' is {declared} but the actual type is {actual}")]
    #[from(skip)]
    FieldTypesDoNotMatch {
        /// The path of the field.
        path: String,
        /// The type declared by the descriptor.
        declared: JsonFieldType,
        /// The type resolved from the payload.
        actual: JsonFieldType,
    },

    /// A required field is `null` at some locations and has a type at others.
    #[display(
        "The field '{path}' is sometimes null and sometimes {actual}. Mark it as optional if it may be null"
    )]
    #[from(skip)]
    InconsistentNullability {
        /// The path of the field.
        path: String,
        /// The non-null type found in the payload.
        actual: JsonFieldType,
    },

    /// The subsection path does not match anything.
    #[display("{path} does not identify a section of the payload")]
    #[from(skip)]
    SubsectionNotFound {
        /// The subsection path.
        path: String,
    },

    /// The subsection path matches an empty array.
    #[display("{path} identifies an empty section of the payload")]
    #[from(skip)]
    EmptySubsection {
        /// The subsection path.
        path: String,
    },

    /// The subsection path matches several sections with different structures.
    #[display(
        "{path} identifies multiple sections of the payload and they do not have a common structure. The following non-optional uncommon paths were found: {uncommon:?}"
    )]
    #[from(skip)]
    UncommonSubsection {
        /// The subsection path.
        path: String,
        /// The sorted uncommon paths.
        uncommon: Vec<String>,
    },

    /// Documented fields are missing from the payload, or parts of the payload
    /// are not documented.
    #[display("{}", fields_not_documented_message(missing, undocumented.as_deref()))]
    #[from(skip)]
    FieldsNotDocumented {
        /// Paths of the required fields not found in the payload.
        missing: Vec<String>,
        /// The undocumented remainder of the payload, pretty-printed.
        undocumented: Option<String>,
    },
}

fn fields_not_documented_message(missing: &[String], undocumented: Option<&str>) -> String {
    let mut message = String::new();
    if let Some(undocumented) = undocumented {
        message.push_str("The following parts of the payload were not documented:\n");
        message.push_str(undocumented);
    }
    if !missing.is_empty() {
        if !message.is_empty() {
            message.push('\n');
        }
        message.push_str(&format!(
            "Fields with the following paths were not found in the payload: {missing:?}"
        ));
    }
    message
}
