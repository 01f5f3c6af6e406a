//! Parsed JSON payloads.
//!
//! A [`JsonPayload`] is built once per captured request or response body and is
//! never mutated afterwards. It remembers the charset of the raw bytes and
//! whether they were pretty-printed so that extracted subsections can be
//! written back the same way.

use std::fmt::Write as _;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use mime::Mime;
use serde_json::Value;
use tracing::debug;

mod field_type;

pub use self::field_type::JsonFieldType;
use crate::error::PayloadError;

/// A parsed JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPayload {
    value: Value,
    pretty: bool,
    encoding: &'static Encoding,
}

impl JsonPayload {
    /// Parses raw payload bytes.
    ///
    /// The bytes are decoded with the `charset` parameter of the content type,
    /// UTF-8 when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the content type declares an unknown charset
    /// - the bytes are not valid in the charset
    /// - the decoded text is not valid JSON
    pub fn parse(bytes: &[u8], content_type: Option<&Mime>) -> Result<Self, PayloadError> {
        let encoding = declared_encoding(content_type)?;
        let text = encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or_else(|| PayloadError::UndecodableContent {
                charset: encoding.name().to_string(),
            })?;
        let value =
            serde_json::from_str(&text).map_err(|error| PayloadError::MalformedContent { error })?;
        Ok(Self {
            value,
            pretty: text.contains('\n'),
            encoding,
        })
    }

    /// Wraps an already parsed value, written back compactly in UTF-8.
    pub fn from_value(value: Value) -> Self {
        Self {
            value,
            pretty: false,
            encoding: UTF_8,
        }
    }

    /// The document root.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether the raw payload contained a line break.
    pub fn is_pretty_printed(&self) -> bool {
        self.pretty
    }

    /// The charset the payload was read with.
    pub fn charset(&self) -> &'static str {
        self.encoding.name()
    }

    /// Serializes a value taken from this payload in the payload charset,
    /// pretty-printed if the payload itself was.
    ///
    /// Characters the charset cannot represent are written as JSON escapes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self, value: &Value) -> Result<Vec<u8>, PayloadError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(encode(self.encoding, text))
    }
}

fn declared_encoding(content_type: Option<&Mime>) -> Result<&'static Encoding, PayloadError> {
    let Some(charset) = content_type.and_then(|mime| mime.get_param(mime::CHARSET)) else {
        return Ok(UTF_8);
    };
    Encoding::for_label(charset.as_str().as_bytes()).ok_or_else(|| {
        PayloadError::UnsupportedCharset {
            charset: charset.to_string(),
        }
    })
}

fn encode(encoding: &'static Encoding, text: String) -> Vec<u8> {
    if encoding == UTF_8 {
        return text.into_bytes();
    }
    // encoding_rs writes UTF-16 as UTF-8
    if encoding == UTF_16LE {
        return text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    }
    if encoding == UTF_16BE {
        return text.encode_utf16().flat_map(u16::to_be_bytes).collect();
    }

    let (bytes, _, unmappable) = encoding.encode(&text);
    if !unmappable {
        return bytes.into_owned();
    }
    debug!(charset = encoding.name(), "escaping characters the charset cannot represent");
    let escaped = escape_non_ascii(&text);
    let (bytes, _, _) = encoding.encode(&escaped);
    bytes.into_owned()
}

/// Replaces non-ASCII characters with `\uXXXX` escapes.
///
/// Outside strings JSON text is ASCII, so the result stays equivalent.
fn escape_non_ascii(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() {
            escaped.push(ch);
        } else {
            let mut units = [0; 2];
            for unit in ch.encode_utf16(&mut units) {
                let _ = write!(escaped, "\\u{unit:04x}");
            }
        }
    }
    escaped
}
