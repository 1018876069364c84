//! The bytes↔tree boundary.
//!
//! Everything format-specific lives behind [`Format`]; accessors and codecs
//! only ever see a [`Value`]. [`Json`] is the built-in implementation, going
//! through `serde_json` and the `serde` impls on [`Value`].

use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use crate::options::{EncodeOptions, Formatting};
use crate::{CodingPath, Value};
use serde::Serialize;
use std::borrow::Cow;

/// A wire format the drivers can read and write.
pub trait Format {
    /// Parses a complete document.
    ///
    /// # Errors
    ///
    /// `DataCorrupted` at the root path for input that is not a valid
    /// document.
    fn parse(&self, bytes: &[u8]) -> DecodeResult<Value>;

    /// Prints a complete document.
    ///
    /// # Errors
    ///
    /// `InvalidValue` for a tree the format cannot represent.
    fn print(&self, value: &Value, options: &EncodeOptions) -> EncodeResult<Vec<u8>>;
}

/// UTF-8 JSON text.
///
/// Key order of mappings is preserved in both directions unless
/// [`EncodeOptions::sort_keys`] is set.
///
/// ```rust
/// use codable::{EncodeOptions, Format, Json};
///
/// let value = Json.parse(br#"{"b": 1, "a": [true, null]}"#).unwrap();
/// let compact = Json.print(&value, &EncodeOptions::new()).unwrap();
/// assert_eq!(compact, br#"{"b":1,"a":[true,null]}"#);
///
/// let sorted = Json.print(&value, &EncodeOptions::new().with_sorted_keys()).unwrap();
/// assert_eq!(sorted, br#"{"a":[true,null],"b":1}"#);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Json;

impl Format for Json {
    fn parse(&self, bytes: &[u8]) -> DecodeResult<Value> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            DecodeError::data_corrupted(format!("input is not valid UTF-8: {}", e), CodingPath::root())
        })?;
        serde_json::from_str(text).map_err(|e| {
            DecodeError::data_corrupted(format!("invalid JSON: {}", e), CodingPath::root())
        })
    }

    fn print(&self, value: &Value, options: &EncodeOptions) -> EncodeResult<Vec<u8>> {
        let value = if options.sort_keys {
            let mut sorted = value.clone();
            sorted.sort_keys_recursive();
            Cow::Owned(sorted)
        } else {
            Cow::Borrowed(value)
        };

        let mut out = Vec::with_capacity(128);
        let written = match &options.formatting {
            Formatting::Compact => serde_json::to_writer(&mut out, &*value),
            Formatting::Pretty { indent } => {
                let indent = " ".repeat(*indent);
                let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
                let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
                (*value).serialize(&mut serializer)
            }
        };
        written.map_err(|e| EncodeError::invalid_value(e, CodingPath::root()))?;
        Ok(out)
    }
}
