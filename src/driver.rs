//! Top-level conversion: bytes in, record out, and back.
//!
//! A conversion parses the whole document through a [`Format`], hands the
//! root of the tree to a codec with the caller's [`CodecContext`] and
//! options, and returns the codec's result unchanged. Encoding runs the same
//! steps in reverse over an empty root slot.
//!
//! [`DecodeDriver`] and [`EncodeDriver`] bundle a format, options and a
//! context for reuse across calls:
//!
//! ```rust
//! use codable::{ContextKey, DecodeDriver, DecodeResult, Decode, Decoder};
//!
//! const UNIT: ContextKey<&'static str> = ContextKey::new("unit");
//!
//! struct Length(String);
//!
//! impl Decode for Length {
//!     fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
//!         let unit = decoder.require_context(UNIT)?;
//!         let n: f64 = decoder.decode()?;
//!         Ok(Length(format!("{}{}", n, unit)))
//!     }
//! }
//!
//! let driver = DecodeDriver::new().with_context_value(UNIT, "cm");
//! let lengths: Vec<Length> = driver.decode(b"[1.5, 20]").unwrap();
//! assert_eq!(lengths[1].0, "20cm");
//!
//! let err = DecodeDriver::new().decode::<Length>(b"1").err().unwrap();
//! assert!(err.is_contract_violation());
//! ```

use crate::codec::TypeCodec;
use crate::de::{Decode, Decoder};
use crate::error::{DecodeResult, EncodeResult};
use crate::format::{Format, Json};
use crate::ser::{Encode, Encoder};
use crate::{CodecContext, ContextKey, DecodeOptions, EncodeOptions, Value};

pub(crate) fn decode_tree<T>(
    root: &Value,
    cx: &CodecContext,
    options: &DecodeOptions,
    read: impl FnOnce(&Decoder<'_>) -> DecodeResult<T>,
) -> DecodeResult<T> {
    read(&Decoder::new(root, cx, options))
}

pub(crate) fn decode_bytes<F, T>(
    format: &F,
    bytes: &[u8],
    cx: &CodecContext,
    options: &DecodeOptions,
    read: impl FnOnce(&Decoder<'_>) -> DecodeResult<T>,
) -> DecodeResult<T>
where
    F: Format + ?Sized,
{
    log::debug!("decoding {} bytes", bytes.len());
    let root = format.parse(bytes)?;
    log::debug!("parsed {} root, {} levels deep", root.kind(), root.depth());
    decode_tree(&root, cx, options, read)
}

pub(crate) fn encode_tree(
    cx: &CodecContext,
    options: &EncodeOptions,
    write: impl FnOnce(Encoder<'_>) -> EncodeResult<()>,
) -> EncodeResult<Value> {
    let mut root = Value::Null;
    write(Encoder::new(&mut root, cx, options))?;
    Ok(root)
}

pub(crate) fn encode_bytes<F>(
    format: &F,
    cx: &CodecContext,
    options: &EncodeOptions,
    write: impl FnOnce(Encoder<'_>) -> EncodeResult<()>,
) -> EncodeResult<Vec<u8>>
where
    F: Format + ?Sized,
{
    let root = encode_tree(cx, options, write)?;
    let bytes = format.print(&root, options)?;
    log::debug!("encoded {} root into {} bytes", root.kind(), bytes.len());
    Ok(bytes)
}

/// A reusable decoding configuration.
#[derive(Debug, Default)]
pub struct DecodeDriver<F = Json> {
    format: F,
    options: DecodeOptions,
    context: CodecContext,
}

impl DecodeDriver {
    /// A JSON driver with default options and an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: Format> DecodeDriver<F> {
    #[must_use]
    pub fn with_format(format: F) -> Self {
        DecodeDriver {
            format,
            options: DecodeOptions::default(),
            context: CodecContext::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the whole context.
    #[must_use]
    pub fn with_context(mut self, context: CodecContext) -> Self {
        self.context = context;
        self
    }

    /// Adds one context entry.
    #[must_use]
    pub fn with_context_value<T: 'static>(mut self, key: ContextKey<T>, value: T) -> Self {
        self.context.set(key, value);
        self
    }

    #[must_use]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    #[must_use]
    pub fn context(&self) -> &CodecContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut CodecContext {
        &mut self.context
    }

    /// Decodes a document with `T`'s own [`Decode`] impl.
    pub fn decode<T: Decode>(&self, bytes: &[u8]) -> DecodeResult<T> {
        decode_bytes(&self.format, bytes, &self.context, &self.options, T::decode)
    }

    /// Decodes a document with an explicit codec.
    pub fn decode_with<T, C>(&self, bytes: &[u8], codec: &C) -> DecodeResult<T>
    where
        C: TypeCodec<T> + ?Sized,
    {
        decode_bytes(&self.format, bytes, &self.context, &self.options, |decoder| {
            codec.decode(decoder)
        })
    }

    /// Decodes an already parsed tree.
    pub fn decode_value<T: Decode>(&self, root: &Value) -> DecodeResult<T> {
        decode_tree(root, &self.context, &self.options, T::decode)
    }
}

/// A reusable encoding configuration.
///
/// ```rust
/// use codable::EncodeDriver;
/// use std::collections::BTreeMap;
///
/// let driver = EncodeDriver::new().pretty().with_sorted_keys();
/// let scores = BTreeMap::from([("b".to_string(), 2), ("a".to_string(), 1)]);
/// assert_eq!(driver.encode_to_string(&scores).unwrap(), "{\n  \"a\": 1,\n  \"b\": 2\n}");
/// ```
#[derive(Debug, Default)]
pub struct EncodeDriver<F = Json> {
    format: F,
    options: EncodeOptions,
    context: CodecContext,
}

impl EncodeDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: Format> EncodeDriver<F> {
    #[must_use]
    pub fn with_format(format: F) -> Self {
        EncodeDriver {
            format,
            options: EncodeOptions::default(),
            context: CodecContext::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Switches to pretty output with the default indentation.
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.options.formatting = EncodeOptions::pretty().formatting;
        self
    }

    #[must_use]
    pub fn with_sorted_keys(mut self) -> Self {
        self.options.sort_keys = true;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: CodecContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_context_value<T: 'static>(mut self, key: ContextKey<T>, value: T) -> Self {
        self.context.set(key, value);
        self
    }

    #[must_use]
    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    #[must_use]
    pub fn context(&self) -> &CodecContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut CodecContext {
        &mut self.context
    }

    pub fn encode<T: Encode + ?Sized>(&self, value: &T) -> EncodeResult<Vec<u8>> {
        encode_bytes(&self.format, &self.context, &self.options, |encoder| {
            value.encode(encoder)
        })
    }

    pub fn encode_with<T, C>(&self, value: &T, codec: &C) -> EncodeResult<Vec<u8>>
    where
        C: TypeCodec<T> + ?Sized,
    {
        encode_bytes(&self.format, &self.context, &self.options, |encoder| {
            codec.encode(value, encoder)
        })
    }

    /// Encodes to text. Only meaningful for text formats.
    pub fn encode_to_string<T: Encode + ?Sized>(&self, value: &T) -> EncodeResult<String> {
        crate::utf8(self.encode(value)?)
    }

    /// Encodes into a tree without printing it.
    pub fn encode_value<T: Encode + ?Sized>(&self, value: &T) -> EncodeResult<Value> {
        encode_tree(&self.context, &self.options, |encoder| value.encode(encoder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, DateStrategy, DecodeError, EncodeError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_driver_reuses_options() {
        let driver = DecodeDriver::new()
            .with_options(DecodeOptions::new().with_date_strategy(DateStrategy::SecondsSince1970));
        let dates: Vec<chrono::DateTime<Utc>> = driver.decode(b"[0, 1510651655]").unwrap();
        assert_eq!(dates[1], Utc.with_ymd_and_hms(2017, 11, 14, 9, 27, 35).unwrap());
        assert_eq!(driver.options().date_strategy, DateStrategy::SecondsSince1970);
    }

    #[test]
    fn test_decode_value_skips_parsing() {
        let driver = DecodeDriver::new();
        let names: Vec<String> = driver.decode_value(&value!(["A", "B"])).unwrap();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_context_is_mutable_between_calls() {
        const LIMIT: ContextKey<usize> = ContextKey::new("limit");
        let mut driver = EncodeDriver::new();
        driver.context_mut().set(LIMIT, 2);
        assert_eq!(driver.context().get(LIMIT), Some(&2));
    }

    #[test]
    fn test_parse_errors_surface_unchanged() {
        let err = DecodeDriver::new().decode::<i32>(b"{").unwrap_err();
        assert!(matches!(err, DecodeError::DataCorrupted { .. }));

        let err = EncodeDriver::new().encode(&f64::INFINITY).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidValue { .. }));
    }

    #[test]
    fn test_encode_value() {
        let driver = EncodeDriver::new();
        assert_eq!(driver.encode_value(&vec![Some(1), None]).unwrap(), value!([1, null]));
    }
}
