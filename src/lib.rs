//! # codable
//!
//! Structured serialization through a container model: typed records
//! negotiate with a generic document tree field by field, instead of
//! mapping one-to-one onto it.
//!
//! ## The model
//!
//! A document is parsed whole into a [`Value`] tree. A record's [`Decode`]
//! impl is handed a [`Decoder`] over the root and asks it for views:
//!
//! - [`KeyedDecoder`] over a mapping: required and optional fields, nested
//!   views under a key, every key present (for id-keyed collections)
//! - [`SeqDecoder`] over a sequence: a forward cursor of typed reads
//!
//! Encoding is the mirror image through [`Encoder`], [`KeyedEncoder`] and
//! [`SeqEncoder`], which build the tree that is then printed.
//!
//! Every view carries its [`CodingPath`] for error messages, and the caller's
//! [`CodecContext`] for configuration that is not part of the data, such as
//! the API version a payload was produced for.
//!
//! ## Quick Start
//!
//! ```rust
//! use codable::{from_str, to_string, Decode, DecodeResult, Decoder, Encode, EncodeResult, Encoder};
//!
//! #[derive(Debug, PartialEq)]
//! struct Student {
//!     name: String,
//!     born_in: u32,
//! }
//!
//! impl Decode for Student {
//!     fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
//!         let keyed = decoder.keyed()?;
//!         Ok(Student {
//!             name: keyed.get_required("name")?,
//!             born_in: keyed.get_required("born_in")?,
//!         })
//!     }
//! }
//!
//! impl Encode for Student {
//!     fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
//!         let mut keyed = encoder.keyed();
//!         keyed.set_value("name", &self.name)?;
//!         keyed.set_value("born_in", &self.born_in)
//!     }
//! }
//!
//! let json = r#"{"name":"Jone","born_in":1999}"#;
//! let stu: Student = from_str(json).unwrap();
//! assert_eq!(stu, Student { name: "Jone".into(), born_in: 1999 });
//! assert_eq!(to_string(&stu).unwrap(), json);
//! ```
//!
//! ### Errors point at the data
//!
//! ```rust
//! use codable::{from_str, DecodeError, Key};
//! # use codable::{Decode, DecodeResult, Decoder};
//! # struct Named(String);
//! # impl Decode for Named {
//! #     fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
//! #         Ok(Named(decoder.keyed()?.get_required("name")?))
//! #     }
//! # }
//!
//! let err = from_str::<Vec<Named>>(r#"[{"name":"A"},{}]"#).err().unwrap();
//! assert_eq!(err.to_string(), "key `name` not found at $[1]");
//! assert!(matches!(err, DecodeError::KeyMissing { ref key, .. } if *key == Key::from("name")));
//! ```
//!
//! ### Building trees by hand
//!
//! ```rust
//! use codable::{value, from_value};
//!
//! let tree = value!({ "1": { "name": "A" }, "2": { "name": "B" } });
//! let names: std::collections::BTreeMap<String, std::collections::BTreeMap<String, String>> =
//!     from_value(&tree).unwrap();
//! assert_eq!(names["2"]["name"], "B");
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Nesting is capped on both sides ([`DecodeOptions::max_depth`],
//!   [`EncodeOptions::max_depth`]), so hostile documents fail with an error
//!   instead of exhausting the stack
//! - No panics in public API (except for logic errors that indicate bugs)

pub mod bytes;
pub mod codec;
pub mod context;
pub mod de;
pub mod driver;
pub mod error;
pub mod format;
pub mod key;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod value;

pub use bytes::Bytes;
pub use codec::{Codable, FnCodec, TypeCodec};
pub use context::{CodecContext, ContextKey};
pub use de::{Decode, Decoder, KeyedDecoder, SeqDecoder};
pub use driver::{DecodeDriver, EncodeDriver};
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
pub use format::{Format, Json};
pub use key::{CodingPath, Key, PathSegment, SUPER_KEY};
pub use map::Map;
pub use options::{
    DataStrategy, DateStrategy, DecodeOptions, EncodeOptions, Formatting, NonConformingFloat,
};
pub use ser::{Encode, Encoder, KeyedEncoder, SeqEncoder};
pub use value::{Kind, Number, Value};

fn utf8(bytes: Vec<u8>) -> EncodeResult<String> {
    String::from_utf8(bytes).map_err(|e| EncodeError::invalid_value(e, CodingPath::root()))
}

/// Decodes a JSON document with an explicit codec.
///
/// # Errors
///
/// `DataCorrupted` for malformed input, otherwise whatever the codec
/// reports.
pub fn decode<T, C>(bytes: &[u8], codec: &C) -> DecodeResult<T>
where
    C: TypeCodec<T> + ?Sized,
{
    decode_with(bytes, codec, &CodecContext::new(), &DecodeOptions::default())
}

/// Decodes a JSON document with an explicit codec, context and options.
///
/// # Examples
///
/// ```rust
/// use codable::{decode_with, CodecContext, ContextKey, DateStrategy, DecodeOptions, FnCodec};
///
/// const FORMAT: ContextKey<String> = ContextKey::new("dateFormat");
///
/// let codec = FnCodec::new(
///     |decoder| {
///         let format = decoder.require_context(FORMAT)?;
///         decoder.decode_date_with(&DateStrategy::formatted(format.as_str()))
///     },
///     |date: &chrono::DateTime<chrono::Utc>, encoder| encoder.encode_value(date),
/// );
///
/// let cx = CodecContext::new().with(FORMAT, "%Y-%m-%d %H:%M:%S".to_string());
/// let date = decode_with(br#""2017-11-14 09:27:35""#, &codec, &cx, &DecodeOptions::default())
///     .unwrap();
/// assert_eq!(date.timestamp(), 1510651655);
/// ```
///
/// # Errors
///
/// As [`decode`].
pub fn decode_with<T, C>(
    bytes: &[u8],
    codec: &C,
    cx: &CodecContext,
    options: &DecodeOptions,
) -> DecodeResult<T>
where
    C: TypeCodec<T> + ?Sized,
{
    driver::decode_bytes(&Json, bytes, cx, options, |decoder| codec.decode(decoder))
}

/// Encodes a record to compact JSON with an explicit codec.
///
/// # Errors
///
/// `InvalidValue` for values JSON cannot represent, otherwise whatever the
/// codec reports.
pub fn encode<T, C>(value: &T, codec: &C) -> EncodeResult<Vec<u8>>
where
    C: TypeCodec<T> + ?Sized,
{
    encode_with(value, codec, &CodecContext::new(), &EncodeOptions::default())
}

/// Encodes a record to JSON with an explicit codec, context and options.
///
/// # Errors
///
/// As [`encode`].
pub fn encode_with<T, C>(
    value: &T,
    codec: &C,
    cx: &CodecContext,
    options: &EncodeOptions,
) -> EncodeResult<Vec<u8>>
where
    C: TypeCodec<T> + ?Sized,
{
    driver::encode_bytes(&Json, cx, options, |encoder| codec.encode(value, encoder))
}

/// Decodes `T` from JSON bytes through its [`Decode`] impl.
///
/// # Errors
///
/// `DataCorrupted` for input that is not UTF-8 JSON, otherwise whatever
/// `T::decode` reports.
pub fn from_slice<T: Decode>(bytes: &[u8]) -> DecodeResult<T> {
    driver::decode_bytes(
        &Json,
        bytes,
        &CodecContext::new(),
        &DecodeOptions::default(),
        T::decode,
    )
}

/// Decodes `T` from JSON text through its [`Decode`] impl.
///
/// ```rust
/// use codable::from_str;
///
/// let scores: Vec<f32> = from_str("[78.0, 89.5, 0.65]").unwrap();
/// assert_eq!(scores[2], 0.65);
/// ```
///
/// # Errors
///
/// As [`from_slice`].
pub fn from_str<T: Decode>(s: &str) -> DecodeResult<T> {
    from_slice(s.as_bytes())
}

/// Decodes `T` from an already built tree.
///
/// # Errors
///
/// Whatever `T::decode` reports.
pub fn from_value<T: Decode>(value: &Value) -> DecodeResult<T> {
    driver::decode_tree(
        value,
        &CodecContext::new(),
        &DecodeOptions::default(),
        T::decode,
    )
}

/// Encodes `value` to compact JSON through its [`Encode`] impl.
///
/// # Errors
///
/// `InvalidValue` for values JSON cannot represent, otherwise whatever the
/// `Encode` impl reports.
pub fn to_vec<T: Encode + ?Sized>(value: &T) -> EncodeResult<Vec<u8>> {
    to_vec_with_options(value, &EncodeOptions::default())
}

/// Encodes `value` to JSON indented by two spaces.
///
/// # Errors
///
/// As [`to_vec`].
pub fn to_vec_pretty<T: Encode + ?Sized>(value: &T) -> EncodeResult<Vec<u8>> {
    to_vec_with_options(value, &EncodeOptions::pretty())
}

/// Encodes `value` to JSON with custom options.
///
/// # Errors
///
/// As [`to_vec`].
pub fn to_vec_with_options<T: Encode + ?Sized>(
    value: &T,
    options: &EncodeOptions,
) -> EncodeResult<Vec<u8>> {
    driver::encode_bytes(&Json, &CodecContext::new(), options, |encoder| {
        value.encode(encoder)
    })
}

/// Encodes `value` to a compact JSON string.
///
/// # Errors
///
/// As [`to_vec`].
pub fn to_string<T: Encode + ?Sized>(value: &T) -> EncodeResult<String> {
    utf8(to_vec(value)?)
}

/// Encodes `value` to a JSON string indented by two spaces.
///
/// ```rust
/// use codable::to_string_pretty;
///
/// assert_eq!(to_string_pretty(&vec!["A"]).unwrap(), "[\n  \"A\"\n]");
/// ```
///
/// # Errors
///
/// As [`to_vec`].
pub fn to_string_pretty<T: Encode + ?Sized>(value: &T) -> EncodeResult<String> {
    utf8(to_vec_pretty(value)?)
}

/// Encodes `value` into a tree without printing it.
///
/// # Errors
///
/// Whatever the `Encode` impl reports. Non-finite floats are only rejected
/// when the tree is printed.
pub fn to_value<T: Encode + ?Sized>(value: &T) -> EncodeResult<Value> {
    driver::encode_tree(&CodecContext::new(), &EncodeOptions::default(), |encoder| {
        value.encode(encoder)
    })
}
