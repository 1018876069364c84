//! Decoding: typed reads from a [`Value`] tree.
//!
//! A codec receives a root [`Decoder`] and negotiates with the tree through
//! three kinds of lens:
//!
//! - [`Decoder`]: a single value; opens keyed or sequential views of it, or
//!   decodes it directly as a leaf
//! - [`KeyedDecoder`]: a mapping; typed reads by key, key enumeration,
//!   nested views, base-record delegation
//! - [`SeqDecoder`]: a sequence; typed reads in physical order through a
//!   forward-only cursor
//!
//! Every lens carries its [`CodingPath`], the per-call [`CodecContext`] and
//! the [`DecodeOptions`], so a leaf codec deep in the tree can consult them.
//!
//! ## Usage
//!
//! ```rust
//! use codable::{from_str, Decode, DecodeResult, Decoder};
//!
//! #[derive(Debug, PartialEq)]
//! struct Student {
//!     name: String,
//!     age: u32,
//!     born_in: String,
//! }
//!
//! impl Decode for Student {
//!     fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
//!         let keyed = decoder.keyed()?;
//!         Ok(Student {
//!             name: keyed.get_required("name")?,
//!             age: keyed.get_required("age")?,
//!             born_in: keyed.get_required("born_in")?,
//!         })
//!     }
//! }
//!
//! let stu: Student = from_str(r#"{"name":"Jone","age":17,"born_in":"China"}"#).unwrap();
//! assert_eq!(stu.born_in, "China");
//! ```

use crate::codec::TypeCodec;
use crate::error::{DecodeError, DecodeResult};
use crate::key::SUPER_KEY;
use crate::options::{DataStrategy, DateStrategy};
use crate::{CodecContext, CodingPath, ContextKey, DecodeOptions, Key, Kind, Map, Number, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use url::Url;

/// A type that can be read from a [`Decoder`].
pub trait Decode: Sized {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self>;
}

#[derive(Clone, Copy)]
struct DecodeState<'a> {
    cx: &'a CodecContext,
    options: &'a DecodeOptions,
}

/// A lens over one value of the tree.
#[derive(Clone)]
pub struct Decoder<'a> {
    node: &'a Value,
    path: CodingPath,
    state: DecodeState<'a>,
    depth: usize,
}

impl<'a> Decoder<'a> {
    /// Creates the root decoder of a conversion.
    #[must_use]
    pub fn new(node: &'a Value, cx: &'a CodecContext, options: &'a DecodeOptions) -> Self {
        Decoder {
            node,
            path: CodingPath::root(),
            state: DecodeState { cx, options },
            depth: 0,
        }
    }

    fn child(&self, node: &'a Value, path: CodingPath) -> DecodeResult<Decoder<'a>> {
        let depth = self.depth + 1;
        if depth > self.state.options.max_depth {
            return Err(DecodeError::depth_limit(self.state.options.max_depth, path));
        }
        Ok(Decoder {
            node,
            path,
            state: self.state,
            depth,
        })
    }

    /// The raw value under this decoder.
    #[must_use]
    pub fn value(&self) -> &'a Value {
        self.node
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.node.kind()
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.node.is_null()
    }

    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    #[must_use]
    pub fn context(&self) -> &'a CodecContext {
        self.state.cx
    }

    #[must_use]
    pub fn options(&self) -> &'a DecodeOptions {
        self.state.options
    }

    /// Returns a context entry the calling codec cannot work without.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::ContextMissing`] when the caller did not
    /// supply the entry.
    pub fn require_context<T: 'static>(&self, key: ContextKey<T>) -> DecodeResult<&'a T> {
        self.state
            .cx
            .require(key)
            .map_err(DecodeError::context_missing)
    }

    /// Opens a keyed view of this value.
    ///
    /// # Errors
    ///
    /// Fails with `ValueNotFound` on `null` and `TypeMismatch` on any other
    /// non-mapping value.
    pub fn keyed(&self) -> DecodeResult<KeyedDecoder<'a>> {
        match self.node {
            Value::Mapping(map) => Ok(KeyedDecoder {
                decoder: self.clone(),
                map,
            }),
            _ => Err(self.unexpected("mapping")),
        }
    }

    /// Opens a sequential view of this value.
    pub fn sequence(&self) -> DecodeResult<SeqDecoder<'a>> {
        match self.node {
            Value::Sequence(items) => Ok(SeqDecoder {
                decoder: self.clone(),
                items,
                cursor: 0,
            }),
            _ => Err(self.unexpected("sequence")),
        }
    }

    /// Decodes this value as `T`.
    pub fn decode<T: Decode>(&self) -> DecodeResult<T> {
        T::decode(self)
    }

    /// Decodes this value with an explicit codec.
    pub fn decode_with<T, C>(&self, codec: &C) -> DecodeResult<T>
    where
        C: TypeCodec<T> + ?Sized,
    {
        codec.decode(self)
    }

    /// Reads a date with an explicit strategy, ignoring the configured one.
    ///
    /// This is what a codec uses when the representation depends on a
    /// context value such as the API version.
    pub fn decode_date_with(&self, strategy: &DateStrategy) -> DecodeResult<DateTime<Utc>> {
        decode_date(self, strategy)
    }

    /// Reads a byte payload with an explicit strategy, ignoring the
    /// configured one.
    pub fn decode_data_with(&self, strategy: DataStrategy) -> DecodeResult<Vec<u8>> {
        crate::bytes::decode_data(self, strategy)
    }

    /// Returns the number under this decoder.
    pub fn number(&self, expected: &'static str) -> DecodeResult<Number> {
        match self.node {
            Value::Number(n) => Ok(*n),
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Returns the string under this decoder.
    pub fn str(&self, expected: &'static str) -> DecodeResult<&'a str> {
        match self.node {
            Value::String(s) => Ok(s),
            _ => Err(self.unexpected(expected)),
        }
    }

    /// The error for a value of the wrong shape: `ValueNotFound` for `null`,
    /// `TypeMismatch` otherwise.
    #[must_use]
    pub fn unexpected(&self, expected: &'static str) -> DecodeError {
        match self.node {
            Value::Null => DecodeError::value_not_found(expected, self.path.clone()),
            other => DecodeError::type_mismatch(expected, other.kind(), self.path.clone()),
        }
    }

    #[must_use]
    pub fn data_corrupted<T: std::fmt::Display>(&self, reason: T) -> DecodeError {
        DecodeError::data_corrupted(reason, self.path.clone())
    }

    #[must_use]
    pub fn custom_error<T: std::fmt::Display>(&self, message: T) -> DecodeError {
        DecodeError::custom(message, self.path.clone())
    }
}

/// A lens over a mapping.
pub struct KeyedDecoder<'a> {
    decoder: Decoder<'a>,
    map: &'a Map,
}

impl<'a> KeyedDecoder<'a> {
    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.decoder.path
    }

    #[must_use]
    pub fn context(&self) -> &'a CodecContext {
        self.decoder.context()
    }

    pub fn require_context<T: 'static>(&self, key: ContextKey<T>) -> DecodeResult<&'a T> {
        self.decoder.require_context(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        self.map.contains_key(key.as_ref())
    }

    /// Every key physically present, in document order.
    ///
    /// This is how records with data-derived key sets find their entries.
    #[must_use]
    pub fn all_keys(&self) -> Vec<Key> {
        log::trace!("enumerating {} keys at {}", self.map.len(), self.decoder.path);
        self.map.keys().cloned().map(Key::Dynamic).collect()
    }

    /// A single-value decoder for the entry at `key`.
    ///
    /// # Errors
    ///
    /// Fails with `KeyMissing` when the key is absent.
    pub fn decoder_for(&self, key: impl Into<Key>) -> DecodeResult<Decoder<'a>> {
        let key = key.into();
        match self.map.get(key.as_str()) {
            Some(node) => {
                let path = self.decoder.path.child_key(key);
                self.decoder.child(node, path)
            }
            None => Err(DecodeError::key_missing(key, self.decoder.path.clone())),
        }
    }

    /// Decodes the entry at `key`.
    ///
    /// # Errors
    ///
    /// `KeyMissing` when absent, `TypeMismatch` or `ValueNotFound` when the
    /// entry cannot become a `T`.
    pub fn get_required<T: Decode>(&self, key: impl Into<Key>) -> DecodeResult<T> {
        self.decoder_for(key)?.decode()
    }

    /// Decodes the entry at `key`, treating absence and `null` as `None`.
    ///
    /// An entry of the wrong shape is still an error.
    pub fn get_optional<T: Decode>(&self, key: impl Into<Key>) -> DecodeResult<Option<T>> {
        let key = key.into();
        match self.map.get(key.as_str()) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.decoder_for(key)?.decode().map(Some),
        }
    }

    /// Decodes the entry at `key` with an explicit codec.
    pub fn get_with<T, C>(&self, key: impl Into<Key>, codec: &C) -> DecodeResult<T>
    where
        C: TypeCodec<T> + ?Sized,
    {
        codec.decode(&self.decoder_for(key)?)
    }

    pub fn nested_keyed(&self, key: impl Into<Key>) -> DecodeResult<KeyedDecoder<'a>> {
        self.decoder_for(key)?.keyed()
    }

    pub fn nested_sequential(&self, key: impl Into<Key>) -> DecodeResult<SeqDecoder<'a>> {
        self.decoder_for(key)?.sequence()
    }

    /// The decoder a base record reads its own fields from, nested under
    /// `key`.
    pub fn delegate_to_super(&self, key: impl Into<Key>) -> DecodeResult<Decoder<'a>> {
        self.decoder_for(key)
    }

    /// [`delegate_to_super`](Self::delegate_to_super) under `"super"`.
    pub fn super_decoder(&self) -> DecodeResult<Decoder<'a>> {
        self.delegate_to_super(SUPER_KEY)
    }

    /// A decoder over this same mapping, for records that choose to read a
    /// nested record's fields from the parent's own level.
    #[must_use]
    pub fn flatten(&self) -> Decoder<'a> {
        self.decoder.clone()
    }
}

/// A lens over a sequence with a forward-only cursor.
pub struct SeqDecoder<'a> {
    decoder: Decoder<'a>,
    items: &'a [Value],
    cursor: usize,
}

impl<'a> SeqDecoder<'a> {
    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.decoder.path
    }

    #[must_use]
    pub fn context(&self) -> &'a CodecContext {
        self.decoder.context()
    }

    pub fn require_context<T: 'static>(&self, key: ContextKey<T>) -> DecodeResult<&'a T> {
        self.decoder.require_context(key)
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.cursor < self.items.len()
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        !self.has_next()
    }

    /// Index of the next element to be consumed.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.cursor
    }

    fn peek(&self) -> DecodeResult<Decoder<'a>> {
        let path = self.decoder.path.child_index(self.cursor);
        match self.items.get(self.cursor) {
            Some(node) => self.decoder.child(node, path),
            None => Err(DecodeError::end_of_sequence(path)),
        }
    }

    /// Decodes the next element and advances the cursor.
    ///
    /// The cursor only moves when the element decodes, so a failed attempt
    /// may be retried as another type.
    ///
    /// # Errors
    ///
    /// `EndOfSequenceReached` once every element has been consumed.
    pub fn decode_next<T: Decode>(&mut self) -> DecodeResult<T> {
        let value = self.peek()?.decode()?;
        self.cursor += 1;
        Ok(value)
    }

    pub fn decode_next_with<T, C>(&mut self, codec: &C) -> DecodeResult<T>
    where
        C: TypeCodec<T> + ?Sized,
    {
        let value = codec.decode(&self.peek()?)?;
        self.cursor += 1;
        Ok(value)
    }

    /// Consumes the next element as a keyed view.
    pub fn nested_keyed(&mut self) -> DecodeResult<KeyedDecoder<'a>> {
        let keyed = self.peek()?.keyed()?;
        self.cursor += 1;
        Ok(keyed)
    }

    /// Consumes the next element as a sequential view.
    pub fn nested_sequential(&mut self) -> DecodeResult<SeqDecoder<'a>> {
        let seq = self.peek()?.sequence()?;
        self.cursor += 1;
        Ok(seq)
    }

    /// Consumes the next element as a raw decoder.
    pub fn super_decoder(&mut self) -> DecodeResult<Decoder<'a>> {
        let decoder = self.peek()?;
        self.cursor += 1;
        Ok(decoder)
    }
}

impl Decode for bool {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        match decoder.value() {
            Value::Bool(b) => Ok(*b),
            _ => Err(decoder.unexpected("bool")),
        }
    }
}

fn whole_number(n: Number) -> Option<i128> {
    match n {
        Number::Integer(i) => Some(i128::from(i)),
        Number::Unsigned(u) => Some(i128::from(u)),
        Number::Float(f) if f.fract() == 0.0 && f.abs() < 1.7e38 => Some(f as i128),
        Number::Float(_) => None,
    }
}

macro_rules! decode_int {
    ($($ty:ty),*) => {
        $(
            impl Decode for $ty {
                fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
                    let n = decoder.number(stringify!($ty))?;
                    whole_number(n)
                        .and_then(|i| <$ty>::try_from(i).ok())
                        .ok_or_else(|| {
                            decoder.data_corrupted(format!(
                                "number <{}> does not fit in {}",
                                n,
                                stringify!($ty)
                            ))
                        })
                }
            }
        )*
    };
}

decode_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Decode for f64 {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        match decoder.value() {
            Value::Number(n) => Ok(n.as_f64()),
            Value::String(s) => decoder
                .options()
                .non_conforming_float
                .from_text(s)
                .ok_or_else(|| decoder.unexpected("f64")),
            _ => Err(decoder.unexpected("f64")),
        }
    }
}

impl Decode for f32 {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        let value = f64::decode(decoder)?;
        if value.is_finite() && value.abs() > f64::from(f32::MAX) {
            return Err(decoder.data_corrupted(format!("number <{}> does not fit in f32", value)));
        }
        Ok(value as f32)
    }
}

impl Decode for String {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        decoder.str("string").map(str::to_string)
    }
}

impl Decode for char {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        let s = decoder.str("char")?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(decoder.data_corrupted(format!("expected a single character, found {:?}", s))),
        }
    }
}

impl Decode for Value {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        Ok(decoder.value().clone())
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        if decoder.is_null() {
            Ok(None)
        } else {
            T::decode(decoder).map(Some)
        }
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        T::decode(decoder).map(Box::new)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        let mut seq = decoder.sequence()?;
        let mut items = Vec::with_capacity(seq.len());
        while seq.has_next() {
            items.push(seq.decode_next()?);
        }
        Ok(items)
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        let keyed = decoder.keyed()?;
        keyed
            .all_keys()
            .into_iter()
            .map(|key| {
                let value = keyed.get_required(&key)?;
                Ok((key.into_string(), value))
            })
            .collect()
    }
}

impl<T: Decode, S: BuildHasher + Default> Decode for HashMap<String, T, S> {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        let keyed = decoder.keyed()?;
        keyed
            .all_keys()
            .into_iter()
            .map(|key| {
                let value = keyed.get_required(&key)?;
                Ok((key.into_string(), value))
            })
            .collect()
    }
}

impl<T: Decode, S: BuildHasher + Default> Decode for IndexMap<String, T, S> {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        let keyed = decoder.keyed()?;
        keyed
            .all_keys()
            .into_iter()
            .map(|key| {
                let value = keyed.get_required(&key)?;
                Ok((key.into_string(), value))
            })
            .collect()
    }
}

fn decode_date(decoder: &Decoder<'_>, strategy: &DateStrategy) -> DecodeResult<DateTime<Utc>> {
    match strategy {
        DateStrategy::Rfc3339 => {
            let s = decoder.str("date")?;
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| decoder.data_corrupted(format!("invalid RFC 3339 date {:?}: {}", s, e)))
        }
        DateStrategy::SecondsSince1970 => {
            let secs = decoder.number("date")?.as_f64();
            let whole = secs.floor();
            let nanos = ((secs - whole) * 1e9).round() as u32;
            if !whole.is_finite() || whole.abs() > i64::MAX as f64 {
                return Err(decoder.data_corrupted(format!("timestamp {} out of range", secs)));
            }
            Utc.timestamp_opt(whole as i64, nanos.min(999_999_999))
                .single()
                .ok_or_else(|| decoder.data_corrupted(format!("timestamp {} out of range", secs)))
        }
        DateStrategy::MillisecondsSince1970 => {
            let n = decoder.number("date")?;
            let millis = n
                .as_i64()
                .ok_or_else(|| decoder.data_corrupted(format!("timestamp {} is not whole", n)))?;
            Utc.timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| decoder.data_corrupted(format!("timestamp {} out of range", millis)))
        }
        DateStrategy::Formatted(format) => {
            let s = decoder.str("date")?;
            match DateTime::parse_from_str(s, format) {
                Ok(dt) => Ok(dt.with_timezone(&Utc)),
                Err(with_offset) => NaiveDateTime::parse_from_str(s, format)
                    .map(|naive| Utc.from_utc_datetime(&naive))
                    .map_err(|_| {
                        decoder.data_corrupted(format!(
                            "date {:?} does not match format {:?}: {}",
                            s, format, with_offset
                        ))
                    }),
            }
        }
    }
}

impl Decode for DateTime<Utc> {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        decode_date(decoder, &decoder.options().date_strategy)
    }
}

/// Calendar dates are always `YYYY-MM-DD` text.
impl Decode for NaiveDate {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        let s = decoder.str("date")?;
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| decoder.data_corrupted(format!("invalid date {:?}: {}", s, e)))
    }
}

impl Decode for Url {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        let s = decoder.str("url")?;
        Url::parse(s).map_err(|e| decoder.data_corrupted(format!("invalid URL {:?}: {}", s, e)))
    }
}
