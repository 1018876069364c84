//! Encoding: typed writes into a [`Value`] tree.
//!
//! The mirror image of [`de`](crate::de). A codec receives a root
//! [`Encoder`] over an empty slot and builds the tree through:
//!
//! - [`Encoder`]: one slot; becomes a mapping, a sequence or a leaf
//! - [`KeyedEncoder`]: a mapping; typed writes by key, nested containers,
//!   base-record delegation
//! - [`SeqEncoder`]: a sequence; typed appends in order
//!
//! Lenses borrow the tree mutably, so a nested lens must be finished with
//! before its parent is written to again. The borrow checker enforces the
//! order that keeps the tree consistent.
//!
//! ## Usage
//!
//! ```rust
//! use codable::{to_string, Encode, EncodeResult, Encoder};
//!
//! struct Student {
//!     name: String,
//!     gross_score: u32,
//!     scores: Vec<f32>,
//! }
//!
//! impl Encode for Student {
//!     fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
//!         let mut keyed = encoder.keyed();
//!         keyed.set_value("name", &self.name)?;
//!         let mut meta = keyed.nested_keyed("meta")?;
//!         meta.set_value("gross_score", &self.gross_score)?;
//!         let mut scores = meta.nested_sequential("scores")?;
//!         for score in &self.scores {
//!             scores.append_value(&format!("{}分", score))?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let stu = Student { name: "Jone".into(), gross_score: 120, scores: vec![78.0] };
//! assert_eq!(
//!     to_string(&stu).unwrap(),
//!     r#"{"name":"Jone","meta":{"gross_score":120,"scores":["78分"]}}"#
//! );
//! ```

use crate::codec::TypeCodec;
use crate::error::{EncodeError, EncodeResult};
use crate::key::SUPER_KEY;
use crate::options::{DataStrategy, DateStrategy};
use crate::{CodecContext, CodingPath, ContextKey, EncodeOptions, Key, Map, Number, Value};
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use url::Url;

/// A type that can be written into an [`Encoder`].
pub trait Encode {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()>;
}

#[derive(Clone, Copy)]
struct EncodeState<'a> {
    cx: &'a CodecContext,
    options: &'a EncodeOptions,
}

impl EncodeState<'_> {
    fn nest(&self, depth: usize, path: &CodingPath) -> EncodeResult<usize> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            return Err(EncodeError::depth_limit(self.options.max_depth, path.clone()));
        }
        Ok(depth)
    }
}

fn as_map(slot: &mut Value) -> &mut Map {
    if !slot.is_mapping() {
        *slot = Value::Mapping(Map::new());
    }
    match slot {
        Value::Mapping(map) => map,
        _ => unreachable!("slot was just made a mapping"),
    }
}

fn as_items(slot: &mut Value) -> &mut Vec<Value> {
    if !slot.is_sequence() {
        *slot = Value::Sequence(Vec::new());
    }
    match slot {
        Value::Sequence(items) => items,
        _ => unreachable!("slot was just made a sequence"),
    }
}

/// A lens over one slot of the tree being built.
pub struct Encoder<'a> {
    slot: &'a mut Value,
    path: CodingPath,
    state: EncodeState<'a>,
    depth: usize,
    // Set for the encoder returned by `KeyedEncoder::flatten`: the slot is
    // the parent's mapping and may only be extended through `keyed()`.
    merged: bool,
}

impl<'a> Encoder<'a> {
    /// Creates the root encoder of a conversion.
    #[must_use]
    pub fn new(slot: &'a mut Value, cx: &'a CodecContext, options: &'a EncodeOptions) -> Self {
        Encoder {
            slot,
            path: CodingPath::root(),
            state: EncodeState { cx, options },
            depth: 0,
            merged: false,
        }
    }

    fn ensure_replaceable(&self, what: &str) -> EncodeResult<()> {
        if self.merged {
            return Err(self.invalid_value(format!(
                "a flattened record can only write keyed fields, not {}",
                what
            )));
        }
        Ok(())
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
    pub fn options(&self) -> &'a EncodeOptions {
        self.state.options
    }

    /// Returns a context entry the calling codec cannot work without.
    ///
    /// # Errors
    ///
    /// Fails with [`EncodeError::ContextMissing`] when the caller did not
    /// supply the entry.
    pub fn require_context<T: 'static>(&self, key: ContextKey<T>) -> EncodeResult<&'a T> {
        self.state
            .cx
            .require(key)
            .map_err(EncodeError::context_missing)
    }

    /// Turns the slot into a mapping and returns a keyed lens over it.
    ///
    /// A slot that already holds a mapping is reused, so fields written by
    /// an earlier lens over the same slot are kept.
    #[must_use]
    pub fn keyed(self) -> KeyedEncoder<'a> {
        as_map(self.slot);
        KeyedEncoder {
            slot: self.slot,
            path: self.path,
            state: self.state,
            depth: self.depth,
        }
    }

    /// Turns the slot into a sequence and returns a sequential lens over it.
    ///
    /// # Errors
    ///
    /// `InvalidValue` on an encoder from [`KeyedEncoder::flatten`], whose
    /// slot is the parent's mapping.
    pub fn sequence(self) -> EncodeResult<SeqEncoder<'a>> {
        self.ensure_replaceable("a sequence")?;
        as_items(self.slot);
        Ok(SeqEncoder {
            slot: self.slot,
            path: self.path,
            state: self.state,
            depth: self.depth,
        })
    }

    /// Stores a finished value in the slot.
    ///
    /// # Errors
    ///
    /// `InvalidValue` on an encoder from [`KeyedEncoder::flatten`].
    pub fn set(self, value: impl Into<Value>) -> EncodeResult<()> {
        self.ensure_replaceable("a single value")?;
        *self.slot = value.into();
        Ok(())
    }

    pub fn encode_null(self) -> EncodeResult<()> {
        self.set(Value::Null)
    }

    /// Encodes `value` into the slot.
    pub fn encode_value<T: Encode + ?Sized>(self, value: &T) -> EncodeResult<()> {
        value.encode(self)
    }

    /// Encodes `value` into the slot with an explicit codec.
    pub fn encode_with<T, C>(self, value: &T, codec: &C) -> EncodeResult<()>
    where
        C: TypeCodec<T> + ?Sized,
    {
        codec.encode(value, self)
    }

    /// Writes a float, applying the configured non-finite strategy.
    ///
    /// # Errors
    ///
    /// `InvalidValue` for NaN or an infinity under
    /// [`NonConformingFloat::Reject`](crate::NonConformingFloat::Reject).
    pub fn encode_float(self, value: f64) -> EncodeResult<()> {
        if value.is_finite() {
            return self.set(Value::Number(Number::Float(value)));
        }
        match self.state.options.non_conforming_float.to_text(value) {
            Some(text) => {
                let text = text.to_string();
                self.set(Value::String(text))
            }
            None => Err(self.invalid_value(format!(
                "non-finite number {} cannot be represented without a non-conforming float strategy",
                value
            ))),
        }
    }

    /// Writes a date with an explicit strategy, ignoring the configured one.
    pub fn encode_date_with(self, date: &DateTime<Utc>, strategy: &DateStrategy) -> EncodeResult<()> {
        match strategy {
            DateStrategy::Rfc3339 => self.set(date.to_rfc3339()),
            DateStrategy::SecondsSince1970 => {
                let nanos = date.timestamp_subsec_nanos();
                if nanos == 0 {
                    self.set(date.timestamp())
                } else {
                    // Sub-microsecond digits do not survive the f64.
                    self.set(date.timestamp() as f64 + f64::from(nanos) / 1e9)
                }
            }
            DateStrategy::MillisecondsSince1970 => self.set(date.timestamp_millis()),
            DateStrategy::Formatted(format) => {
                let mut text = String::new();
                if write!(text, "{}", date.format(format)).is_err() {
                    return Err(self.invalid_value(format!("invalid date format {:?}", format)));
                }
                self.set(text)
            }
        }
    }

    /// Writes a byte payload with an explicit strategy, ignoring the
    /// configured one.
    pub fn encode_data_with(self, bytes: &[u8], strategy: DataStrategy) -> EncodeResult<()> {
        crate::bytes::encode_data(self, bytes, strategy)
    }

    #[must_use]
    pub fn invalid_value<T: std::fmt::Display>(&self, reason: T) -> EncodeError {
        EncodeError::invalid_value(reason, self.path.clone())
    }

    #[must_use]
    pub fn custom_error<T: std::fmt::Display>(&self, message: T) -> EncodeError {
        EncodeError::custom(message, self.path.clone())
    }
}

/// A lens over a mapping being built.
pub struct KeyedEncoder<'a> {
    slot: &'a mut Value,
    path: CodingPath,
    state: EncodeState<'a>,
    depth: usize,
}

impl<'a> KeyedEncoder<'a> {
    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    #[must_use]
    pub fn context(&self) -> &'a CodecContext {
        self.state.cx
    }

    pub fn require_context<T: 'static>(&self, key: ContextKey<T>) -> EncodeResult<&'a T> {
        self.state
            .cx
            .require(key)
            .map_err(EncodeError::context_missing)
    }

    /// Number of entries written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slot.as_mapping().map_or(0, Map::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A single-value encoder for the entry at `key`, replacing whatever the
    /// entry held.
    pub fn encoder_for(&mut self, key: impl Into<Key>) -> EncodeResult<Encoder<'_>> {
        let key = key.into();
        let path = self.path.child_key(key.clone());
        let depth = self.state.nest(self.depth, &path)?;
        let slot = as_map(self.slot).slot(key.as_str());
        *slot = Value::Null;
        Ok(Encoder {
            slot,
            path,
            state: self.state,
            depth,
            merged: false,
        })
    }

    fn reuse_slot(&mut self, key: Key) -> EncodeResult<Encoder<'_>> {
        let path = self.path.child_key(key.clone());
        let depth = self.state.nest(self.depth, &path)?;
        let slot = as_map(self.slot).slot(key.as_str());
        Ok(Encoder {
            slot,
            path,
            state: self.state,
            depth,
            merged: false,
        })
    }

    /// Writes `value` at `key`, overwriting any existing entry.
    pub fn set_value<T: Encode + ?Sized>(&mut self, key: impl Into<Key>, value: &T) -> EncodeResult<()> {
        value.encode(self.encoder_for(key)?)
    }

    /// Writes `value` at `key` when present; `None` leaves the key out.
    pub fn set_if_present<T: Encode + ?Sized>(
        &mut self,
        key: impl Into<Key>,
        value: Option<&T>,
    ) -> EncodeResult<()> {
        match value {
            Some(value) => self.set_value(key, value),
            None => Ok(()),
        }
    }

    /// Writes `value` at `key` with an explicit codec.
    pub fn set_with<T, C>(&mut self, key: impl Into<Key>, value: &T, codec: &C) -> EncodeResult<()>
    where
        C: TypeCodec<T> + ?Sized,
    {
        codec.encode(value, self.encoder_for(key)?)
    }

    /// A keyed lens over the mapping at `key`, created when absent or not a
    /// mapping, reused otherwise.
    pub fn nested_keyed(&mut self, key: impl Into<Key>) -> EncodeResult<KeyedEncoder<'_>> {
        Ok(self.reuse_slot(key.into())?.keyed())
    }

    /// A sequential lens over the sequence at `key`, created when absent or
    /// not a sequence, reused otherwise.
    pub fn nested_sequential(&mut self, key: impl Into<Key>) -> EncodeResult<SeqEncoder<'_>> {
        self.reuse_slot(key.into())?.sequence()
    }

    /// The encoder a base record writes its own fields into, nested under
    /// `key`.
    pub fn delegate_to_super(&mut self, key: impl Into<Key>) -> EncodeResult<Encoder<'_>> {
        self.encoder_for(key)
    }

    /// [`delegate_to_super`](Self::delegate_to_super) under `"super"`.
    pub fn super_encoder(&mut self) -> EncodeResult<Encoder<'_>> {
        self.delegate_to_super(SUPER_KEY)
    }

    /// An encoder over this same mapping. A record encoded through it that
    /// opens a keyed lens writes its fields next to the parent's own.
    ///
    /// Only [`Encoder::keyed`] is allowed on it; a record that encodes as a
    /// sequence or a single value fails with `InvalidValue` and leaves the
    /// parent's fields untouched.
    #[must_use]
    pub fn flatten(&mut self) -> Encoder<'_> {
        Encoder {
            slot: &mut *self.slot,
            path: self.path.clone(),
            state: self.state,
            depth: self.depth,
            merged: true,
        }
    }
}

/// A lens over a sequence being built.
pub struct SeqEncoder<'a> {
    slot: &'a mut Value,
    path: CodingPath,
    state: EncodeState<'a>,
    depth: usize,
}

impl<'a> SeqEncoder<'a> {
    #[must_use]
    pub fn path(&self) -> &CodingPath {
        &self.path
    }

    #[must_use]
    pub fn context(&self) -> &'a CodecContext {
        self.state.cx
    }

    pub fn require_context<T: 'static>(&self, key: ContextKey<T>) -> EncodeResult<&'a T> {
        self.state
            .cx
            .require(key)
            .map_err(EncodeError::context_missing)
    }

    /// Number of elements appended so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.slot.as_sequence().map_or(0, Vec::len)
    }

    /// Appends an empty slot and returns an encoder over it.
    pub fn super_encoder(&mut self) -> EncodeResult<Encoder<'_>> {
        let items = as_items(self.slot);
        let index = items.len();
        let path = self.path.child_index(index);
        let depth = self.state.nest(self.depth, &path)?;
        items.push(Value::Null);
        Ok(Encoder {
            slot: &mut items[index],
            path,
            state: self.state,
            depth,
            merged: false,
        })
    }

    pub fn append_value<T: Encode + ?Sized>(&mut self, value: &T) -> EncodeResult<()> {
        value.encode(self.super_encoder()?)
    }

    pub fn append_with<T, C>(&mut self, value: &T, codec: &C) -> EncodeResult<()>
    where
        C: TypeCodec<T> + ?Sized,
    {
        codec.encode(value, self.super_encoder()?)
    }

    /// Appends a mapping and returns a keyed lens over it.
    pub fn nested_keyed(&mut self) -> EncodeResult<KeyedEncoder<'_>> {
        Ok(self.super_encoder()?.keyed())
    }

    /// Appends a sequence and returns a sequential lens over it.
    pub fn nested_sequential(&mut self) -> EncodeResult<SeqEncoder<'_>> {
        self.super_encoder()?.sequence()
    }
}

impl Encode for bool {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        encoder.set(*self)
    }
}

macro_rules! encode_int {
    ($($ty:ty => $via:ty),*) => {
        $(
            impl Encode for $ty {
                fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
                    encoder.set(Value::from(*self as $via))
                }
            }
        )*
    };
}

encode_int!(
    i8 => i64, i16 => i64, i32 => i64, i64 => i64, isize => i64,
    u8 => i64, u16 => i64, u32 => i64, u64 => u64, usize => u64
);

impl Encode for f64 {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        encoder.encode_float(*self)
    }
}

/// Goes through the shortest decimal text of the `f32`, so `0.65f32` is
/// written as `0.65` rather than `0.6499999761581421`.
impl Encode for f32 {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        if !self.is_finite() {
            return encoder.encode_float(f64::from(*self));
        }
        let widened = self.to_string().parse::<f64>().unwrap_or(f64::from(*self));
        encoder.encode_float(widened)
    }
}

impl Encode for str {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        encoder.set(self)
    }
}

impl Encode for String {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        encoder.set(self.as_str())
    }
}

impl Encode for char {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        encoder.set(self.to_string())
    }
}

impl Encode for Value {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        encoder.set(self.clone())
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        (**self).encode(encoder)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        (**self).encode(encoder)
    }
}

/// `None` is written as `null`; use
/// [`KeyedEncoder::set_if_present`] to leave the key out instead.
impl<T: Encode> Encode for Option<T> {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        match self {
            Some(value) => value.encode(encoder),
            None => encoder.encode_null(),
        }
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        let mut seq = encoder.sequence()?;
        for item in self {
            seq.append_value(item)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        self.as_slice().encode(encoder)
    }
}

impl<T: Encode> Encode for BTreeMap<String, T> {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        let mut keyed = encoder.keyed();
        for (key, value) in self {
            keyed.set_value(key.clone(), value)?;
        }
        Ok(())
    }
}

impl<T: Encode, S> Encode for HashMap<String, T, S> {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        let mut keyed = encoder.keyed();
        for (key, value) in self {
            keyed.set_value(key.clone(), value)?;
        }
        Ok(())
    }
}

impl<T: Encode, S> Encode for IndexMap<String, T, S> {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        let mut keyed = encoder.keyed();
        for (key, value) in self {
            keyed.set_value(key.clone(), value)?;
        }
        Ok(())
    }
}

impl Encode for DateTime<Utc> {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        let strategy = &encoder.options().date_strategy;
        encoder.encode_date_with(self, strategy)
    }
}

impl Encode for NaiveDate {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        encoder.set(self.format("%Y-%m-%d").to_string())
    }
}

impl Encode for Url {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        encoder.set(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, Decode, DecodeOptions, Decoder, NonConformingFloat};
    use chrono::TimeZone;

    fn encode_root<T: Encode + ?Sized>(value: &T, options: &EncodeOptions) -> EncodeResult<Value> {
        let cx = CodecContext::new();
        let mut root = Value::Null;
        value.encode(Encoder::new(&mut root, &cx, options))?;
        Ok(root)
    }

    #[test]
    fn test_set_value_overwrites_in_place() {
        let cx = CodecContext::new();
        let options = EncodeOptions::default();
        let mut root = Value::Null;
        {
            let mut keyed = Encoder::new(&mut root, &cx, &options).keyed();
            keyed.set_value("name", "Jone").unwrap();
            keyed.set_value("age", &17).unwrap();
            keyed.set_value("name", "Tom").unwrap();
            assert_eq!(keyed.len(), 2);
        }
        assert_eq!(root, value!({ "name": "Tom", "age": 17 }));
    }

    #[test]
    fn test_nested_containers_are_reused() {
        let cx = CodecContext::new();
        let options = EncodeOptions::default();
        let mut root = Value::Null;
        {
            let mut keyed = Encoder::new(&mut root, &cx, &options).keyed();
            keyed.nested_keyed("meta").unwrap().set_value("a", &1).unwrap();
            keyed.nested_keyed("meta").unwrap().set_value("b", &2).unwrap();
            let mut seq = keyed.nested_sequential("list").unwrap();
            seq.append_value(&1).unwrap();
            seq.nested_keyed().unwrap().set_value("x", &true).unwrap();
            seq.nested_sequential().unwrap().append_value("y").unwrap();
            assert_eq!(seq.count(), 3);
        }
        assert_eq!(
            root,
            value!({ "meta": { "a": 1, "b": 2 }, "list": [1, { "x": true }, ["y"]] })
        );
    }

    #[test]
    fn test_option_null_versus_absent() {
        let cx = CodecContext::new();
        let options = EncodeOptions::default();
        let mut root = Value::Null;
        {
            let mut keyed = Encoder::new(&mut root, &cx, &options).keyed();
            keyed.set_value("scores", &None::<Vec<i32>>).unwrap();
            keyed.set_if_present::<i32>("rank", None).unwrap();
        }
        assert_eq!(root, value!({ "scores": null }));
    }

    #[test]
    fn test_non_finite_floats() {
        let err = encode_root(&f64::NAN, &EncodeOptions::default()).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidValue { .. }));

        let options =
            EncodeOptions::new().with_non_conforming_float(NonConformingFloat::convert_to_string());
        assert_eq!(
            encode_root(&vec![f64::INFINITY, 1.5], &options).unwrap(),
            value!(["+Infinity", 1.5])
        );
    }

    #[test]
    fn test_f32_uses_shortest_text() {
        let value = encode_root(&0.65f32, &EncodeOptions::default()).unwrap();
        assert_eq!(value, Value::from(0.65f64));
    }

    #[test]
    fn test_depth_limit() {
        let nested = vec![vec![vec![1]]];
        let err = encode_root(&nested, &EncodeOptions::new().with_max_depth(2)).unwrap_err();
        assert!(matches!(err, EncodeError::DepthLimitExceeded { limit: 2, .. }));
        assert!(encode_root(&nested, &EncodeOptions::new().with_max_depth(3)).is_ok());
    }

    #[test]
    fn test_date_strategies() {
        let date = Utc.with_ymd_and_hms(2017, 11, 14, 9, 27, 35).unwrap();
        let encode = |strategy: DateStrategy| {
            encode_root(&date, &EncodeOptions::new().with_date_strategy(strategy)).unwrap()
        };
        assert_eq!(encode(DateStrategy::Rfc3339), Value::from("2017-11-14T09:27:35+00:00"));
        assert_eq!(encode(DateStrategy::SecondsSince1970), Value::from(1510651655i64));
        assert_eq!(
            encode(DateStrategy::MillisecondsSince1970),
            Value::from(1510651655000i64)
        );
        assert_eq!(
            encode(DateStrategy::formatted("%b-%d-%Y %H:%M:%S")),
            Value::from("Nov-14-2017 09:27:35")
        );
    }

    #[test]
    fn test_fractional_seconds_keep_microseconds() {
        let date = Utc.timestamp_opt(1_510_651_655, 123_456_789).unwrap();
        let options = EncodeOptions::new().with_date_strategy(DateStrategy::SecondsSince1970);
        let encoded = encode_root(&date, &options).unwrap();
        assert!(encoded.as_number().is_some_and(Number::is_float));

        let cx = CodecContext::new();
        let decode_options = DecodeOptions::new().with_date_strategy(DateStrategy::SecondsSince1970);
        let decoded = DateTime::<Utc>::decode(&Decoder::new(&encoded, &cx, &decode_options)).unwrap();
        assert_eq!(decoded.timestamp(), date.timestamp());
        let drift = i64::from(decoded.timestamp_subsec_nanos()) - 123_456_789;
        assert!(drift.abs() < 1_000, "drift of {}ns", drift);
    }

    #[test]
    fn test_invalid_date_format_is_invalid_value() {
        let date = Utc.with_ymd_and_hms(2017, 11, 14, 9, 27, 35).unwrap();
        let options = EncodeOptions::new().with_date_strategy(DateStrategy::formatted("%Q"));
        assert!(matches!(
            encode_root(&date, &options),
            Err(EncodeError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_flatten_merges_into_parent() {
        struct Base {
            x: i32,
        }
        impl Encode for Base {
            fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
                encoder.keyed().set_value("x", &self.x)
            }
        }

        let cx = CodecContext::new();
        let options = EncodeOptions::default();
        let mut root = Value::Null;
        {
            let mut keyed = Encoder::new(&mut root, &cx, &options).keyed();
            keyed.set_value("z", &3).unwrap();
            Base { x: 1 }.encode(keyed.flatten()).unwrap();
        }
        assert_eq!(root, value!({ "z": 3, "x": 1 }));
    }

    #[test]
    fn test_flatten_refuses_non_keyed_records() {
        struct Tags(Vec<&'static str>);
        impl Encode for Tags {
            fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
                self.0.encode(encoder)
            }
        }

        let cx = CodecContext::new();
        let options = EncodeOptions::default();
        let mut root = Value::Null;
        {
            let mut keyed = Encoder::new(&mut root, &cx, &options).keyed();
            keyed.set_value("name", "Jone").unwrap();

            let err = Tags(vec!["a"]).encode(keyed.flatten()).unwrap_err();
            assert!(matches!(err, EncodeError::InvalidValue { .. }));
            assert!(matches!(
                "scalar".encode(keyed.flatten()),
                Err(EncodeError::InvalidValue { .. })
            ));
            assert!(matches!(
                None::<i32>.encode(keyed.flatten()),
                Err(EncodeError::InvalidValue { .. })
            ));

            keyed.set_value("z", &1).unwrap();
        }
        assert_eq!(root, value!({ "name": "Jone", "z": 1 }));
    }
}
