//! Codec objects: decode and encode logic held as a value.
//!
//! Most types implement [`Decode`] and [`Encode`] directly. A [`TypeCodec`]
//! is for the cases where the logic is not a property of the type alone,
//! such as two wire layouts for one record, or a foreign type that cannot
//! carry the traits. Drivers and accessors accept either form through their
//! `*_with` methods.
//!
//! ```rust
//! use codable::{decode, encode, FnCodec};
//!
//! // A flag stored as "Y"/"N" in this particular feed.
//! let yes_no = FnCodec::new(
//!     |decoder| Ok(decoder.str("flag")? == "Y"),
//!     |value: &bool, encoder| encoder.set(if *value { "Y" } else { "N" }),
//! );
//!
//! assert!(decode(br#""Y""#, &yes_no).unwrap());
//! assert_eq!(encode(&false, &yes_no).unwrap(), br#""N""#);
//! ```

use crate::de::{Decode, Decoder};
use crate::error::{DecodeResult, EncodeResult};
use crate::ser::{Encode, Encoder};
use std::fmt;
use std::marker::PhantomData;

/// Decode and encode logic for values of type `T`.
pub trait TypeCodec<T> {
    fn decode(&self, decoder: &Decoder<'_>) -> DecodeResult<T>;

    fn encode(&self, value: &T, encoder: Encoder<'_>) -> EncodeResult<()>;
}

impl<T, C: TypeCodec<T> + ?Sized> TypeCodec<T> for &C {
    fn decode(&self, decoder: &Decoder<'_>) -> DecodeResult<T> {
        (**self).decode(decoder)
    }

    fn encode(&self, value: &T, encoder: Encoder<'_>) -> EncodeResult<()> {
        (**self).encode(value, encoder)
    }
}

/// The codec a type defines for itself through [`Decode`] and [`Encode`].
pub struct Codable<T>(PhantomData<fn() -> T>);

impl<T> Codable<T> {
    #[must_use]
    pub const fn new() -> Self {
        Codable(PhantomData)
    }
}

impl<T> Default for Codable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Codable<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Codable<T> {}

impl<T> fmt::Debug for Codable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Codable<{}>", std::any::type_name::<T>())
    }
}

impl<T: Decode + Encode> TypeCodec<T> for Codable<T> {
    fn decode(&self, decoder: &Decoder<'_>) -> DecodeResult<T> {
        T::decode(decoder)
    }

    fn encode(&self, value: &T, encoder: Encoder<'_>) -> EncodeResult<()> {
        value.encode(encoder)
    }
}

/// A codec assembled from a pair of closures.
pub struct FnCodec<D, E> {
    decode: D,
    encode: E,
}

impl<D, E> FnCodec<D, E> {
    pub fn new<T>(decode: D, encode: E) -> Self
    where
        D: Fn(&Decoder<'_>) -> DecodeResult<T>,
        E: Fn(&T, Encoder<'_>) -> EncodeResult<()>,
    {
        FnCodec { decode, encode }
    }
}

impl<T, D, E> TypeCodec<T> for FnCodec<D, E>
where
    D: Fn(&Decoder<'_>) -> DecodeResult<T>,
    E: Fn(&T, Encoder<'_>) -> EncodeResult<()>,
{
    fn decode(&self, decoder: &Decoder<'_>) -> DecodeResult<T> {
        (self.decode)(decoder)
    }

    fn encode(&self, value: &T, encoder: Encoder<'_>) -> EncodeResult<()> {
        (self.encode)(value, encoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode, encode, DecodeError, Value};

    #[test]
    fn test_codable_matches_traits() {
        let codec = Codable::<Vec<u8>>::new();
        let decoded = decode(b"[1,2,3]", &codec).unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);
        assert_eq!(encode(&decoded, &codec).unwrap(), b"[1,2,3]");
    }

    #[test]
    fn test_fn_codec_errors_carry_path() {
        let cents = FnCodec::new(
            |decoder| {
                let n = decoder.number("amount")?;
                n.as_i64()
                    .ok_or_else(|| decoder.custom_error("amount must be whole cents"))
            },
            |value: &i64, encoder| encoder.set(Value::from(*value)),
        );
        let err = decode(b"12.5", &cents).unwrap_err();
        assert!(matches!(err, DecodeError::Custom { .. }));
        assert_eq!(decode(b"1250", &cents).unwrap(), 1250);
    }
}
