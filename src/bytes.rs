//! Raw byte payloads.
//!
//! `Vec<u8>` already encodes as a sequence of numbers through the generic
//! `Vec<T>` impl. [`Bytes`] marks a field as an opaque payload instead, so it
//! follows the configured [`DataStrategy`]: base64 text by default, or an
//! integer array.
//!
//! ```rust
//! use codable::{from_str, Bytes, Decode, DecodeResult, Decoder};
//!
//! struct Student {
//!     blog: Bytes,
//! }
//!
//! impl Decode for Student {
//!     fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
//!         Ok(Student { blog: decoder.keyed()?.get_required("blog")? })
//!     }
//! }
//!
//! let stu: Student = from_str(
//!     r#"{"blog":"aHR0cDovL3d3dy5qaWFuc2h1LmNvbS91c2Vycy8zMjhmNWY5ZDBiNTgvdGltZWxpbmU="}"#,
//! )
//! .unwrap();
//! assert_eq!(stu.blog.as_slice(), b"http://www.jianshu.com/users/328f5f9d0b58/timeline");
//! ```

use crate::de::{Decode, Decoder};
use crate::error::{DecodeResult, EncodeResult};
use crate::options::DataStrategy;
use crate::ser::{Encode, Encoder};
use crate::Value;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::ops::Deref;

/// An opaque byte payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Bytes(bytes.into())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(bytes: Bytes) -> Self {
        bytes.0
    }
}

pub(crate) fn decode_data(decoder: &Decoder<'_>, strategy: DataStrategy) -> DecodeResult<Vec<u8>> {
    match strategy {
        DataStrategy::Base64 => {
            let s = decoder.str("base64 data")?;
            STANDARD
                .decode(s)
                .map_err(|e| decoder.data_corrupted(format!("invalid base64 data: {}", e)))
        }
        DataStrategy::Array => Vec::<u8>::decode(decoder),
    }
}

pub(crate) fn encode_data(encoder: Encoder<'_>, bytes: &[u8], strategy: DataStrategy) -> EncodeResult<()> {
    match strategy {
        DataStrategy::Base64 => encoder.set(Value::String(STANDARD.encode(bytes))),
        DataStrategy::Array => bytes.encode(encoder),
    }
}

impl Decode for Bytes {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        decoder.decode_data_with(decoder.options().data_strategy).map(Bytes)
    }
}

impl Encode for Bytes {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        let strategy = encoder.options().data_strategy;
        encoder.encode_data_with(&self.0, strategy)
    }
}
