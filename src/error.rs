//! Error types for decoding and encoding.
//!
//! Decoding and encoding fail in different ways, so each direction has its
//! own taxonomy:
//!
//! - [`DecodeError`]: missing keys, shape mismatches, unexpected nulls,
//!   malformed input, exhausted sequences, excessive nesting
//! - [`EncodeError`]: values the format cannot represent, excessive nesting
//!
//! Both carry `ContextMissing` for codecs that unconditionally need a
//! [`CodecContext`](crate::CodecContext) entry the caller did not supply.
//! That variant is a broken contract between caller and codec rather than
//! bad input, and [`DecodeError::is_contract_violation`] tells the two apart.
//!
//! Every location-bearing variant carries the [`CodingPath`] of the accessor
//! that failed.
//!
//! ```rust
//! use codable::{from_str, DecodeError};
//!
//! let err = from_str::<Vec<i32>>(r#"[1, "two"]"#).unwrap_err();
//! assert!(matches!(err, DecodeError::TypeMismatch { .. }));
//! assert!(err.to_string().contains("$[1]"));
//! ```

use crate::{CodingPath, Key, Kind};
use std::fmt;
use thiserror::Error;

/// Errors produced while turning bytes or a tree into typed records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// A required key was absent.
    #[error("key `{key}` not found at {path}")]
    KeyMissing { key: Key, path: CodingPath },

    /// A value was present but had the wrong shape.
    #[error("type mismatch at {path}: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: Kind,
        path: CodingPath,
    },

    /// A non-optional value was `null`.
    #[error("expected {expected} at {path}, found null")]
    ValueNotFound {
        expected: &'static str,
        path: CodingPath,
    },

    /// The input was malformed, or a value could not be interpreted.
    #[error("data corrupted at {path}: {reason}")]
    DataCorrupted { reason: String, path: CodingPath },

    /// A sequence was read past its last element.
    #[error("end of sequence reached at {path}")]
    EndOfSequenceReached { path: CodingPath },

    /// Nesting exceeded the configured maximum depth.
    #[error("nesting deeper than {limit} levels at {path}")]
    DepthLimitExceeded { limit: usize, path: CodingPath },

    /// A codec required a context entry that was not supplied.
    #[error("context value `{key}` is required but was not supplied")]
    ContextMissing { key: &'static str },

    /// A caller codec rejected the data.
    #[error("{message} at {path}")]
    Custom { message: String, path: CodingPath },
}

impl DecodeError {
    pub fn key_missing(key: Key, path: CodingPath) -> Self {
        DecodeError::KeyMissing { key, path }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use codable::{CodingPath, DecodeError, Kind};
    ///
    /// let err = DecodeError::type_mismatch("string", Kind::Number, CodingPath::root());
    /// assert_eq!(err.to_string(), "type mismatch at $: expected string, found number");
    /// ```
    pub fn type_mismatch(expected: &'static str, actual: Kind, path: CodingPath) -> Self {
        DecodeError::TypeMismatch {
            expected,
            actual,
            path,
        }
    }

    pub fn value_not_found(expected: &'static str, path: CodingPath) -> Self {
        DecodeError::ValueNotFound { expected, path }
    }

    pub fn data_corrupted<T: fmt::Display>(reason: T, path: CodingPath) -> Self {
        DecodeError::DataCorrupted {
            reason: reason.to_string(),
            path,
        }
    }

    pub fn end_of_sequence(path: CodingPath) -> Self {
        DecodeError::EndOfSequenceReached { path }
    }

    pub fn depth_limit(limit: usize, path: CodingPath) -> Self {
        DecodeError::DepthLimitExceeded { limit, path }
    }

    pub fn context_missing(key: &'static str) -> Self {
        DecodeError::ContextMissing { key }
    }

    /// Creates an error for a caller-defined rejection, such as an enum
    /// string outside the known set.
    pub fn custom<T: fmt::Display>(message: T, path: CodingPath) -> Self {
        DecodeError::Custom {
            message: message.to_string(),
            path,
        }
    }

    /// Returns `true` for errors caused by the caller breaking a codec's
    /// preconditions rather than by the input.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, DecodeError::ContextMissing { .. })
    }

    /// Returns the location of the failure, if it has one.
    #[must_use]
    pub fn path(&self) -> Option<&CodingPath> {
        match self {
            DecodeError::KeyMissing { path, .. }
            | DecodeError::TypeMismatch { path, .. }
            | DecodeError::ValueNotFound { path, .. }
            | DecodeError::DataCorrupted { path, .. }
            | DecodeError::EndOfSequenceReached { path }
            | DecodeError::DepthLimitExceeded { path, .. }
            | DecodeError::Custom { path, .. } => Some(path),
            DecodeError::ContextMissing { .. } => None,
        }
    }
}

impl serde::de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError::data_corrupted(msg, CodingPath::root())
    }
}

/// Errors produced while turning typed records into a tree or bytes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// The value cannot be represented in the output format.
    #[error("invalid value at {path}: {reason}")]
    InvalidValue { reason: String, path: CodingPath },

    /// Nesting exceeded the configured maximum depth.
    #[error("nesting deeper than {limit} levels at {path}")]
    DepthLimitExceeded { limit: usize, path: CodingPath },

    /// A codec required a context entry that was not supplied.
    #[error("context value `{key}` is required but was not supplied")]
    ContextMissing { key: &'static str },

    /// A caller codec refused to encode the value.
    #[error("{message} at {path}")]
    Custom { message: String, path: CodingPath },
}

impl EncodeError {
    pub fn invalid_value<T: fmt::Display>(reason: T, path: CodingPath) -> Self {
        EncodeError::InvalidValue {
            reason: reason.to_string(),
            path,
        }
    }

    pub fn depth_limit(limit: usize, path: CodingPath) -> Self {
        EncodeError::DepthLimitExceeded { limit, path }
    }

    pub fn context_missing(key: &'static str) -> Self {
        EncodeError::ContextMissing { key }
    }

    pub fn custom<T: fmt::Display>(message: T, path: CodingPath) -> Self {
        EncodeError::Custom {
            message: message.to_string(),
            path,
        }
    }

    /// Returns `true` for errors caused by the caller breaking a codec's
    /// preconditions rather than by the value.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, EncodeError::ContextMissing { .. })
    }

    #[must_use]
    pub fn path(&self) -> Option<&CodingPath> {
        match self {
            EncodeError::InvalidValue { path, .. }
            | EncodeError::DepthLimitExceeded { path, .. }
            | EncodeError::Custom { path, .. } => Some(path),
            EncodeError::ContextMissing { .. } => None,
        }
    }
}

impl serde::ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError::invalid_value(msg, CodingPath::root())
    }
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_missing_message() {
        let err = DecodeError::key_missing(Key::from("name"), CodingPath::root());
        assert_eq!(err.to_string(), "key `name` not found at $");
        assert_eq!(err.path(), Some(&CodingPath::root()));
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_context_missing_is_contract_violation() {
        let err = DecodeError::context_missing("apiVersion");
        assert!(err.is_contract_violation());
        assert_eq!(err.path(), None);

        let err = EncodeError::context_missing("apiVersion");
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("apiVersion"));
    }

    #[test]
    fn test_serde_bridge_errors() {
        let err = <DecodeError as serde::de::Error>::custom("trailing characters");
        assert!(matches!(err, DecodeError::DataCorrupted { .. }));

        let err = <EncodeError as serde::ser::Error>::custom("non-finite");
        assert!(matches!(err, EncodeError::InvalidValue { .. }));
    }
}
