//! Per-call side channel for codec configuration.
//!
//! A [`CodecContext`] holds values a codec may need that are not part of the
//! record itself: the API version a response was produced for, a date format
//! negotiated with a peer, a unit system. The caller fills it before a call
//! and the driver makes it reachable from every accessor of that call.
//!
//! Entries are addressed by typed [`ContextKey`]s, so a lookup returns the
//! value's real type instead of something to be downcast by hand.
//!
//! ```rust
//! use codable::{CodecContext, ContextKey};
//!
//! #[derive(Debug, PartialEq)]
//! enum ApiVersion { V1, V2 }
//!
//! const API_VERSION: ContextKey<ApiVersion> = ContextKey::new("apiVersion");
//!
//! let mut cx = CodecContext::new();
//! cx.set(API_VERSION, ApiVersion::V2);
//! assert_eq!(cx.get(API_VERSION), Some(&ApiVersion::V2));
//! ```

use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// A typed name for one context entry.
pub struct ContextKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ContextKey<T> {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        ContextKey {
            name,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for ContextKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ContextKey<T> {}

impl<T> fmt::Debug for ContextKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextKey").field(&self.name).finish()
    }
}

/// Named configuration values visible throughout one conversion.
///
/// A value stored under a name with a different type than the one a key
/// asks for is treated as absent.
#[derive(Default)]
pub struct CodecContext {
    entries: IndexMap<&'static str, Box<dyn Any>>,
}

impl CodecContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous entry of that name.
    pub fn set<T: 'static>(&mut self, key: ContextKey<T>, value: T) {
        self.entries.insert(key.name, Box::new(value));
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with<T: 'static>(mut self, key: ContextKey<T>, value: T) -> Self {
        self.set(key, value);
        self
    }

    #[must_use]
    pub fn get<T: 'static>(&self, key: ContextKey<T>) -> Option<&T> {
        self.entries
            .get(key.name)
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Returns the entry for `key`, or the name of the missing key.
    ///
    /// Accessors wrap this into their side's `ContextMissing` error; see
    /// [`Decoder::require_context`](crate::Decoder::require_context).
    pub fn require<T: 'static>(&self, key: ContextKey<T>) -> Result<&T, &'static str> {
        self.get(key).ok_or(key.name)
    }

    pub fn remove<T: 'static>(&mut self, key: ContextKey<T>) -> Option<T> {
        let value = self.entries.shift_remove(key.name)?;
        value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    #[must_use]
    pub fn contains<T: 'static>(&self, key: ContextKey<T>) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CodecContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
