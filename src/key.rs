//! Keys and coding paths.
//!
//! A [`Key`] names one entry of a mapping. Keys are either fixed names known
//! at compile time or names synthesized from data (a record id turned into a
//! map key), so key sets never have to be closed enumerations.
//!
//! A [`CodingPath`] records where an accessor sits inside the tree and is
//! attached to every error.
//!
//! ```rust
//! use codable::{CodingPath, Key};
//!
//! let path = CodingPath::root()
//!     .child_key(Key::from("meta"))
//!     .child_key(Key::from("scores"))
//!     .child_index(2);
//! assert_eq!(path.to_string(), "$.meta.scores[2]");
//!
//! let id = Key::from(7);
//! assert_eq!(id.as_str(), "7");
//! assert_eq!(id.as_int(), Some(7));
//! ```

use std::borrow::Borrow;
use std::fmt;

/// Key under which [`delegate_to_super`](crate::KeyedEncoder::delegate_to_super)
/// nests a base record when no explicit key is given.
pub const SUPER_KEY: &str = "super";

/// A mapping key.
#[derive(Clone, Debug, Eq)]
pub enum Key {
    /// A name fixed in code, such as a renamed field.
    Static(&'static str),
    /// A name only known at runtime.
    Dynamic(String),
}

impl Key {
    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Key::Static(name) => name,
            Key::Dynamic(name) => name,
        }
    }

    /// Parses the key text as an integer, for keys derived from numeric ids.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        self.as_str().parse().ok()
    }

    /// Returns the owned key text.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Key::Static(name) => name.to_string(),
            Key::Dynamic(name) => name,
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl std::hash::Hash for Key {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&'static str> for Key {
    fn from(name: &'static str) -> Self {
        Key::Static(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Dynamic(name)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

macro_rules! key_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Key {
                fn from(id: $ty) -> Self {
                    Key::Dynamic(id.to_string())
                }
            }
        )*
    };
}

key_from_int!(i32, i64, u32, u64, usize);

/// One step of a [`CodingPath`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    Key(Key),
    Index(usize),
}

/// The location of an accessor inside the tree, from the root down.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodingPath(Vec<PathSegment>);

impl CodingPath {
    /// The path of the document root.
    #[must_use]
    pub fn root() -> Self {
        CodingPath(Vec::new())
    }

    /// Returns this path extended by a mapping key.
    #[must_use]
    pub fn child_key(&self, key: Key) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key));
        CodingPath(segments)
    }

    /// Returns this path extended by a sequence index.
    #[must_use]
    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        CodingPath(segments)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns the last segment, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) if is_identifier(key.as_str()) => write!(f, ".{}", key)?,
                PathSegment::Key(key) => write!(f, "[{:?}]", key.as_str())?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
