//! Configuration options for decoding and encoding.
//!
//! - [`DecodeOptions`] and [`EncodeOptions`]: per-direction configuration
//! - [`Formatting`]: compact or pretty-printed output
//! - [`DateStrategy`]: how `chrono` timestamps map to tree values
//! - [`NonConformingFloat`]: what to do with NaN and the infinities, which
//!   JSON cannot represent as numbers
//! - [`DataStrategy`]: how raw byte payloads ([`Bytes`](crate::Bytes)) are
//!   written
//!
//! ## Examples
//!
//! ```rust
//! use codable::{to_vec_with_options, DateStrategy, EncodeOptions};
//!
//! let options = EncodeOptions::pretty()
//!     .with_indent(4)
//!     .with_sorted_keys()
//!     .with_date_strategy(DateStrategy::SecondsSince1970);
//!
//! let bytes = to_vec_with_options(&vec![1, 2, 3], &options).unwrap();
//! assert!(String::from_utf8(bytes).unwrap().contains("\n    1"));
//! ```

/// Default cap on accessor nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Output layout.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Formatting {
    #[default]
    Compact,
    Pretty {
        indent: usize,
    },
}

/// How dates are represented in the tree.
///
/// # Examples
///
/// ```rust
/// use codable::DateStrategy;
///
/// let v1 = DateStrategy::formatted("%b-%d-%Y %H:%M:%S %z");
/// let v2 = DateStrategy::formatted("%Y-%m-%d %H:%M:%S %z");
/// assert_ne!(v1, v2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum DateStrategy {
    /// RFC 3339 text, e.g. `2017-11-14T17:27:35+00:00`.
    #[default]
    Rfc3339,
    /// Seconds since the Unix epoch, as a number. Whole seconds are written
    /// as an integer. A fractional value goes through an `f64`, which keeps
    /// roughly a quarter of a microsecond of precision for present-day dates;
    /// use `Rfc3339` when nanoseconds must survive.
    SecondsSince1970,
    /// Milliseconds since the Unix epoch, as an integer.
    MillisecondsSince1970,
    /// Text in a `chrono` format string. A format without an offset field is
    /// read as UTC.
    Formatted(String),
}

impl DateStrategy {
    #[must_use]
    pub fn formatted(format: impl Into<String>) -> Self {
        DateStrategy::Formatted(format.into())
    }
}

/// How byte payloads are represented in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DataStrategy {
    /// Standard padded base64 text.
    #[default]
    Base64,
    /// A sequence of integers in `0..=255`.
    Array,
}

/// Handling of non-finite floating point values.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum NonConformingFloat {
    /// Refuse to encode them; a string never decodes into a float.
    #[default]
    Reject,
    /// Encode them as these strings and accept the same strings on decode.
    ConvertToString {
        positive_infinity: String,
        negative_infinity: String,
        nan: String,
    },
}

impl NonConformingFloat {
    /// `"+Infinity"`, `"-Infinity"` and `"NaN"`.
    #[must_use]
    pub fn convert_to_string() -> Self {
        NonConformingFloat::ConvertToString {
            positive_infinity: "+Infinity".to_string(),
            negative_infinity: "-Infinity".to_string(),
            nan: "NaN".to_string(),
        }
    }

    pub(crate) fn to_text(&self, value: f64) -> Option<&str> {
        match self {
            NonConformingFloat::Reject => None,
            NonConformingFloat::ConvertToString {
                positive_infinity,
                negative_infinity,
                nan,
            } => {
                if value.is_nan() {
                    Some(nan)
                } else if value > 0.0 {
                    Some(positive_infinity)
                } else {
                    Some(negative_infinity)
                }
            }
        }
    }

    pub(crate) fn from_text(&self, text: &str) -> Option<f64> {
        match self {
            NonConformingFloat::Reject => None,
            NonConformingFloat::ConvertToString {
                positive_infinity,
                negative_infinity,
                nan,
            } => {
                if text == positive_infinity {
                    Some(f64::INFINITY)
                } else if text == negative_infinity {
                    Some(f64::NEG_INFINITY)
                } else if text == nan {
                    Some(f64::NAN)
                } else {
                    None
                }
            }
        }
    }
}

/// Configuration for decoding.
///
/// # Examples
///
/// ```rust
/// use codable::{DateStrategy, DecodeOptions};
///
/// let options = DecodeOptions::new()
///     .with_max_depth(16)
///     .with_date_strategy(DateStrategy::MillisecondsSince1970);
/// assert_eq!(options.max_depth, 16);
/// ```
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    pub date_strategy: DateStrategy,
    pub non_conforming_float: NonConformingFloat,
    pub data_strategy: DataStrategy,
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            date_strategy: DateStrategy::default(),
            non_conforming_float: NonConformingFloat::default(),
            data_strategy: DataStrategy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_date_strategy(mut self, strategy: DateStrategy) -> Self {
        self.date_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_non_conforming_float(mut self, strategy: NonConformingFloat) -> Self {
        self.non_conforming_float = strategy;
        self
    }

    #[must_use]
    pub fn with_data_strategy(mut self, strategy: DataStrategy) -> Self {
        self.data_strategy = strategy;
        self
    }

    /// Sets the deepest accessor nesting a document may require.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Configuration for encoding.
///
/// # Examples
///
/// ```rust
/// use codable::{EncodeOptions, Formatting};
///
/// let options = EncodeOptions::new();
/// assert_eq!(options.formatting, Formatting::Compact);
///
/// let options = EncodeOptions::pretty();
/// assert_eq!(options.formatting, Formatting::Pretty { indent: 2 });
/// ```
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    pub formatting: Formatting,
    pub sort_keys: bool,
    pub date_strategy: DateStrategy,
    pub non_conforming_float: NonConformingFloat,
    pub data_strategy: DataStrategy,
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            formatting: Formatting::default(),
            sort_keys: false,
            date_strategy: DateStrategy::default(),
            non_conforming_float: NonConformingFloat::default(),
            data_strategy: DataStrategy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for pretty-printed output with 2-space indentation.
    #[must_use]
    pub fn pretty() -> Self {
        EncodeOptions {
            formatting: Formatting::Pretty { indent: 2 },
            ..Default::default()
        }
    }

    /// Sets the indentation width and switches to pretty output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.formatting = Formatting::Pretty { indent };
        self
    }

    #[must_use]
    pub fn with_formatting(mut self, formatting: Formatting) -> Self {
        self.formatting = formatting;
        self
    }

    /// Emits every mapping's keys in lexicographic order.
    #[must_use]
    pub fn with_sorted_keys(mut self) -> Self {
        self.sort_keys = true;
        self
    }

    #[must_use]
    pub fn with_date_strategy(mut self, strategy: DateStrategy) -> Self {
        self.date_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_non_conforming_float(mut self, strategy: NonConformingFloat) -> Self {
        self.non_conforming_float = strategy;
        self
    }

    #[must_use]
    pub fn with_data_strategy(mut self, strategy: DataStrategy) -> Self {
        self.data_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_conforming_float_text() {
        let strategy = NonConformingFloat::convert_to_string();
        assert_eq!(strategy.to_text(f64::INFINITY), Some("+Infinity"));
        assert_eq!(strategy.to_text(f64::NEG_INFINITY), Some("-Infinity"));
        assert_eq!(strategy.to_text(f64::NAN), Some("NaN"));
        assert_eq!(strategy.from_text("-Infinity"), Some(f64::NEG_INFINITY));
        assert!(strategy.from_text("NaN").is_some_and(f64::is_nan));
        assert_eq!(strategy.from_text("nan"), None);

        assert_eq!(NonConformingFloat::Reject.to_text(f64::NAN), None);
    }

    #[test]
    fn test_with_indent_switches_to_pretty() {
        let options = EncodeOptions::new().with_indent(4);
        assert_eq!(options.formatting, Formatting::Pretty { indent: 4 });
        assert!(!options.sort_keys);
    }
}
