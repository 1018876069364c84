/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// Nested arrays and objects are written inline; any other single token
/// tree is encoded through [`Encode`](crate::Encode). Inside arrays and
/// objects, negative numbers and other multi-token expressions must be bound
/// to a variable or wrapped in parentheses first.
///
/// ```rust
/// use codable::{value, Value};
///
/// let offset = -3;
/// let doc = value!({
///     "name": "Jone",
///     "scores": [78.0, 89.5],
///     "offset": offset,
///     "info": null
/// });
/// assert_eq!(doc.get("name").and_then(Value::as_str), Some("Jone"));
/// assert_eq!(doc.get("offset").and_then(Value::as_i64), Some(-3));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Sequence(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Sequence(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Mapping($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut mapping = $crate::Map::new();
        $(
            mapping.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Mapping(mapping)
    }};

    // Anything else goes through its Encode impl.
    ($s:expr) => {
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    };
}
