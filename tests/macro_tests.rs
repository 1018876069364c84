use codable::{from_value, value, Map, Number, Value};
use std::collections::BTreeMap;

#[test]
fn test_value_macro_leaves() {
    assert_eq!(value!(null), Value::Null);
    assert_eq!(value!(true), Value::Bool(true));
    assert_eq!(value!(42), Value::Number(Number::Integer(42)));
    assert_eq!(value!(-123), Value::Number(Number::Integer(-123)));
    assert_eq!(value!(3.5), Value::Number(Number::Float(3.5)));
    assert_eq!(value!(""), Value::String(String::new()));
}

#[test]
fn test_value_macro_mixed_sequence() {
    assert_eq!(
        value!([1, "hello", true, null]),
        Value::Sequence(vec![
            Value::Number(Number::Integer(1)),
            Value::String("hello".to_string()),
            Value::Bool(true),
            Value::Null,
        ])
    );
}

#[test]
fn test_value_macro_nested() {
    let doc = value!({
        "info": { "grade": "3", "classes": "1112" },
        "students": [
            { "name": "ZhangSan", "age": 17 },
            { "name": "LiSi", "age": 18 }
        ],
        "count": 2
    });

    let Value::Mapping(ref root) = doc else {
        panic!("expected mapping");
    };
    assert_eq!(root.len(), 3);
    assert_eq!(
        doc.get("info").and_then(|info| info.get("classes")),
        Some(&Value::from("1112"))
    );

    let students = doc.get("students").and_then(Value::as_sequence).unwrap();
    assert_eq!(students[1].get("age").and_then(Value::as_i64), Some(18));
}

#[test]
fn test_value_macro_keeps_key_order() {
    let doc = value!({ "z": 1, "a": 2, "m": 3 });
    let keys: Vec<&String> = doc.as_mapping().map(Map::keys).unwrap().collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[test]
fn test_value_macro_feeds_decoders() {
    let doc = value!({ "1": { "name": "ZhangSan" }, "2": { "name": "LiSi" } });
    let decoded: BTreeMap<String, BTreeMap<String, String>> = from_value(&doc).unwrap();
    assert_eq!(decoded["1"]["name"], "ZhangSan");
    assert_eq!(decoded.len(), 2);
}

#[test]
fn test_value_display_is_compact_json() {
    let doc = value!({ "name": "a\"b", "scores": [1, 2.5], "meta": null });
    assert_eq!(
        doc.to_string(),
        r#"{"name":"a\"b","scores":[1,2.5],"meta":null}"#
    );
}
