//! Property-based tests for the round-trip guarantees of the leaf codecs and
//! the accessor model.

use codable::{
    from_str, to_string, value, Decode, DecodeError, DecodeResult, Decoder, Encode,
    EncodeOptions, EncodeResult, Encoder, NonConformingFloat,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn roundtrip<T: Encode + Decode + PartialEq + std::fmt::Debug>(value: &T) -> bool {
    match to_string(value) {
        Ok(encoded) => match from_str::<T>(&encoded) {
            Ok(decoded) => *value == decoded,
            Err(e) => {
                eprintln!("Decode failed: {}", e);
                eprintln!("Encoded was: {}", encoded);
                false
            }
        },
        Err(e) => {
            eprintln!("Encode failed: {}", e);
            false
        }
    }
}

/// An id-keyed collection, the variable key set case.
#[derive(Debug, PartialEq)]
struct Roster(Vec<(u32, String)>);

impl Decode for Roster {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        let keyed = decoder.keyed()?;
        let mut entries = Vec::with_capacity(keyed.len());
        for key in keyed.all_keys() {
            let id = key
                .as_int()
                .and_then(|id| u32::try_from(id).ok())
                .ok_or_else(|| DecodeError::custom("non-numeric id", keyed.path().clone()))?;
            entries.push((id, keyed.nested_keyed(&key)?.get_required("name")?));
        }
        Ok(Roster(entries))
    }
}

impl Encode for Roster {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        let mut keyed = encoder.keyed();
        for (id, name) in &self.0 {
            keyed.nested_keyed(*id)?.set_value("name", name)?;
        }
        Ok(())
    }
}

fn roster() -> impl Strategy<Value = Roster> {
    prop::collection::btree_map(any::<u32>(), "[a-zA-Z]{0,8}", 0..8)
        .prop_map(|entries| Roster(entries.into_iter().collect()))
}

proptest! {
    #[test]
    fn prop_i32(n in any::<i32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u32(n in any::<u32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u64(n in any::<u64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u64_above_i64_range(n in (i64::MAX as u64 + 1)..=u64::MAX) {
        prop_assert_eq!(to_string(&n).unwrap(), n.to_string());
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_usize(n in any::<usize>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(roundtrip(&b));
    }

    #[test]
    fn prop_finite_f64(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert!(roundtrip(&f));
    }

    #[test]
    fn prop_string(s in ".*") {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_option_i32(opt in proptest::option::of(any::<i32>())) {
        prop_assert!(roundtrip(&opt));
    }

    #[test]
    fn prop_string_map(m in prop::collection::btree_map(".*", any::<i64>(), 0..10)) {
        prop_assert!(roundtrip(&m));
    }

    #[test]
    fn prop_dynamic_keys(r in roster()) {
        prop_assert!(roundtrip(&r));
    }

    #[test]
    fn prop_integers_outside_width_are_rejected(n in (i64::from(i32::MAX) + 1)..i64::MAX) {
        let err = from_str::<i32>(&n.to_string()).unwrap_err();
        prop_assert!(
            matches!(err, DecodeError::DataCorrupted { .. }),
            "unexpected error {:?}",
            err
        );
    }

    #[test]
    fn prop_non_finite_with_strategy(f in prop_oneof![
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
    ]) {
        let options = EncodeOptions::new()
            .with_non_conforming_float(NonConformingFloat::convert_to_string());
        let bytes = codable::to_vec_with_options(&f, &options).unwrap();
        let tree: codable::Value = codable::from_slice(&bytes).unwrap();
        prop_assert!(tree.is_string());

        let driver = codable::DecodeDriver::new().with_options(
            codable::DecodeOptions::new()
                .with_non_conforming_float(NonConformingFloat::convert_to_string()),
        );
        let back: f64 = driver.decode(&bytes).unwrap();
        prop_assert_eq!(back, f);
    }
}

#[test]
fn test_nan_is_rejected_by_default() {
    assert!(to_string(&f64::NAN).is_err());
    assert_eq!(
        from_str::<codable::Value>(r#""NaN""#).unwrap(),
        value!("NaN")
    );
    assert!(from_str::<f64>(r#""NaN""#).is_err());
}
