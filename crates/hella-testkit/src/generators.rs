//! Proptest generators for property-based testing.

use proptest::prelude::*;

use hella::Record;
use hella_core::{Object, Value};

/// Floats that compare equal to themselves.
pub fn float() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("NaN never compares equal", |f| !f.is_nan())
}

/// A non-container value.
pub fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        float().prop_map(Value::Float),
        any::<i64>().prop_map(Value::Integer),
        ".{0,48}".prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..48).prop_map(Value::Bytes),
    ]
}

/// Homogeneous arrays eligible for packed encoding.
pub fn packed_array() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::collection::vec(any::<bool>(), 1..64)
            .prop_map(|v| Value::Array(v.into_iter().map(Value::Bool).collect())),
        prop::collection::vec(float(), 1..64)
            .prop_map(|v| Value::Array(v.into_iter().map(Value::Float).collect())),
        prop::collection::vec(any::<i64>(), 1..64)
            .prop_map(|v| Value::Array(v.into_iter().map(Value::Integer).collect())),
    ]
}

/// A field path, never the default timestamp path.
pub fn field_name() -> impl Strategy<Value = String> {
    "/[a-z][a-z0-9_]{0,11}"
        .prop_map(String::from)
        .prop_filter("reserved for the timestamp", |s| s != "/timestamp")
}

/// Build an object from parallel key and value lists; later keys win.
fn object_from(keys: Vec<String>, values: Vec<Value>) -> Object {
    keys.into_iter().zip(values).collect()
}

/// An arbitrary value tree, nesting up to four levels.
pub fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 96, 24, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..24).prop_map(Value::Array),
            packed_array(),
            prop::collection::vec(("[a-z]{0,8}", inner), 0..20).prop_map(|entries| {
                let (keys, values) = entries.into_iter().unzip();
                Value::Object(object_from(keys, values))
            }),
        ]
    })
}

/// A flat object: scalar and array values only, suitable for pointers.
pub fn flat_object(max_fields: usize) -> impl Strategy<Value = Object> {
    let field_value = prop_oneof![
        4 => scalar(),
        1 => packed_array(),
        1 => prop::collection::vec(scalar(), 0..8).prop_map(Value::Array),
    ];
    prop::collection::vec((field_name(), field_value), 0..=max_fields).prop_map(|entries| {
        let (keys, values) = entries.into_iter().unzip();
        object_from(keys, values)
    })
}

/// A record with a realistic nanosecond timestamp.
pub fn record(max_fields: usize) -> impl Strategy<Value = Record> {
    (0i64..=4_102_444_800_000_000_000, flat_object(max_fields))
        .prop_map(|(ts, fields)| Record { timestamp_ns: ts, fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hella::RecordEncoder;
    use hella_core::{
        combine_unordered64, combo_unordered60, decode, encode, object_pointer,
        OBJECT_POINTER_TAG,
    };

    proptest! {
        #[test]
        fn test_value_roundtrip(v in value()) {
            let bytes = encode(&v);
            let (decoded, end) = decode(&bytes, 0).unwrap();
            prop_assert_eq!(decoded, v);
            prop_assert_eq!(end, bytes.len());
        }

        #[test]
        fn test_pointer_order_independent(obj in flat_object(10), seed in any::<u64>()) {
            let mut entries: Vec<_> = obj.clone().into_iter().collect();
            // Deterministic shuffle keyed by the seed.
            entries.sort_by_key(|(k, _)| hella_core::soft_hash64(k.as_bytes()) ^ seed);
            let reordered: Object = entries.into_iter().collect();

            prop_assert_eq!(
                object_pointer(&obj, OBJECT_POINTER_TAG).unwrap(),
                object_pointer(&reordered, OBJECT_POINTER_TAG).unwrap()
            );
        }

        #[test]
        fn test_xor_cancellation(item in prop::collection::vec(any::<u8>(), 0..32)) {
            let empty: [&[u8]; 0] = [];
            prop_assert_eq!(
                combine_unordered64([item.as_slice(), item.as_slice()]),
                combine_unordered64(empty)
            );
        }

        #[test]
        fn test_combo_count(items in prop::collection::hash_set(
            prop::collection::vec(any::<u8>(), 1..8), 0..8
        )) {
            let items: Vec<_> = items.into_iter().collect();
            let combos = combo_unordered60(&items, 0x1);
            prop_assert_eq!(combos.len(), (1usize << items.len()) - 1);
        }

        #[test]
        fn test_record_roundtrip(r in record(12)) {
            let encoder = RecordEncoder::default();
            let encoded = encoder.encode(&r).unwrap();
            prop_assert_eq!(encoder.decode(&encoded.bytes).unwrap(), r);
        }
    }
}
