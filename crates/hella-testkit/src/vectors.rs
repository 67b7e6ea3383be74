//! Golden test vectors for deterministic verification.
//!
//! These vectors pin soft hashes, object encodings and object pointers so
//! that every implementation produces identical results.

use hella_core::{encode, object_pointer, soft_hash60, soft_hash64, Object, Value};

/// A soft-hash vector.
#[derive(Debug, Clone)]
pub struct HashVector {
    pub name: &'static str,
    pub input: Vec<u8>,
    pub soft_hash64: u64,
    /// `soft_hash60` with tag `0xc`.
    pub soft_hash60_c: u64,
}

/// An object with its pinned encoding and pointer (tag `0xc`).
#[derive(Debug, Clone)]
pub struct GoldenVector {
    pub name: &'static str,
    pub object: Object,
    /// Expected encoding (hex).
    pub encoded: &'static str,
    /// Expected object pointer (hex).
    pub pointer: &'static str,
}

/// All soft-hash vectors.
pub fn hash_vectors() -> Vec<HashVector> {
    vec![
        HashVector {
            name: "empty",
            input: vec![],
            soft_hash64: 0x9e37_79b9_7f4a_7c15,
            soft_hash60_c: 0xce37_79b9_7f4a_7c15,
        },
        HashVector {
            name: "single zero byte",
            input: vec![0x00],
            soft_hash64: 0xdf44_2d22_ce48_59b9,
            soft_hash60_c: 0xcf44_2d22_ce48_59b9,
        },
        HashVector {
            name: "abc",
            input: b"abc".to_vec(),
            soft_hash64: 0xfcfd_f050_667e_85af,
            soft_hash60_c: 0xccfd_f050_667e_85af,
        },
        HashVector {
            name: "ticker",
            input: b"MSFT".to_vec(),
            soft_hash64: 0xb664_f277_d6ba_a3d3,
            soft_hash60_c: 0xc664_f277_d6ba_a3d3,
        },
        HashVector {
            name: "all byte values",
            input: (0u8..=255).collect(),
            soft_hash64: 0x3d06_6e46_0ba7_c595,
            soft_hash60_c: 0xcd06_6e46_0ba7_c595,
        },
    ]
}

fn object(entries: Vec<(&str, Value)>) -> Object {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// All object vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "single integer field",
            object: object(vec![("a", Value::Integer(1))]),
            encoded: "f181611801",
            pointer: "c1e9c2c6f935ec30",
        },
        GoldenVector {
            name: "quote",
            object: object(vec![
                ("ticker", Value::from("AAPL")),
                ("price", Value::Float(97.61)),
            ]),
            encoded: "f2867469636b6572844141504c85707269636510d7a3703d0a675840",
            pointer: "c7c6debb4cd3825e",
        },
        GoldenVector {
            name: "bool and packed integers",
            object: object(vec![
                ("ok", Value::Bool(true)),
                (
                    "xs",
                    Value::Array(vec![
                        Value::Integer(1),
                        Value::Integer(2),
                        Value::Integer(3),
                    ]),
                ),
            ]),
            encoded: "f2826f6b038278737300010203",
            pointer: "c89c406302af9e6b",
        },
    ]
}

/// Check every vector; returns `(name, matches)` per vector.
///
/// Call this to verify your implementation matches the reference.
pub fn verify_all_vectors() -> Vec<(String, bool)> {
    let hashes = hash_vectors().into_iter().map(|v| {
        let ok = soft_hash64(&v.input) == v.soft_hash64
            && soft_hash60(&v.input, 0xc) == v.soft_hash60_c;
        (v.name.to_string(), ok)
    });

    let objects = all_vectors().into_iter().map(|v| {
        let encoded = hex::encode(encode(&Value::Object(v.object.clone())));
        let pointer = object_pointer(&v.object, 0xc).map(hex::encode);
        let ok = encoded == v.encoded && pointer.as_deref() == Ok(v.pointer);
        (v.name.to_string(), ok)
    });

    hashes.chain(objects).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, ok) in verify_all_vectors() {
            assert!(ok, "vector '{}' does not match", name);
        }
    }

    #[test]
    fn test_pointer_independent_of_vector_field_order() {
        for vector in all_vectors() {
            let reversed: Object = vector.object.clone().into_iter().rev().collect();
            assert_eq!(
                hex::encode(object_pointer(&reversed, 0xc).unwrap()),
                vector.pointer,
                "vector '{}'",
                vector.name
            );
        }
    }
}
