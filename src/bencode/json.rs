use serde_json::{json, Map, Value};

use super::BValue;

/// Convert a `BValue` into JSON for display and debugging.
///
/// - `Integer(i)` => JSON number
/// - `ByteString(bytes)` => string if UTF-8, otherwise `{"_bytes_hex": "..."}`
/// - `List(...)` => JSON array
/// - `Dict(...)` => JSON object; non-UTF-8 keys become `_bytes_hex:<hex>`
pub fn bvalue_to_json(bv: &BValue) -> Value {
    match bv {
        BValue::Integer(i) => json!(i),
        BValue::ByteString(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::String(text.to_owned()),
            Err(_) => json!({ "_bytes_hex": hex::encode(bytes) }),
        },
        BValue::List(items) => Value::Array(items.iter().map(bvalue_to_json).collect()),
        BValue::Dict(map) => {
            let mut json_map = Map::new();
            for (key, value) in map {
                let key = match std::str::from_utf8(key) {
                    Ok(text) => text.to_owned(),
                    Err(_) => format!("_bytes_hex:{}", hex::encode(key)),
                };
                json_map.insert(key, bvalue_to_json(value));
            }
            Value::Object(json_map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::decode_bencode;

    #[test]
    fn test_json_view_of_dict() {
        let (_, value) = decode_bencode(b"d3:fooi42e3:barl1:a1:bee").unwrap();
        assert_eq!(bvalue_to_json(&value), json!({"foo": 42, "bar": ["a", "b"]}));
    }

    #[test]
    fn test_json_view_keeps_binary_key_apart_from_text_key() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![0xbe, 0xef], BValue::Integer(1));
        map.insert(b"beef".to_vec(), BValue::Integer(2));

        let json = bvalue_to_json(&BValue::Dict(map));
        assert_eq!(json, json!({"_bytes_hex:beef": 1, "beef": 2}));
    }

    #[test]
    fn test_json_view_of_binary_bytes() {
        let value = BValue::ByteString(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(bvalue_to_json(&value), json!({"_bytes_hex": "deadbeef"}));
    }
}
