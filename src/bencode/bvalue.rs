use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BValue {
    ByteString(Vec<u8>), // raw bytes, not guaranteed UTF-8
    Integer(i64),
    List(Vec<BValue>),
    Dict(HashMap<Vec<u8>, BValue>), // later duplicate keys overwrite earlier ones
}

impl BValue {
    /// Short name of the variant, used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BValue::ByteString(_) => "byte string",
            BValue::Integer(_) => "integer",
            BValue::List(_) => "list",
            BValue::Dict(_) => "dictionary",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            BValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            BValue::ByteString(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the byte string as text if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_list(&self) -> Option<&[BValue]> {
        match self {
            BValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&HashMap<Vec<u8>, BValue>> {
        match self {
            BValue::Dict(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a dictionary.
    pub fn get(&self, key: &[u8]) -> Option<&BValue> {
        self.as_dict()?.get(key)
    }
}

impl From<i64> for BValue {
    fn from(i: i64) -> Self {
        BValue::Integer(i)
    }
}

impl From<&str> for BValue {
    fn from(s: &str) -> Self {
        BValue::ByteString(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for BValue {
    fn from(bytes: Vec<u8>) -> Self {
        BValue::ByteString(bytes)
    }
}

impl From<Vec<BValue>> for BValue {
    fn from(items: Vec<BValue>) -> Self {
        BValue::List(items)
    }
}

impl From<HashMap<Vec<u8>, BValue>> for BValue {
    fn from(map: HashMap<Vec<u8>, BValue>) -> Self {
        BValue::Dict(map)
    }
}
