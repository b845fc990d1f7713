//! Cache Value Module
//!
//! The dynamically typed payload carried between callers and stores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// == Cache Value ==
/// A value stored in the cache.
///
/// Presence is what makes a hit: `Int(0)`, `Bool(false)`, an empty
/// `Text` and `Null` are all real values, distinct from "nothing stored".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<CacheValue>),
    Map(BTreeMap<String, CacheValue>),
}

impl CacheValue {
    /// Returns the integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CacheValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text payload, if this is a `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CacheValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the raw payload, if this is `Bytes`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            CacheValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the map payload, if this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, CacheValue>> {
        match self {
            CacheValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

// == Conversions ==
impl From<bool> for CacheValue {
    fn from(b: bool) -> Self {
        CacheValue::Bool(b)
    }
}

impl From<i64> for CacheValue {
    fn from(n: i64) -> Self {
        CacheValue::Int(n)
    }
}

impl From<i32> for CacheValue {
    fn from(n: i32) -> Self {
        CacheValue::Int(i64::from(n))
    }
}

impl From<f64> for CacheValue {
    fn from(f: f64) -> Self {
        CacheValue::Float(f)
    }
}

impl From<&str> for CacheValue {
    fn from(s: &str) -> Self {
        CacheValue::Text(s.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(s: String) -> Self {
        CacheValue::Text(s)
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(b: Vec<u8>) -> Self {
        CacheValue::Bytes(b)
    }
}

impl From<&[u8]> for CacheValue {
    fn from(b: &[u8]) -> Self {
        CacheValue::Bytes(b.to_vec())
    }
}

impl From<Vec<CacheValue>> for CacheValue {
    fn from(items: Vec<CacheValue>) -> Self {
        CacheValue::List(items)
    }
}

impl From<BTreeMap<String, CacheValue>> for CacheValue {
    fn from(map: BTreeMap<String, CacheValue>) -> Self {
        CacheValue::Map(map)
    }
}

impl From<serde_json::Value> for CacheValue {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => CacheValue::Null,
            serde_json::Value::Bool(b) => CacheValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => CacheValue::Int(i),
                None => CacheValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => CacheValue::Text(s),
            serde_json::Value::Array(items) => {
                CacheValue::List(items.into_iter().map(CacheValue::from).collect())
            }
            serde_json::Value::Object(obj) => CacheValue::Map(
                obj.into_iter()
                    .map(|(k, v)| (k, CacheValue::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let value = CacheValue::from(json!({"a": [1, "two", null], "b": 1.5, "c": false}));

        let map = value.as_map().unwrap();
        assert_eq!(
            map["a"],
            CacheValue::List(vec![
                CacheValue::Int(1),
                CacheValue::Text("two".into()),
                CacheValue::Null
            ])
        );
        assert_eq!(map["b"], CacheValue::Float(1.5));
        assert_eq!(map["c"], CacheValue::Bool(false));
    }

    #[test]
    fn test_serializes_untagged() {
        let value = CacheValue::from(vec![CacheValue::from(0), CacheValue::from("x")]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[0,"x"]"#);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(CacheValue::from(0).as_int(), Some(0));
        assert_eq!(CacheValue::from("v").as_str(), Some("v"));
        assert_eq!(CacheValue::from(vec![0xffu8]).as_bytes(), Some(&[0xffu8][..]));
        assert_eq!(CacheValue::Null.as_int(), None);
    }
}
