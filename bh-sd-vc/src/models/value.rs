// Copyright (C) 2020-2025  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::collections::BTreeMap;

use bherror::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DecodingResult;
use crate::DecodingError;

/// A flat claim value carried by a disclosure.
///
/// Only flat shapes are supported: nested objects, arrays of non-strings,
/// `null` and non-integer numbers are rejected while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum ClaimValue {
    /// A JSON string.
    String(String),
    /// A JSON number representable as a signed 64-bit integer.
    Int(i64),
    /// A JSON boolean.
    Bool(bool),
    /// A JSON array of strings.
    StringArray(Vec<String>),
    /// A JSON object mapping strings to strings.
    StringMap(BTreeMap<String, String>),
}

type Decoder = fn(&Value) -> Option<ClaimValue>;

// Tried in order, the first match wins.
const DECODERS: [Decoder; 5] = [
    decode_string,
    decode_int,
    decode_string_array,
    decode_string_map,
    decode_bool,
];

fn decode_string(value: &Value) -> Option<ClaimValue> {
    value.as_str().map(|s| ClaimValue::String(s.to_owned()))
}

fn decode_int(value: &Value) -> Option<ClaimValue> {
    value.as_i64().map(ClaimValue::Int)
}

fn decode_string_array(value: &Value) -> Option<ClaimValue> {
    value
        .as_array()?
        .iter()
        .map(|element| element.as_str().map(str::to_owned))
        .collect::<Option<Vec<_>>>()
        .map(ClaimValue::StringArray)
}

fn decode_string_map(value: &Value) -> Option<ClaimValue> {
    value
        .as_object()?
        .iter()
        .map(|(key, value)| Some((key.clone(), value.as_str()?.to_owned())))
        .collect::<Option<BTreeMap<_, _>>>()
        .map(ClaimValue::StringMap)
}

fn decode_bool(value: &Value) -> Option<ClaimValue> {
    value.as_bool().map(ClaimValue::Bool)
}

fn describe_shape(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Number(number) => format!("number {number}"),
        Value::Array(_) => "array with non-string elements".to_owned(),
        Value::Object(_) => "object with non-string values".to_owned(),
        Value::String(_) | Value::Bool(_) => value.to_string(),
    }
}

impl ClaimValue {
    /// Decodes a [`ClaimValue`] from the given JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodingError::UnsupportedValueShape`] if the value is not
    /// one of the supported shapes.
    pub fn from_json(value: &Value) -> DecodingResult<Self> {
        DECODERS
            .iter()
            .find_map(|decode| decode(value))
            .ok_or_else(|| Error::root(DecodingError::UnsupportedValueShape(describe_shape(value))))
    }

    /// Encodes `self` into its native JSON shape.
    pub fn to_json(&self) -> Value {
        match self {
            ClaimValue::String(s) => Value::String(s.clone()),
            ClaimValue::Int(i) => Value::from(*i),
            ClaimValue::Bool(b) => Value::Bool(*b),
            ClaimValue::StringArray(array) => {
                Value::Array(array.iter().cloned().map(Value::String).collect())
            }
            ClaimValue::StringMap(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                    .collect(),
            ),
        }
    }

    /// Returns the string if `self` is a [`ClaimValue::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if `self` is a [`ClaimValue::Int`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClaimValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the boolean if `self` is a [`ClaimValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClaimValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl TryFrom<Value> for ClaimValue {
    type Error = Error<DecodingError>;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

impl From<ClaimValue> for Value {
    fn from(value: ClaimValue) -> Self {
        value.to_json()
    }
}

impl std::fmt::Display for ClaimValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_owned())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Int(value)
    }
}

impl From<i32> for ClaimValue {
    fn from(value: i32) -> Self {
        ClaimValue::Int(value.into())
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<Vec<String>> for ClaimValue {
    fn from(value: Vec<String>) -> Self {
        ClaimValue::StringArray(value)
    }
}

impl From<Vec<&str>> for ClaimValue {
    fn from(value: Vec<&str>) -> Self {
        ClaimValue::StringArray(value.into_iter().map(str::to_owned).collect())
    }
}

impl From<BTreeMap<String, String>> for ClaimValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        ClaimValue::StringMap(value)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    struct TestCase {
        json: Value,
        expected: ClaimValue,
    }

    #[test]
    fn supported_shapes_are_decoded() {
        let test_cases = [
            TestCase {
                json: json!("John"),
                expected: ClaimValue::from("John"),
            },
            TestCase {
                json: json!(""),
                expected: ClaimValue::from(""),
            },
            TestCase {
                json: json!(25),
                expected: ClaimValue::Int(25),
            },
            TestCase {
                json: json!(-9_223_372_036_854_775_808_i64),
                expected: ClaimValue::Int(i64::MIN),
            },
            TestCase {
                json: json!(true),
                expected: ClaimValue::Bool(true),
            },
            TestCase {
                json: json!(["user", "reports_admin"]),
                expected: ClaimValue::from(vec!["user", "reports_admin"]),
            },
            TestCase {
                json: json!([]),
                expected: ClaimValue::StringArray(vec![]),
            },
            TestCase {
                json: json!({"locality": "Berlin", "country": "DE"}),
                expected: ClaimValue::StringMap(BTreeMap::from([
                    ("country".to_owned(), "DE".to_owned()),
                    ("locality".to_owned(), "Berlin".to_owned()),
                ])),
            },
            TestCase {
                json: json!({}),
                expected: ClaimValue::StringMap(BTreeMap::new()),
            },
        ];

        for TestCase { json, expected } in test_cases {
            assert_eq!(ClaimValue::try_from(json.clone()).unwrap(), expected);
            assert_eq!(serde_json::from_value::<ClaimValue>(json).unwrap(), expected);
        }
    }

    #[test]
    fn string_is_never_coerced() {
        assert_eq!(
            ClaimValue::try_from(json!("25")).unwrap(),
            ClaimValue::from("25")
        );
        assert_eq!(
            ClaimValue::try_from(json!("true")).unwrap(),
            ClaimValue::from("true")
        );
        assert_eq!(
            ClaimValue::try_from(json!(1)).unwrap(),
            ClaimValue::Int(1)
        );
    }

    #[test]
    fn unsupported_shapes_are_rejected() {
        for json in [
            json!(null),
            json!(1.5),
            json!(u64::MAX),
            json!(["a", 1]),
            json!([["a"]]),
            json!({"a": 1}),
            json!({"a": {"b": "c"}}),
        ] {
            let error = ClaimValue::try_from(json.clone()).unwrap_err();
            assert_matches!(error.error, DecodingError::UnsupportedValueShape(_));

            assert!(serde_json::from_value::<ClaimValue>(json).is_err());
        }
    }

    #[test]
    fn values_encode_to_native_json() {
        assert_eq!(ClaimValue::from("John").to_json(), json!("John"));
        assert_eq!(ClaimValue::from(25).to_json(), json!(25));
        assert_eq!(ClaimValue::from(false).to_json(), json!(false));
        assert_eq!(
            ClaimValue::from(vec!["user".to_owned()]).to_json(),
            json!(["user"])
        );
        assert_eq!(
            serde_json::to_string(&ClaimValue::StringMap(BTreeMap::from([
                ("b".to_owned(), "2".to_owned()),
                ("a".to_owned(), "1".to_owned()),
            ])))
            .unwrap(),
            r#"{"a":"1","b":"2"}"#
        );
    }

    #[test]
    fn accessors_match_variant() {
        let value = ClaimValue::from("John");
        assert_eq!(value.as_str(), Some("John"));
        assert_eq!(value.as_i64(), None);
        assert_eq!(value.as_bool(), None);

        assert_eq!(ClaimValue::from(21_i64).as_i64(), Some(21));
        assert_eq!(ClaimValue::from(true).as_bool(), Some(true));
    }
}
