//! Query string encoding for filter and pagination parameters.
//!
//! Every present value is coerced to its textual form and percent-encoded
//! with `application/x-www-form-urlencoded` rules. Absent values are skipped
//! entirely: no `key=` pair and never the literal `null`.

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

/// A single query value before coercion to text.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Text, emitted as-is before percent-encoding
    Str(String),
    /// Signed integer, base 10
    Int(i64),
    /// Unsigned integer, base 10
    UInt(u64),
    /// Floating point, shortest round-trip form
    Float(f64),
    /// `true` / `false`
    Bool(bool),
    /// Nested structure, emitted as compact JSON text
    Json(Value),
}

impl QueryValue {
    /// Textual form used on the wire.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::UInt(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Json(v) => v.to_string(),
        }
    }

    /// Convert a JSON value, mapping `null` to absence.
    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(b)),
            Value::Number(n) => Some(if let Some(u) = n.as_u64() {
                Self::UInt(u)
            } else if let Some(i) = n.as_i64() {
                Self::Int(i)
            } else {
                Self::Float(n.as_f64().unwrap_or_default())
            }),
            Value::String(s) => Some(Self::Str(s)),
            nested @ (Value::Array(_) | Value::Object(_)) => Some(Self::Json(nested)),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::UInt(u64::from(value))
    }
}

/// Ordered record of optional query fields.
///
/// Hand-built records keep insertion order. Records built from a struct
/// follow the serialized field order of the underlying JSON map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    fields: Vec<(String, Option<QueryValue>)>,
}

impl QueryParameters {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a present field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.fields.push((key.into(), Some(value.into())));
        self
    }

    /// Add a field that may be absent.
    #[must_use]
    pub fn with_opt<V: Into<QueryValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.fields.push((key.into(), value.map(Into::into)));
        self
    }

    /// Build a record from any serializable filter object.
    ///
    /// `null` fields become absent. A unit or `None` value yields an empty
    /// record. Non-finite floats (`NaN`, infinities) have no JSON form and
    /// serialize as `null`, so those filters are dropped as well.
    ///
    /// # Errors
    ///
    /// Returns error if `params` fails to serialize or is not a map.
    pub fn from_serialize<T: Serialize + ?Sized>(params: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(params)? {
            Value::Object(map) => Ok(Self {
                fields: map
                    .into_iter()
                    .map(|(k, v)| (k, QueryValue::from_json(v)))
                    .collect(),
            }),
            Value::Null => Ok(Self::new()),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "query parameters must serialize to a map, got {other}"
            ))),
        }
    }

    /// `true` when no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.is_none())
    }

    /// Encode into a query string without the leading `?`.
    ///
    /// # Examples
    ///
    /// ```
    /// use magistrala_sdk_core::QueryParameters;
    ///
    /// let query = QueryParameters::new()
    ///     .with("offset", 0u64)
    ///     .with("limit", 10u64)
    ///     .with_opt::<String>("name", None)
    ///     .with("tag", "floor 2");
    /// assert_eq!(query.encode(), "offset=0&limit=10&tag=floor+2");
    /// ```
    #[must_use]
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.fields {
            if let Some(value) = value {
                serializer.append_pair(key, &value.to_text());
            }
        }
        serializer.finish()
    }
}

/// Encode any serializable filter object into a query string.
///
/// # Errors
///
/// Returns error if `params` does not serialize to a map.
pub fn encode<T: Serialize + ?Sized>(params: &T) -> Result<String, serde_json::Error> {
    QueryParameters::from_serialize(params).map(|q| q.encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{MessagesPageMetadata, PageMetadata};

    #[test]
    fn all_absent_encodes_empty() {
        assert_eq!(PageMetadata::default().to_query().encode(), "");

        let query = QueryParameters::new()
            .with_opt::<u64>("offset", None)
            .with_opt::<String>("status", None);
        assert!(query.is_empty());
        assert_eq!(query.encode(), "");
    }

    #[test]
    fn numeric_limit() {
        let pm = PageMetadata {
            limit: Some(10),
            ..Default::default()
        };
        let encoded = encode(&pm).unwrap();
        assert!(encoded.contains("limit=10"));
        assert!(!encoded.contains("undefined"));
        assert!(!encoded.contains("null"));
        assert!(!encoded.contains("offset"));
    }

    #[test]
    fn values_are_coerced_to_text() {
        let query = QueryParameters::new()
            .with("list_perms", true)
            .with("from", 1.5)
            .with("level", -2)
            .with("vb", false);
        assert_eq!(query.encode(), "list_perms=true&from=1.5&level=-2&vb=false");
    }

    #[test]
    fn whole_floats_have_no_fraction() {
        let query = QueryParameters::new().with("value", 20.0);
        assert_eq!(query.encode(), "value=20");
    }

    #[test]
    fn keys_and_values_are_percent_encoded() {
        let query = QueryParameters::new().with("na me", "a&b=c/d");
        assert_eq!(query.encode(), "na+me=a%26b%3Dc%2Fd");
    }

    #[test]
    fn nested_metadata_is_json_text() {
        let mut metadata = serde_json::Map::new();
        metadata.insert("floor".to_string(), serde_json::json!(2));
        let pm = PageMetadata {
            metadata: Some(metadata),
            ..Default::default()
        };
        assert_eq!(encode(&pm).unwrap(), "metadata=%7B%22floor%22%3A2%7D");
    }

    #[test]
    fn non_finite_filters_are_dropped() {
        let pm = MessagesPageMetadata {
            page: PageMetadata {
                limit: Some(5),
                ..Default::default()
            },
            value: Some(f64::NAN),
            from: Some(f64::INFINITY),
            ..Default::default()
        };
        assert_eq!(encode(&pm).unwrap(), "limit=5");
    }

    #[test]
    fn encoding_is_deterministic() {
        let pm = MessagesPageMetadata {
            page: PageMetadata {
                offset: Some(0),
                limit: Some(5),
                ..Default::default()
            },
            subtopic: Some("temp".to_string()),
            publisher: Some("thing-1".to_string()),
            comparator: Some("gt".to_string()),
            value: Some(3.0),
            ..Default::default()
        };

        let first = encode(&pm).unwrap();
        assert_eq!(first, encode(&pm).unwrap());
        for pair in ["offset=0", "limit=5", "subtopic=temp", "publisher=thing-1", "value=3"] {
            assert!(first.contains(pair), "missing {pair} in {first}");
        }
    }

    #[test]
    fn non_map_is_rejected() {
        assert!(QueryParameters::from_serialize(&[1, 2, 3]).is_err());
        assert!(QueryParameters::from_serialize(&()).unwrap().is_empty());
    }
}
