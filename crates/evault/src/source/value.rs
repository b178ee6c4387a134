//! Firestore REST wire format.
//!
//! Firestore wraps every value in a single-key object naming its type
//! (`{"stringValue": "..."}`, `{"mapValue": {"fields": {...}}}`, ...).
//! These types mirror that encoding and flatten it into plain JSON.

use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// Response of a `documents.list` call.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A stored document.
#[derive(Debug, Deserialize)]
pub(crate) struct Document {
    /// Full resource name, ending in the document id.
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// The document id (last segment of the resource name).
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Decode all fields into a plain JSON object.
    pub fn into_plain(self) -> Value {
        Value::Object(decode_fields(self.fields))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum TypedValue {
    NullValue(IgnoredAny),
    BooleanValue(bool),
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Deserialize)]
struct GeoPoint {
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ArrayValue {
    #[serde(default)]
    values: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct MapValue {
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Flatten a map of typed values.
pub(crate) fn decode_fields(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| (key, decode_value(value)))
        .collect()
}

/// Flatten one typed value.
///
/// A value whose type tag is unknown is kept as is.
pub(crate) fn decode_value(value: Value) -> Value {
    let typed = match TypedValue::deserialize(&value) {
        Ok(typed) => typed,
        Err(e) => {
            tracing::debug!(error = %e, "Unrecognised Firestore value, keeping raw JSON");
            return value;
        }
    };

    match typed {
        TypedValue::NullValue(_) => Value::Null,
        TypedValue::BooleanValue(b) => Value::Bool(b),
        TypedValue::IntegerValue(s) => s
            .parse::<i64>()
            .map_or(Value::String(s), |n| Value::Number(n.into())),
        TypedValue::DoubleValue(d) => Number::from_f64(d).map_or(Value::Null, Value::Number),
        TypedValue::TimestampValue(s)
        | TypedValue::StringValue(s)
        | TypedValue::BytesValue(s)
        | TypedValue::ReferenceValue(s) => Value::String(s),
        TypedValue::GeoPointValue(p) => {
            let mut map = Map::new();
            map.insert("latitude".to_string(), float(p.latitude));
            map.insert("longitude".to_string(), float(p.longitude));
            Value::Object(map)
        }
        TypedValue::ArrayValue(a) => Value::Array(a.values.into_iter().map(decode_value).collect()),
        TypedValue::MapValue(m) => Value::Object(decode_fields(m.fields)),
    }
}

fn float(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}
