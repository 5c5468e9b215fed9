//! Document types for the search index.
//!
//! This module defines the typed document built from a single source row.

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A geographic point.
///
/// Serializes as `{"lat": .., "lon": ..}`, the object form accepted by
/// `geo_point` fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i32),
    GeoPoint(GeoPoint),
    /// Serialized as an RFC 3339 string.
    Timestamp(DateTime<FixedOffset>),
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<GeoPoint> for FieldValue {
    fn from(value: GeoPoint) -> Self {
        Self::GeoPoint(value)
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(value)
    }
}

/// Document representation for the search index.
///
/// A document always carries its key as a text field; every other field is
/// present only if its value was valid for the declared type. Serializes as a
/// flat JSON object of its fields.
///
/// # Example
///
/// ```
/// use csv_indexer_shared::{Document, FieldValue};
///
/// let mut doc = Document::new("FEATURE_ID", "1507000");
/// doc.insert("ELEV_IN_M", 12);
/// assert_eq!(doc.key(), "1507000");
/// assert_eq!(doc.get("ELEV_IN_M"), Some(&FieldValue::Integer(12)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    key_field: String,
    key: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    /// Create a document holding only its key.
    pub fn new(key_field: impl Into<String>, key: impl Into<String>) -> Self {
        let key_field = key_field.into();
        let key = key.into();
        let mut fields = BTreeMap::new();
        fields.insert(key_field.clone(), FieldValue::Text(key.clone()));
        Self {
            key_field,
            key,
            fields,
        }
    }

    /// The document key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Name of the key field.
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Insert a field value, returning the previous value if any.
    ///
    /// The key field is fixed at construction; inserting under its name is a no-op.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        let name = name.into();
        if name == self.key_field {
            return None;
        }
        self.fields.insert(name, value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_document_carries_key_as_text() {
        let doc = Document::new("FEATURE_ID", "42");
        assert_eq!(doc.key(), "42");
        assert_eq!(doc.key_field(), "FEATURE_ID");
        assert_eq!(doc.get("FEATURE_ID"), Some(&FieldValue::Text("42".to_string())));
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({ "FEATURE_ID": "42" }));
    }

    #[test]
    fn test_insert_cannot_replace_key() {
        let mut doc = Document::new("FEATURE_ID", "42");
        assert_eq!(doc.insert("FEATURE_ID", "other"), None);
        assert_eq!(doc.key(), "42");
        assert_eq!(doc.get("FEATURE_ID"), Some(&FieldValue::Text("42".to_string())));
    }

    #[test]
    fn test_document_serializes_flat() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let created = offset.with_ymd_and_hms(1979, 9, 12, 0, 0, 0).unwrap();

        let mut doc = Document::new("FEATURE_ID", "1507000");
        doc.insert("FEATURE_NAME", "Mount Rainier");
        doc.insert("DESCRIPTION", "");
        doc.insert("ELEV_IN_M", 4392);
        doc.insert("LOCATION", GeoPoint::new(46.8528857, -121.7603744));
        doc.insert("DATE_CREATED", created);

        let mut value = serde_json::to_value(&doc).unwrap();
        let written = value
            .as_object_mut()
            .and_then(|fields| fields.remove("DATE_CREATED"))
            .unwrap();
        // chrono may write a zero offset as `Z` or `+00:00`; both are the same instant.
        assert_eq!(
            DateTime::parse_from_rfc3339(written.as_str().unwrap()).unwrap(),
            created
        );
        assert_eq!(
            value,
            json!({
                "FEATURE_ID": "1507000",
                "FEATURE_NAME": "Mount Rainier",
                "DESCRIPTION": "",
                "ELEV_IN_M": 4392,
                "LOCATION": { "lat": 46.8528857, "lon": -121.7603744 }
            })
        );
    }

    #[test]
    fn test_fields_serialize_in_name_order() {
        let mut doc = Document::new("ID", "1");
        doc.insert("B", "b");
        doc.insert("A", "a");
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"A":"a","B":"b","ID":"1"}"#
        );
    }
}
