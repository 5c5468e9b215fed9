//! OpenSearch index settings and mappings.
//!
//! This module translates an `IndexSchema` into the body of an OpenSearch
//! create-index request.

use csv_indexer_shared::{FieldType, IndexSchema, SchemaField};
use serde_json::{json, Map, Value};

/// Build the mapping for a single schema field.
///
/// - Searchable text becomes `text`, with a `raw` keyword sub-field when the field
///   is also filterable, sortable or facetable.
/// - Non-searchable text (the key included) becomes `keyword`.
/// - Integers, geo points and timestamps map to `integer`, `geo_point` and `date`.
/// - A non-`text` field that is neither filterable, sortable nor facetable is not indexed.
pub fn field_mapping(field: &SchemaField) -> Value {
    let structured = field.is_filterable || field.is_sortable || field.is_facetable;

    let mut mapping = match field.field_type {
        FieldType::Text if field.is_searchable => {
            let mut text = json!({ "type": "text" });
            if structured {
                text["fields"] = json!({ "raw": { "type": "keyword" } });
            }
            return text;
        }
        FieldType::Text => json!({ "type": "keyword" }),
        FieldType::Integer => json!({ "type": "integer" }),
        FieldType::GeoPoint => json!({ "type": "geo_point" }),
        FieldType::Timestamp => json!({ "type": "date" }),
    };

    if !structured {
        mapping["index"] = json!(false);
    }
    mapping
}

/// Get the create-index body (settings and mappings) for a schema.
///
/// # Sharding Configuration
///
/// - 1 primary shard
/// - 1 replica for redundancy
///
/// Fields that are not retrievable are excluded from `_source`.
pub fn get_index_body(schema: &IndexSchema) -> Value {
    let properties: Map<String, Value> = schema
        .fields()
        .iter()
        .map(|field| (field.name.clone(), field_mapping(field)))
        .collect();

    let mut mappings = json!({ "properties": properties });

    let excluded: Vec<&str> = schema
        .fields()
        .iter()
        .filter(|f| !f.is_retrievable)
        .map(|f| f.name.as_str())
        .collect();
    if !excluded.is_empty() {
        mappings["_source"] = json!({ "excludes": excluded });
    }

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": mappings
    })
}
