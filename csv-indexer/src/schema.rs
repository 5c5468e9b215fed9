//! The features index schema.
//!
//! Field names, types and capability flags are fixed so that a rebuilt index is
//! a drop-in replacement for an existing one.

use csv_indexer_shared::{FieldType, IndexSchema, SchemaError, SchemaField};

use crate::processor::GeoColumns;

/// Default index name.
pub const INDEX_NAME: &str = "features";

/// Key field.
pub const KEY_FIELD: &str = "FEATURE_ID";

/// Reserved field the synthesized geo point is stored under.
pub const LOCATION_FIELD: &str = "LOCATION";

/// Source column holding decimal latitude.
pub const LATITUDE_COLUMN: &str = "PRIM_LAT_DEC";

/// Source column holding decimal longitude.
pub const LONGITUDE_COLUMN: &str = "PRIM_LONG_DEC";

/// Build the 15-field features schema for the given index name.
pub fn features_schema(index_name: &str) -> Result<IndexSchema, SchemaError> {
    IndexSchema::new(
        index_name,
        vec![
            SchemaField::new(KEY_FIELD, FieldType::Text).key(),
            searchable_text("FEATURE_NAME"),
            searchable_text("FEATURE_CLASS"),
            searchable_text("STATE_ALPHA"),
            facet_integer("STATE_NUMERIC"),
            searchable_text("COUNTY_NAME"),
            facet_integer("COUNTY_NUMERIC"),
            SchemaField::new(LOCATION_FIELD, FieldType::GeoPoint)
                .filterable()
                .sortable(),
            facet_integer("ELEV_IN_M"),
            facet_integer("ELEV_IN_FT"),
            searchable_text("MAP_NAME"),
            SchemaField::new("DESCRIPTION", FieldType::Text).searchable(),
            SchemaField::new("HISTORY", FieldType::Text).searchable(),
            facet_timestamp("DATE_CREATED"),
            facet_timestamp("DATE_EDITED"),
        ],
    )
}

/// Geo columns for the features source.
pub fn features_geo_columns() -> GeoColumns {
    GeoColumns::new(LATITUDE_COLUMN, LONGITUDE_COLUMN, LOCATION_FIELD)
}

fn searchable_text(name: &str) -> SchemaField {
    SchemaField::new(name, FieldType::Text)
        .searchable()
        .filterable()
        .sortable()
}

fn facet_integer(name: &str) -> SchemaField {
    SchemaField::new(name, FieldType::Integer)
        .filterable()
        .sortable()
        .facetable()
}

fn facet_timestamp(name: &str) -> SchemaField {
    SchemaField::new(name, FieldType::Timestamp)
        .filterable()
        .sortable()
        .facetable()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (name, type, key, searchable, filterable, sortable, facetable)
    type Expected = (&'static str, FieldType, bool, bool, bool, bool, bool);

    const EXPECTED: [Expected; 15] = [
        ("FEATURE_ID", FieldType::Text, true, false, false, false, false),
        ("FEATURE_NAME", FieldType::Text, false, true, true, true, false),
        ("FEATURE_CLASS", FieldType::Text, false, true, true, true, false),
        ("STATE_ALPHA", FieldType::Text, false, true, true, true, false),
        ("STATE_NUMERIC", FieldType::Integer, false, false, true, true, true),
        ("COUNTY_NAME", FieldType::Text, false, true, true, true, false),
        ("COUNTY_NUMERIC", FieldType::Integer, false, false, true, true, true),
        ("LOCATION", FieldType::GeoPoint, false, false, true, true, false),
        ("ELEV_IN_M", FieldType::Integer, false, false, true, true, true),
        ("ELEV_IN_FT", FieldType::Integer, false, false, true, true, true),
        ("MAP_NAME", FieldType::Text, false, true, true, true, false),
        ("DESCRIPTION", FieldType::Text, false, true, false, false, false),
        ("HISTORY", FieldType::Text, false, true, false, false, false),
        ("DATE_CREATED", FieldType::Timestamp, false, false, true, true, true),
        ("DATE_EDITED", FieldType::Timestamp, false, false, true, true, true),
    ];

    #[test]
    fn test_features_schema_matches_declaration() {
        let schema = features_schema(INDEX_NAME).unwrap();
        assert_eq!(schema.name(), "features");
        assert_eq!(schema.fields().len(), EXPECTED.len());

        for (field, expected) in schema.fields().iter().zip(EXPECTED.iter()) {
            let (name, field_type, key, searchable, filterable, sortable, facetable) = *expected;
            assert_eq!(field.name, name);
            assert_eq!(field.field_type, field_type, "type of {}", name);
            assert_eq!(field.is_key, key, "key flag of {}", name);
            assert_eq!(field.is_searchable, searchable, "searchable flag of {}", name);
            assert_eq!(field.is_filterable, filterable, "filterable flag of {}", name);
            assert_eq!(field.is_sortable, sortable, "sortable flag of {}", name);
            assert_eq!(field.is_facetable, facetable, "facetable flag of {}", name);
            assert!(field.is_retrievable, "retrievable flag of {}", name);
        }
    }

    #[test]
    fn test_features_schema_key() {
        let schema = features_schema("features_test").unwrap();
        assert_eq!(schema.key_field().name, KEY_FIELD);
        assert_eq!(schema.name(), "features_test");
    }
}
