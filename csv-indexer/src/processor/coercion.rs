//! Column coercion rules.
//!
//! Which rule applies to a column depends on its name only. The table is built
//! once from the schema and consulted for every cell; columns the schema doesn't
//! declare pass through as text.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use csv_indexer_shared::{FieldType, IndexSchema};

use super::geo::GeoColumns;

/// How a column's raw text becomes a document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    /// The document key, always carried as text.
    Key,
    /// Verbatim text, empty string included.
    Text,
    /// 32-bit integer; omitted when the text doesn't parse.
    Integer,
    /// Date/time with offset; omitted when empty or unparseable.
    Timestamp,
    /// Feeds the geo point's latitude, never written itself.
    Latitude,
    /// Feeds the geo point's longitude, never written itself.
    Longitude,
    /// Reserved for a derived field; source cells are ignored.
    Derived,
}

/// Lookup from column name to coercion rule.
#[derive(Debug, Clone)]
pub struct CoercionTable {
    rules: HashMap<String, ColumnRule>,
}

impl CoercionTable {
    /// Derive the rules from a schema and the geo columns.
    pub fn from_schema(schema: &IndexSchema, geo: &GeoColumns) -> Self {
        let mut rules: HashMap<String, ColumnRule> = schema
            .fields()
            .iter()
            .map(|field| {
                let rule = match field.field_type {
                    _ if field.is_key => ColumnRule::Key,
                    FieldType::Text => ColumnRule::Text,
                    FieldType::Integer => ColumnRule::Integer,
                    FieldType::Timestamp => ColumnRule::Timestamp,
                    FieldType::GeoPoint => ColumnRule::Derived,
                };
                (field.name.clone(), rule)
            })
            .collect();

        rules.insert(geo.target.clone(), ColumnRule::Derived);
        rules.insert(geo.latitude.clone(), ColumnRule::Latitude);
        rules.insert(geo.longitude.clone(), ColumnRule::Longitude);

        Self { rules }
    }

    /// Rule for a column; undeclared columns are text.
    pub fn rule(&self, column: &str) -> ColumnRule {
        self.rules.get(column).copied().unwrap_or(ColumnRule::Text)
    }
}

/// Parse an integer cell. Surrounding whitespace and a leading sign are accepted.
pub fn coerce_integer(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}

const DATE_TIME_FORMATS: [&str; 6] = [
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date/time cell and attach `offset`.
///
/// Text that already carries an offset (RFC 3339) keeps it. Date-only values
/// resolve to midnight. Empty or unrecognized text yields `None`.
pub fn coerce_timestamp(raw: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp);
    }

    let naive = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    naive.and_local_timezone(offset).single()
}
