//! Index schema declaration.
//!
//! A schema is the ordered set of fields an index is created with. Each field
//! carries a declared type and the capability flags the search backend uses to
//! decide how the field is indexed.

use std::collections::HashSet;
use thiserror::Error;

/// Declared type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Free or keyword text.
    Text,
    /// 32-bit signed integer.
    Integer,
    /// A (latitude, longitude) pair.
    GeoPoint,
    /// Date and time with a UTC offset.
    Timestamp,
}

/// A single field declaration with its capability flags.
///
/// Fields start out retrievable and with every other capability switched off;
/// use the builder methods to enable the rest.
///
/// # Example
///
/// ```
/// use csv_indexer_shared::{FieldType, SchemaField};
///
/// let field = SchemaField::new("FEATURE_NAME", FieldType::Text)
///     .searchable()
///     .filterable()
///     .sortable();
/// assert!(field.is_searchable);
/// assert!(!field.is_facetable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub field_type: FieldType,
    pub is_key: bool,
    pub is_searchable: bool,
    pub is_filterable: bool,
    pub is_sortable: bool,
    pub is_facetable: bool,
    pub is_retrievable: bool,
}

impl SchemaField {
    /// Create a retrievable field with no other capabilities.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            is_key: false,
            is_searchable: false,
            is_filterable: false,
            is_sortable: false,
            is_facetable: false,
            is_retrievable: true,
        }
    }

    /// Mark this field as the document key.
    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.is_searchable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.is_filterable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.is_sortable = true;
        self
    }

    pub fn facetable(mut self) -> Self {
        self.is_facetable = true;
        self
    }

    /// Exclude this field from retrieved documents.
    pub fn hidden(mut self) -> Self {
        self.is_retrievable = false;
        self
    }
}

/// Errors raised when a schema declaration is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Index name must not be empty")]
    EmptyIndexName,

    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    #[error("Schema must declare exactly one key field, found {0}")]
    KeyCount(usize),

    #[error("Key field {0} must be of type text")]
    NonTextKey(String),
}

/// A validated index schema.
///
/// Construction guarantees unique field names and exactly one text key field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    name: String,
    fields: Vec<SchemaField>,
    key_index: usize,
}

impl IndexSchema {
    /// Validate and build a schema.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name the schema is declared for
    /// * `fields` - Field declarations in declaration order
    ///
    /// # Returns
    ///
    /// * `Ok(IndexSchema)` - If the declaration is consistent
    /// * `Err(SchemaError)` - On duplicate names or a missing/ambiguous key
    pub fn new(name: impl Into<String>, fields: Vec<SchemaField>) -> Result<Self, SchemaError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SchemaError::EmptyIndexName);
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }

        let keys: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_key)
            .map(|(i, _)| i)
            .collect();
        if keys.len() != 1 {
            return Err(SchemaError::KeyCount(keys.len()));
        }

        let key_index = keys[0];
        if fields[key_index].field_type != FieldType::Text {
            return Err(SchemaError::NonTextKey(fields[key_index].name.clone()));
        }

        Ok(Self {
            name,
            fields,
            key_index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// The single key field.
    pub fn key_field(&self) -> &SchemaField {
        &self.fields[self.key_index]
    }
}
