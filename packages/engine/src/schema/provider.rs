use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::DialectError;

/// Per-table catalog facts the rewrite engine needs from the backend.
///
/// Table names are matched ASCII-case-insensitively.
pub trait SchemaMetadataProvider {
    /// Unique indexes (primary key included) as `index name -> column names`.
    fn unique_indexes(&self, table: &str) -> Option<&BTreeMap<String, Vec<String>>>;
    /// All columns of the table in schema order.
    fn columns(&self, table: &str) -> Option<&[String]>;
    /// Server-generated identity columns as `column name -> ordinal position`.
    fn auto_increment_columns(&self, table: &str) -> Option<&BTreeMap<String, usize>>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaMetadata {
    pub unique_indexes: HashMap<String, BTreeMap<String, Vec<String>>>,
    pub columns: HashMap<String, Vec<String>>,
    pub auto_increment: HashMap<String, BTreeMap<String, usize>>,
}

/// One row of the unique/primary constraint catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConstraintRow {
    pub table: String,
    pub constraint: String,
    pub column: String,
}

/// One row of the column catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumnRow {
    pub table: String,
    pub column: String,
    pub ordinal: usize,
    pub is_identity: bool,
}

impl SchemaMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, DialectError> {
        serde_json::from_str(json).map_err(|error| DialectError::Metadata(error.to_string()))
    }

    /// Builds metadata from the rows returned by the backend catalog queries.
    pub fn from_catalog_rows(
        constraints: impl IntoIterator<Item = CatalogConstraintRow>,
        columns: impl IntoIterator<Item = CatalogColumnRow>,
    ) -> Self {
        let mut metadata = Self::new();
        for row in constraints {
            metadata
                .unique_indexes
                .entry(row.table)
                .or_default()
                .entry(row.constraint)
                .or_default()
                .push(row.column);
        }

        let mut columns = columns.into_iter().collect::<Vec<_>>();
        columns.sort_by_key(|row| row.ordinal);
        for row in columns {
            if row.is_identity {
                metadata
                    .auto_increment
                    .entry(row.table.clone())
                    .or_default()
                    .insert(row.column.clone(), row.ordinal);
            }
            metadata.columns.entry(row.table).or_default().push(row.column);
        }
        metadata
    }

    pub fn with_unique_index<I, S>(mut self, table: &str, index: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_indexes
            .entry(table.to_string())
            .or_default()
            .insert(index.to_string(), columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_columns<I, S>(mut self, table: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.insert(
            table.to_string(),
            columns.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn with_auto_increment(mut self, table: &str, column: &str, ordinal: usize) -> Self {
        self.auto_increment
            .entry(table.to_string())
            .or_default()
            .insert(column.to_string(), ordinal);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.unique_indexes.is_empty() && self.columns.is_empty() && self.auto_increment.is_empty()
    }
}

impl SchemaMetadataProvider for SchemaMetadata {
    fn unique_indexes(&self, table: &str) -> Option<&BTreeMap<String, Vec<String>>> {
        lookup_table(&self.unique_indexes, table)
    }

    fn columns(&self, table: &str) -> Option<&[String]> {
        lookup_table(&self.columns, table).map(Vec::as_slice)
    }

    fn auto_increment_columns(&self, table: &str) -> Option<&BTreeMap<String, usize>> {
        lookup_table(&self.auto_increment, table)
    }
}

fn lookup_table<'a, V>(map: &'a HashMap<String, V>, table: &str) -> Option<&'a V> {
    if let Some(value) = map.get(table) {
        return Some(value);
    }
    map.iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(table))
        .map(|(_, value)| value)
}
