//! SchemaProvider trait definition.
//!
//! The planner never talks to a database. It reads table metadata through
//! this trait, which a caller backs with whatever discovery mechanism it has.
//! [`SchemaSnapshot`] is the in-memory implementation used by the CLI and
//! the tests.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::types::{RelatedTable, TableKeywords, TableSchema};

/// Error type for schema snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to read schema snapshot: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse schema snapshot: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Duplicate table in schema snapshot: {0}")]
    DuplicateTable(String),
}

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Read access to table metadata.
///
/// Keyword sets are computed once when the provider learns about its tables
/// and must be refreshed whenever the underlying schema changes.
pub trait SchemaProvider {
    /// Metadata for one table, or `None` if the table is unknown.
    fn get_schema(&self, table: &str) -> Option<&TableSchema>;

    /// Every known table, in discovery order.
    fn tables(&self) -> Vec<&TableSchema>;

    /// Precomputed keyword sets, in discovery order.
    fn table_keywords(&self) -> &[TableKeywords];

    /// Column names of a table; empty when the table is unknown.
    fn columns(&self, table: &str) -> &[String] {
        self.get_schema(table)
            .map(|s| s.columns.as_slice())
            .unwrap_or(&[])
    }

    /// Other tables sharing column names with `primary`, best first.
    ///
    /// Score is the number of shared columns over the larger column count.
    fn suggest_related_tables(&self, primary: &str) -> Vec<RelatedTable> {
        let Some(primary_schema) = self.get_schema(primary) else {
            return Vec::new();
        };
        let primary_columns: BTreeSet<&str> =
            primary_schema.columns.iter().map(String::as_str).collect();

        let mut related: Vec<RelatedTable> = self
            .tables()
            .into_iter()
            .filter(|t| t.name != primary)
            .filter_map(|other| {
                let other_columns: BTreeSet<&str> =
                    other.columns.iter().map(String::as_str).collect();
                let shared: Vec<String> = primary_columns
                    .intersection(&other_columns)
                    .map(|c| c.to_string())
                    .collect();
                if shared.is_empty() {
                    return None;
                }
                let larger = primary_columns.len().max(other_columns.len());
                Some(RelatedTable {
                    table: other.name.clone(),
                    score: shared.len() as f64 / larger as f64,
                    shared_columns: shared,
                })
            })
            .collect();

        related.sort_by(|a, b| b.score.total_cmp(&a.score));
        related
    }
}

/// Serialized form of a snapshot file.
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    tables: Vec<TableSchema>,
}

/// An in-memory schema with precomputed keywords.
#[derive(Debug, Clone, Default)]
pub struct SchemaSnapshot {
    tables: Vec<TableSchema>,
    keywords: Vec<TableKeywords>,
}

impl SchemaSnapshot {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        let keywords = tables.iter().map(TableKeywords::from).collect();
        Self { tables, keywords }
    }

    /// Load a snapshot from JSON: `{"tables": [{"name", "columns", "primary_keys"}]}`.
    pub fn from_json_str(content: &str) -> SnapshotResult<Self> {
        let file: SnapshotFile = serde_json::from_str(content)?;

        let mut seen = BTreeSet::new();
        for table in &file.tables {
            if !seen.insert(table.name.as_str()) {
                return Err(SnapshotError::DuplicateTable(table.name.clone()));
            }
        }

        Ok(Self::new(file.tables))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> SnapshotResult<Self> {
        let path = path.as_ref();
        let snapshot = Self::from_json_str(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), tables = snapshot.len(), "loaded schema snapshot");
        Ok(snapshot)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl SchemaProvider for SchemaSnapshot {
    fn get_schema(&self, table: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == table)
    }

    fn tables(&self) -> Vec<&TableSchema> {
        self.tables.iter().collect()
    }

    fn table_keywords(&self) -> &[TableKeywords] {
        &self.keywords
    }
}

impl<P: SchemaProvider + ?Sized> SchemaProvider for &P {
    fn get_schema(&self, table: &str) -> Option<&TableSchema> {
        (**self).get_schema(table)
    }

    fn tables(&self) -> Vec<&TableSchema> {
        (**self).tables()
    }

    fn table_keywords(&self) -> &[TableKeywords] {
        (**self).table_keywords()
    }
}
