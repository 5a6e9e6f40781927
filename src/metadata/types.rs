//! Schema metadata types.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Name parts are split on underscores, whitespace and hyphens.
static NAME_DELIMITERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_\s-]+").unwrap());

/// One table: name, columns in schema order, primary-key columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,

    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub primary_keys: BTreeSet<String>,
}

impl TableSchema {
    pub fn new<I, S>(name: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
            primary_keys: BTreeSet::new(),
        }
    }

    pub fn with_primary_key(mut self, column: &str) -> Self {
        self.primary_keys.insert(column.to_string());
        self
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Keywords the fuzzy matcher compares query tokens against.
    ///
    /// The lowercase table name, every name part longer than two characters
    /// (plus a four-character prefix of parts longer than four), and every
    /// column-name part longer than two characters.
    pub fn keywords(&self) -> BTreeSet<String> {
        let mut keywords = BTreeSet::new();
        let table = self.name.to_lowercase();
        keywords.insert(table.clone());

        for part in name_parts(&table) {
            if part.chars().count() > 4 {
                keywords.insert(part.chars().take(4).collect());
            }
            keywords.insert(part.to_string());
        }

        for column in &self.columns {
            let column = column.to_lowercase();
            keywords.extend(name_parts(&column).map(str::to_string));
        }

        keywords
    }
}

fn name_parts(name: &str) -> impl Iterator<Item = &str> {
    NAME_DELIMITERS
        .split(name)
        .filter(|part| part.chars().count() > 2)
}

/// Precomputed keyword set for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableKeywords {
    pub table: String,
    pub keywords: BTreeSet<String>,
}

impl From<&TableSchema> for TableKeywords {
    fn from(schema: &TableSchema) -> Self {
        Self {
            table: schema.name.clone(),
            keywords: schema.keywords(),
        }
    }
}

/// A table related to another through shared column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedTable {
    pub table: String,
    /// Shared columns over the larger column count.
    pub score: f64,
    pub shared_columns: Vec<String>,
}
