//! Entity and time-field mappings.
//!
//! Both mappings are read leniently from the raw configuration document: a
//! section with the wrong shape is logged and treated as empty, and any key
//! starting with [`COMMENT_MARKER`] is dropped.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Keys starting with this character are comments, not data.
pub const COMMENT_MARKER: char = '_';

fn is_comment(key: &str) -> bool {
    key.starts_with(COMMENT_MARKER)
}

/// Business term -> table name, in configuration order.
///
/// Lookups are substring tests against the raw query; the first entry whose
/// term occurs in the query wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityMapping {
    entries: Vec<(String, String)>,
}

impl EntityMapping {
    pub fn new<I, T, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: Into<String>,
    {
        let mut mapping = Self::default();
        for (term, table) in entries {
            mapping.insert(term.into(), table.into());
        }
        mapping
    }

    /// Flatten a `category -> {term -> table}` section.
    pub fn from_config(section: &Value) -> Self {
        let mut mapping = Self::default();
        let Some(categories) = section.as_object() else {
            if !section.is_null() {
                warn!("entity_mappings is not an object, ignoring it");
            }
            return mapping;
        };

        for (category, entities) in categories {
            if is_comment(category) {
                continue;
            }
            let Some(entities) = entities.as_object() else {
                warn!(category = %category, "entity mapping category is not an object, skipping");
                continue;
            };
            for (term, table) in entities {
                if is_comment(term) {
                    continue;
                }
                match table.as_str() {
                    Some(table) => mapping.insert(term.clone(), table.to_string()),
                    None => warn!(term = %term, "entity mapping target is not a string, skipping"),
                }
            }
        }

        mapping
    }

    /// A repeated term keeps its first position and takes the newest table.
    fn insert(&mut self, term: String, table: String) {
        match self.entries.iter_mut().find(|(t, _)| *t == term) {
            Some(entry) => entry.1 = table,
            None => self.entries.push((term, table)),
        }
    }

    /// The table of the first term that occurs in `query`.
    pub fn lookup(&self, query: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(term, _)| !term.is_empty() && query.contains(term.as_str()))
            .map(|(_, table)| table.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, n)| (t.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Table name -> canonical timestamp column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeFieldMapping {
    fields: HashMap<String, String>,
}

impl TimeFieldMapping {
    pub fn new<I, T, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            fields: entries
                .into_iter()
                .map(|(t, c)| (t.into(), c.into()))
                .collect(),
        }
    }

    pub fn from_config(section: &Value) -> Self {
        Self::new(string_pairs(section, "time_field_mappings"))
    }

    pub fn field_for(&self, table: &str) -> Option<&str> {
        self.fields.get(table).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Custom rule patterns from `custom_query_patterns.examples`.
pub fn custom_patterns(section: &Value) -> Vec<(String, String)> {
    match section.get("examples") {
        Some(examples) => string_pairs(examples, "custom_query_patterns.examples"),
        None => Vec::new(),
    }
}

/// Non-comment `key -> string` pairs of a flat object, in document order.
fn string_pairs(section: &Value, label: &str) -> Vec<(String, String)> {
    let Some(object) = section.as_object() else {
        if !section.is_null() {
            warn!(section = label, "expected an object, ignoring it");
        }
        return Vec::new();
    };

    object
        .iter()
        .filter(|(key, _)| !is_comment(key))
        .filter_map(|(key, value)| match value.as_str() {
            Some(s) => Some((key.clone(), s.to_string())),
            None => {
                warn!(section = label, key = %key, "value is not a string, skipping");
                None
            }
        })
        .collect()
}
