//! Per-module pass state: computed schemas and documents needing an import.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::project::DocumentKey;

/// Type name → canonical schema text, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaTable {
    entries: IndexMap<String, String>,
}

impl SchemaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `schema` under `name`, returning the schema it replaced.
    pub fn insert(&mut self, name: impl Into<String>, schema: String) -> Option<String> {
        self.entries.insert(name.into(), schema)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Documents that received a new annotation and so need the `ai` import.
pub type ImportRequirementSet = BTreeSet<DocumentKey>;

/// State shared by both phases of one module.
#[derive(Debug, Default)]
pub(crate) struct ModifierData {
    pub(crate) type_schemas: SchemaTable,
    pub(crate) ai_import_required: ImportRequirementSet,
}
