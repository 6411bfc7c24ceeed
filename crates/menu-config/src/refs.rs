//! Reference tables: short keys mapped to richer display objects.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::Props;

/// A display object a reference key resolves to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefEntry {
    /// Display text, used as the item label when none is declared.
    pub text: String,
    /// Additional attributes carried into the resolved item (coding scheme, etc).
    #[serde(default)]
    pub attrs: Props,
}

impl RefEntry {
    /// An entry with display text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attrs: Props::new(),
        }
    }

    /// Render as the object that replaces the referencing attribute, stamped
    /// with the original key under `ref`.
    pub fn to_value(&self, key: &str) -> Value {
        let mut obj = self.attrs.clone();
        obj.insert("text".into(), Value::String(self.text.clone()));
        obj.insert("ref".into(), Value::String(key.to_string()));
        Value::Object(obj)
    }
}

/// Lookup from reference key to display object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ReferenceTable(BTreeMap<String, RefEntry>);

impl ReferenceTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, entry: RefEntry) {
        self.0.insert(key.into(), entry);
    }

    /// Builder form of [`Self::insert`].
    pub fn with(mut self, key: impl Into<String>, entry: RefEntry) -> Self {
        self.insert(key, entry);
        self
    }

    /// Entry for `key`; entries with empty text count as missing.
    pub fn get(&self, key: &str) -> Option<&RefEntry> {
        self.0.get(key).filter(|e| !e.text.is_empty())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The table as a JSON object, passed to commands as the `refs` argument.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, e)| (k.clone(), e.to_value(k)))
                .collect(),
        )
    }
}
