#![allow(dead_code)]

//! Tag Registry: canonicalizes tag text and tracks aliases and usage counts.
//!
//! One registry lives inside each `ResumeModel`. It only grows while the
//! document is parsed and is read-only afterwards.

use std::collections::HashMap;

use serde::Serialize;

/// Canonical record for a tag. Identity is `id` (the lowercased text).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagRecord {
    /// Original casing of the most recent declaration carrying aliases.
    pub title: String,
    pub id: String,
    pub aliases: Vec<String>,
    /// Number of parse-time references across all entities and declarations.
    pub uses: u32,
}

/// Insertion-ordered tag registry keyed by canonical id.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    records: Vec<TagRecord>,
    index: HashMap<String, usize>,
}

/// Lowercases tag text into its canonical id.
pub fn canonical_id(text: &str) -> String {
    text.to_lowercase()
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one reference to `text`.
    ///
    /// A new id starts at `uses = 1`. An existing id has its count bumped, and
    /// when `aliases` is non-empty the stored aliases and title are replaced by
    /// this call's values.
    pub fn register(&mut self, text: &str, aliases: &[String]) -> &TagRecord {
        let id = canonical_id(text);
        let existing = self.index.get(&id).copied();
        let slot = match existing {
            Some(slot) => {
                let record = &mut self.records[slot];
                record.uses += 1;
                if !aliases.is_empty() {
                    record.title = text.to_string();
                    record.aliases = aliases.to_vec();
                }
                slot
            }
            None => {
                let slot = self.records.len();
                self.records.push(TagRecord {
                    title: text.to_string(),
                    id: id.clone(),
                    aliases: aliases.to_vec(),
                    uses: 1,
                });
                self.index.insert(id, slot);
                slot
            }
        };
        &self.records[slot]
    }

    pub fn get(&self, id: &str) -> Option<&TagRecord> {
        self.index.get(id).map(|&slot| &self.records[slot])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TagRecord> {
        self.records.iter()
    }

    /// Snapshot ordered by `uses` descending. Ties keep registration order.
    pub fn sorted_by_uses(&self) -> Vec<TagRecord> {
        let mut sorted = self.records.clone();
        // `sort_by` is stable, so equal counts stay in insertion order.
        sorted.sort_by(|a, b| b.uses.cmp(&a.uses));
        sorted
    }
}
