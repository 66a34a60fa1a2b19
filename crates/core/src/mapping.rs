//! Cross-account identity maps.
//!
//! The source and destination accounts have independent ID spaces, so
//! every foreign key in a cloned record must be remapped. Reference
//! entities (outlets, registers, users, taxes, payment types) are
//! matched by exact name between the two accounts. Owned entities
//! (brands, suppliers, products, customers) grow their map entry by
//! entry as creates succeed on the destination.

use std::collections::HashMap;

use serde_json::Value;

use crate::entity::str_field;

/// Map from source-entity ID to destination-entity ID, scoped to one
/// entity type and one (source, destination) account pair.
///
/// An absent source ID means "unresolvable in destination". Entries are
/// never overwritten once set.
#[derive(Debug, Default, Clone)]
pub struct IdMap {
    entries: HashMap<String, String>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a source -> destination pairing. The first entry for a
    /// source ID wins; later inserts for the same ID are ignored.
    pub fn insert(&mut self, source_id: impl Into<String>, dest_id: impl Into<String>) {
        self.entries.entry(source_id.into()).or_insert_with(|| dest_id.into());
    }

    pub fn get(&self, source_id: &str) -> Option<&str> {
        self.entries.get(source_id).map(String::as_str)
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.entries.contains_key(source_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for IdMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (source_id, dest_id) in iter {
            map.insert(source_id, dest_id);
        }
        map
    }
}

/// Build an identity map for a reference entity by matching names.
///
/// Matching is exact-string and case-sensitive; no trimming or
/// normalization. Items missing an `id` or a non-empty `name` are
/// silently skipped. If the destination has two items with the same
/// name, the later one in list order wins the name index -- which of
/// the two gets targeted is a documented limitation, not a contract.
pub fn map_by_name(source_items: &[Value], dest_items: &[Value]) -> IdMap {
    let mut dest_by_name: HashMap<&str, &str> = HashMap::new();
    for item in dest_items {
        if let (Some(name), Some(id)) = (str_field(item, "name"), str_field(item, "id")) {
            dest_by_name.insert(name, id);
        }
    }

    let mut mapping = IdMap::new();
    for item in source_items {
        let Some(source_id) = str_field(item, "id") else {
            continue;
        };
        let Some(name) = str_field(item, "name") else {
            continue;
        };
        if let Some(dest_id) = dest_by_name.get(name) {
            mapping.insert(source_id, *dest_id);
        }
    }
    mapping
}

/// Build a lowercase-name -> id index from a destination listing.
///
/// Used to deduplicate owned entities (brands, suppliers): a source item
/// whose name already exists on the destination, compared
/// case-insensitively, maps to the existing item instead of creating a
/// duplicate.
pub fn name_index_ci(items: &[Value]) -> HashMap<String, String> {
    let mut index = HashMap::new();
    for item in items {
        if let (Some(name), Some(id)) = (str_field(item, "name"), str_field(item, "id")) {
            index.insert(name.to_lowercase(), id.to_string());
        }
    }
    index
}
