use super::MetadataStore;
use crate::error::{Result, SnipzError};
use crate::model::Metadata;
use std::collections::BTreeMap;

/// Metadata held in a map. Same contract as the SQLite store, nothing persisted.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: BTreeMap<String, Metadata>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl MetadataStore for InMemoryStore {
    fn insert(&mut self, record: &Metadata) -> Result<()> {
        if self.rows.contains_key(&record.key) {
            return Err(SnipzError::Duplicate(record.key.clone()));
        }
        self.rows.insert(record.key.clone(), record.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Metadata> {
        self.rows
            .get(key)
            .cloned()
            .ok_or_else(|| SnipzError::MetadataNotFound(key.to_string()))
    }

    fn list(&self) -> Result<Vec<Metadata>> {
        let mut records: Vec<Metadata> = self.rows.values().cloned().collect();
        records.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.key.cmp(&b.key)));
        Ok(records)
    }

    fn update(&mut self, record: &Metadata) -> Result<()> {
        let row = self
            .rows
            .get_mut(&record.key)
            .ok_or_else(|| SnipzError::MetadataNotFound(record.key.clone()))?;
        let created = row.created;
        *row = record.clone();
        row.created = created;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.rows
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| SnipzError::MetadataNotFound(key.to_string()))
    }
}
