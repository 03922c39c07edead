//! Insertion-ordered map of live entities keyed by `"<ClassName>.<id>"`.

use std::collections::HashMap;

use hbnb_models::{Model, ModelKind};

/// Live object map.
///
/// Iteration follows insertion order, so `all` lists entities in the order they were created
/// or loaded. Re-inserting an existing key keeps its original position.
#[derive(Debug, Default, Clone)]
pub struct ObjectMap {
    entries: HashMap<String, Model>,
    order: Vec<String>,
}

impl ObjectMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Model> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Model> {
        self.entries.get_mut(key)
    }

    /// Insert or replace; returns the previous entity under `key`.
    pub fn insert(&mut self, key: String, model: Model) -> Option<Model> {
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.entries.insert(key, model)
    }

    pub fn remove(&mut self, key: &str) -> Option<Model> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Model)> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get(k).map(|m| (k.as_str(), m)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Model> {
        self.iter().map(|(_, m)| m)
    }

    /// Number of keys carrying the `"<ClassName>."` prefix.
    pub fn count_of(&self, kind: ModelKind) -> usize {
        let prefix = format!("{}.", kind.name());
        self.keys().filter(|k| k.starts_with(&prefix)).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
