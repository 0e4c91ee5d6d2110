use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Store key holding the ordered crew list.
pub const CREWS_KEY: &str = "crews";
/// Store key holding the scheduled cleanup list.
pub const EVENTS_KEY: &str = "events";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write store file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode store entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key-value persistence over a single JSON document: a map of named keys,
/// each holding a serialized ordered list. The in-memory state is the source
/// of truth for the session; this only degrades future-session durability
/// when it fails.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub const fn open(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the list under `key`. Absent files, absent keys and undecodable
    /// entries all yield an empty list; decode failures are logged, never
    /// surfaced.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };

        let document: Value = match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(e) => {
                eprintln!("store: undecodable document {}: {e}", self.path.display());
                return Vec::new();
            }
        };

        let Some(entry) = document.get(key) else {
            return Vec::new();
        };

        match serde_json::from_value(entry.clone()) {
            Ok(items) => items,
            Err(e) => {
                eprintln!("store: undecodable entry '{key}': {e}");
                Vec::new()
            }
        }
    }

    /// Serialize the full list under `key`, rewriting the document. Other
    /// keys are preserved.
    pub fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let mut document = self.read_document();
        document.insert(key.to_string(), serde_json::to_value(items)?);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let serialized = serde_json::to_string_pretty(&Value::Object(document))?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }

    fn read_document(&self) -> Map<String, Value> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Map::new();
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Crew;

    fn temp_store(name: &str) -> Store {
        let path = std::env::temp_dir().join(format!(
            "shoresquad-store-{name}-{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        Store::open(path)
    }

    fn sample_crew(id: i64, name: &str) -> Crew {
        Crew {
            id,
            name: name.to_string(),
            members: vec!["You".to_string()],
            cleanup_count: 0,
            trash_collected: 0.0,
            created_at: "2025-06-01T08:00:00+08:00".to_string(),
        }
    }

    #[test]
    fn load_missing_file_is_empty() {
        let store = temp_store("missing");
        let crews: Vec<Crew> = store.load(CREWS_KEY);
        assert!(crews.is_empty());
    }

    #[test]
    fn save_then_load_roundtrips_in_order() {
        let store = temp_store("roundtrip");
        let crews = vec![sample_crew(1, "Coast Guards"), sample_crew(2, "Tide Riders")];

        store.save(CREWS_KEY, &crews).unwrap();
        let loaded: Vec<Crew> = store.load(CREWS_KEY);

        assert_eq!(loaded, crews);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn corrupted_document_loads_empty() {
        let store = temp_store("corrupt");
        fs::write(store.path(), "{not json at all").unwrap();

        let crews: Vec<Crew> = store.load(CREWS_KEY);
        assert!(crews.is_empty());
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn undecodable_entry_loads_empty() {
        let store = temp_store("bad-entry");
        fs::write(store.path(), r#"{"crews": "definitely not a list"}"#).unwrap();

        let crews: Vec<Crew> = store.load(CREWS_KEY);
        assert!(crews.is_empty());
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn save_preserves_other_keys() {
        let store = temp_store("preserve");
        fs::write(store.path(), r#"{"events": [{"id": 7, "title": "Dawn sweep", "spot": "changi", "scheduled_for": "2025-06-07"}]}"#)
            .unwrap();

        store.save(CREWS_KEY, &[sample_crew(1, "Early Birds")]).unwrap();

        let events: Vec<crate::domain::CleanupEvent> = store.load(EVENTS_KEY);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Dawn sweep");
        let _ = fs::remove_file(store.path());
    }
}
