//! File-backed object store.
//!
//! The whole map is serialized to one JSON document on every save:
//!
//! ```text
//! { "State.<id>": { "id": ..., "created_at": "2017-09-28T21:03:54.052298", ..., "class_name": "State" }, ... }
//! ```
//!
//! Writes go through a temporary file in the same directory that is renamed over the target,
//! so a reader never observes a half-written document.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use hbnb_core::Entity;
use hbnb_models::{AttrType, Model, ModelKind};

use crate::error::{StorageError, StorageResult};
use crate::objects::ObjectMap;

pub const DEFAULT_STORAGE_PATH: &str = "file.json";

#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    objects: ObjectMap,
}

impl FileStorage {
    /// Empty store bound to `path`. Nothing is read until [`reload`](Self::reload).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            objects: ObjectMap::new(),
        }
    }

    /// Store bound to `path`, populated from the file if it can be read.
    ///
    /// A missing file is an empty store. An unreadable or malformed file is logged and also
    /// yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut storage = Self::new(path);
        if let Err(err) = storage.reload() {
            tracing::warn!(path = %storage.path.display(), error = %err, "starting with an empty store");
            storage.objects.clear();
        }
        storage
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Live object map.
    pub fn all(&self) -> &ObjectMap {
        &self.objects
    }

    /// Live object map, for callers that remove or mutate entries in place.
    pub fn all_mut(&mut self) -> &mut ObjectMap {
        &mut self.objects
    }

    /// Register an entity under its `"<ClassName>.<id>"` key. Does not persist.
    pub fn register(&mut self, model: Model) -> String {
        let key = model.storage_key();
        self.objects.insert(key.clone(), model);
        key
    }

    /// Constructible classes.
    pub fn classes(&self) -> &'static [ModelKind] {
        &ModelKind::ALL
    }

    /// Coercion table of one class.
    pub fn attributes(&self, kind: ModelKind) -> &'static [(&'static str, AttrType)] {
        kind.attributes()
    }

    /// Refresh the entity's `updated_at`, then persist the whole store.
    ///
    /// Returns `Ok(false)` when no entity lives under `key`.
    pub fn save_object(&mut self, key: &str) -> StorageResult<bool> {
        match self.objects.get_mut(key) {
            Some(model) => model.touch(),
            None => return Ok(false),
        }
        self.save()?;
        Ok(true)
    }

    /// Serialize every entity into the document, replacing previous content.
    pub fn save(&self) -> StorageResult<()> {
        let mut document = Map::new();
        for (key, model) in self.objects.iter() {
            document.insert(key.to_string(), Value::Object(model.to_record()));
        }
        let payload = serde_json::to_string(&Value::Object(document))?;
        self.write_atomically(payload.as_bytes())?;
        tracing::debug!(path = %self.path.display(), objects = self.objects.len(), "store saved");
        Ok(())
    }

    /// Read the document and register every entity it holds.
    ///
    /// A missing file is not an error. Records that cannot be rebuilt are skipped with a
    /// warning. Returns the number of entities loaded.
    pub fn reload(&mut self) -> StorageResult<usize> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(StorageError::io(&self.path, err)),
        };

        let document = match serde_json::from_str::<Value>(&raw)? {
            Value::Object(document) => document,
            _ => return Err(StorageError::NotAnObject),
        };

        let mut loaded = 0;
        for (key, record) in &document {
            let rebuilt = match record {
                Value::Object(record) => Model::from_record(record),
                _ => {
                    tracing::warn!(%key, "skipping record that is not an object");
                    continue;
                }
            };
            match rebuilt {
                Ok(model) => {
                    if model.storage_key() != *key {
                        tracing::warn!(%key, actual = %model.storage_key(), "record key does not match its content");
                    }
                    self.register(model);
                    loaded += 1;
                }
                Err(err) => tracing::warn!(%key, error = %err, "skipping unreadable record"),
            }
        }

        tracing::info!(path = %self.path.display(), objects = loaded, "store loaded");
        Ok(loaded)
    }

    fn write_atomically(&self, payload: &[u8]) -> StorageResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| StorageError::io(&dir, e))?;
        let tmp_path = tmp.path().to_path_buf();
        tmp.write_all(payload)
            .map_err(|e| StorageError::io(&tmp_path, e))?;
        tmp.flush().map_err(|e| StorageError::io(&tmp_path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| StorageError::io(&self.path, e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, FileStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("file.json"));
        (dir, storage)
    }

    #[test]
    fn reload_of_missing_file_is_a_no_op() {
        let (_dir, mut storage) = temp_store();
        assert_eq!(storage.reload().unwrap(), 0);
        assert!(storage.all().is_empty());
    }

    #[test]
    fn register_does_not_persist() {
        let (_dir, mut storage) = temp_store();
        storage.register(ModelKind::User.construct());
        assert_eq!(storage.all().len(), 1);
        assert!(!storage.path().exists());
    }

    #[test]
    fn save_then_reload_reproduces_entities() {
        let (dir, mut storage) = temp_store();
        let mut place = ModelKind::Place.construct();
        place.set_attribute("name", json!("Loft")).unwrap();
        place.set_attribute("latitude", json!(37.773972)).unwrap();
        place.set_attribute("max_guest", json!(4)).unwrap();
        let place_key = storage.register(place);
        let user_key = storage.register(ModelKind::User.construct());
        storage.save().unwrap();

        let mut fresh = FileStorage::new(dir.path().join("file.json"));
        assert_eq!(fresh.reload().unwrap(), 2);
        assert_eq!(
            fresh.all().keys().collect::<Vec<_>>(),
            vec![place_key.as_str(), user_key.as_str()]
        );
        assert_eq!(fresh.all().get(&place_key), storage.all().get(&place_key));
        assert_eq!(fresh.all().get(&user_key), storage.all().get(&user_key));
    }

    #[test]
    fn document_is_keyed_by_class_and_id() {
        let (_dir, mut storage) = temp_store();
        let key = storage.register(ModelKind::State.construct());
        storage.save().unwrap();

        let raw = fs::read_to_string(storage.path()).unwrap();
        let document: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(document[&key]["class_name"], json!("State"));
        assert!(document[&key]["created_at"].is_string());
    }

    #[test]
    fn save_object_refreshes_updated_at_and_persists() {
        let (_dir, mut storage) = temp_store();
        let key = storage.register(ModelKind::Amenity.construct());
        let before = storage.all().get(&key).unwrap().updated_at();
        std::thread::sleep(std::time::Duration::from_millis(2));

        assert!(storage.save_object(&key).unwrap());
        let after = storage.all().get(&key).unwrap().updated_at();
        assert!(after > before);
        assert!(storage.path().exists());

        assert!(!storage.save_object("Amenity.missing").unwrap());
    }

    #[test]
    fn removed_entities_disappear_from_the_document() {
        let (dir, mut storage) = temp_store();
        let key = storage.register(ModelKind::Review.construct());
        storage.save().unwrap();
        storage.all_mut().remove(&key);
        storage.save().unwrap();

        let mut fresh = FileStorage::new(dir.path().join("file.json"));
        assert_eq!(fresh.reload().unwrap(), 0);
    }

    #[test]
    fn malformed_document_opens_empty() {
        let (dir, _storage) = temp_store();
        let path = dir.path().join("file.json");
        fs::write(&path, "{not json").unwrap();

        let mut storage = FileStorage::new(&path);
        assert!(matches!(storage.reload(), Err(StorageError::Json(_))));
        assert!(FileStorage::open(&path).all().is_empty());
    }

    #[test]
    fn unreadable_records_are_skipped() {
        let (dir, _storage) = temp_store();
        let path = dir.path().join("file.json");
        let document = json!({
            "State.ok": {
                "class_name": "State",
                "id": "ok",
                "created_at": "2017-09-28T21:03:54.052298",
                "updated_at": "2017-09-28T21:03:54.052302"
            },
            "Ghost.x": {"class_name": "Ghost", "id": "x"},
            "State.bad": {"class_name": "State", "id": "bad", "created_at": "never"}
        });
        fs::write(&path, document.to_string()).unwrap();

        let storage = FileStorage::open(&path);
        assert_eq!(storage.all().keys().collect::<Vec<_>>(), vec!["State.ok"]);
    }
}
