//! Whole-file JSON persistence for the hbnb object map.

pub mod error;
pub mod file_storage;
pub mod objects;

pub use error::{StorageError, StorageResult};
pub use file_storage::{DEFAULT_STORAGE_PATH, FileStorage};
pub use objects::ObjectMap;
