//! Entity trait: identity + continuity across state changes.

use chrono::{DateTime, Utc};

use crate::id::{EntityId, storage_key};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Name of the concrete type; namespaces identifiers in the store.
    fn class_name(&self) -> &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> &EntityId;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    /// Key under which the entity lives in the store.
    fn storage_key(&self) -> String {
        storage_key(self.class_name(), self.id().as_str())
    }
}
