//! Entity identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a stored entity.
///
/// Fresh identifiers are random UUIDs (v4) rendered in their hyphenated form. Identifiers read
/// back from a persisted document are kept verbatim, whatever their shape, so this wraps a
/// `String` rather than a `Uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Store key of an entity: `"<ClassName>.<id>"`.
pub fn storage_key(class_name: &str, id: &str) -> String {
    format!("{class_name}.{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_hyphenated_uuids() {
        let id = EntityId::new();
        let parsed = Uuid::parse_str(id.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(id.as_str().len(), 36);
    }

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(EntityId::new(), EntityId::new());
    }

    #[test]
    fn arbitrary_ids_are_kept_verbatim() {
        let id = EntityId::from("1234-abcd");
        assert_eq!(id.to_string(), "1234-abcd");
        assert_eq!(storage_key("State", id.as_str()), "State.1234-abcd");
    }
}
