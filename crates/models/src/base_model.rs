//! Identity and timestamp component shared by every entity kind.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use hbnb_core::repr::{str_repr, value_repr};
use hbnb_core::timestamp::{self, datetime_repr, format_timestamp, parse_timestamp};
use hbnb_core::{DomainError, DomainResult, Entity, EntityId};

use crate::attr::AttrType;

/// Record key naming the concrete type of a serialized entity.
pub const CLASS_TAG: &str = "class_name";

/// Class tag written by earlier versions of the persisted document.
pub const LEGACY_CLASS_TAG: &str = "__class__";

/// Fields owned by the identity component; `update` never touches them.
pub const PROTECTED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Identity fields and class tags. Neither can be assigned as an attribute.
pub fn is_protected(name: &str) -> bool {
    PROTECTED_FIELDS.contains(&name) || is_class_tag(name)
}

fn is_class_tag(name: &str) -> bool {
    name == CLASS_TAG || name == LEGACY_CLASS_TAG
}

/// Identity + timestamps + open-ended extra attributes.
///
/// Also registered as a class of its own (`BaseModel`) with no declared attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseModel {
    id: EntityId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    extra: Map<String, Value>,
}

impl BaseModel {
    pub const CLASS_NAME: &'static str = "BaseModel";

    pub const ATTRIBUTES: &'static [(&'static str, AttrType)] = &[];

    /// Fresh identity: new id, `created_at == updated_at == now`.
    pub fn new() -> Self {
        let now = timestamp::now();
        Self {
            id: EntityId::new(),
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    }

    /// Rebuild the identity component from the mandatory fields of a serialized record.
    pub fn from_record(record: &Map<String, Value>) -> DomainResult<Self> {
        let id = match record.get("id") {
            Some(Value::String(s)) => EntityId::from(s.as_str()),
            Some(Value::Number(n)) => EntityId::from(n.to_string()),
            Some(other) => {
                return Err(DomainError::validation(format!(
                    "id must be text, got {}",
                    value_repr(other)
                )));
            }
            None => return Err(DomainError::MissingField("id")),
        };
        Ok(Self {
            id,
            created_at: record_timestamp(record, "created_at")?,
            updated_at: record_timestamp(record, "updated_at")?,
            extra: Map::new(),
        })
    }

    pub fn base(&self) -> &BaseModel {
        self
    }

    pub fn base_mut(&mut self) -> &mut BaseModel {
        self
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Refresh `updated_at`. Never moves backwards, even if the wall clock does.
    pub fn touch(&mut self) {
        self.updated_at = timestamp::now().max(self.updated_at);
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Assign an attribute that no entity kind declares.
    pub fn set_extra(&mut self, name: &str, value: Value) {
        self.extra.insert(name.to_string(), value);
    }

    pub fn set_field(&mut self, name: &str, value: Value) -> DomainResult<()> {
        self.set_extra(name, value);
        Ok(())
    }

    pub fn declared_values(&self) -> Vec<(&'static str, Value)> {
        Vec::new()
    }

    pub(crate) fn record_head(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), Value::String(self.id.to_string()));
        map.insert(
            "created_at".into(),
            Value::String(format_timestamp(&self.created_at)),
        );
        map.insert(
            "updated_at".into(),
            Value::String(format_timestamp(&self.updated_at)),
        );
        map
    }

    pub(crate) fn repr_head(&self) -> Vec<(&str, String)> {
        vec![
            ("id", str_repr(self.id.as_str())),
            ("created_at", datetime_repr(&self.created_at)),
            ("updated_at", datetime_repr(&self.updated_at)),
        ]
    }
}

impl Default for BaseModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for BaseModel {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn record_timestamp(record: &Map<String, Value>, field: &'static str) -> DomainResult<DateTime<Utc>> {
    match record.get(field) {
        Some(Value::String(raw)) => parse_timestamp(raw),
        Some(other) => Err(DomainError::invalid_timestamp(value_repr(other))),
        None => Err(DomainError::MissingField(field)),
    }
}
