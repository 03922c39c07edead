//! Closed registry of entity kinds and the tagged [`Model`] value stored in the object map.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use hbnb_core::repr::{dict_repr, value_repr};
use hbnb_core::{DomainError, DomainResult, Entity, EntityId};

use crate::attr::AttrType;
use crate::base_model::{BaseModel, CLASS_TAG, LEGACY_CLASS_TAG, is_protected};
use crate::{Amenity, City, Place, Review, State, User};

/// Every constructible class.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ModelKind {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl ModelKind {
    pub const ALL: [ModelKind; 7] = [
        ModelKind::BaseModel,
        ModelKind::User,
        ModelKind::State,
        ModelKind::City,
        ModelKind::Amenity,
        ModelKind::Place,
        ModelKind::Review,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::BaseModel => BaseModel::CLASS_NAME,
            ModelKind::User => User::CLASS_NAME,
            ModelKind::State => State::CLASS_NAME,
            ModelKind::City => City::CLASS_NAME,
            ModelKind::Amenity => Amenity::CLASS_NAME,
            ModelKind::Place => Place::CLASS_NAME,
            ModelKind::Review => Review::CLASS_NAME,
        }
    }

    /// Look up a class by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Coercion table: declared attribute name → type.
    pub fn attributes(self) -> &'static [(&'static str, AttrType)] {
        match self {
            ModelKind::BaseModel => BaseModel::ATTRIBUTES,
            ModelKind::User => User::ATTRIBUTES,
            ModelKind::State => State::ATTRIBUTES,
            ModelKind::City => City::ATTRIBUTES,
            ModelKind::Amenity => Amenity::ATTRIBUTES,
            ModelKind::Place => Place::ATTRIBUTES,
            ModelKind::Review => Review::ATTRIBUTES,
        }
    }

    /// Fresh instance with a new identity. Not registered anywhere.
    pub fn construct(self) -> Model {
        self.with_base(BaseModel::new())
    }

    /// Rebuild an instance from a serialized record, keeping its id and timestamps.
    ///
    /// Class tags are skipped; declared attributes are converted to their type; anything
    /// else is kept verbatim as an extra attribute.
    pub fn rehydrate(self, record: &Map<String, Value>) -> DomainResult<Model> {
        let mut model = self.with_base(BaseModel::from_record(record)?);
        for (name, value) in record {
            if is_protected(name) {
                continue;
            }
            model.set_field(name, value.clone())?;
        }
        Ok(model)
    }

    fn with_base(self, base: BaseModel) -> Model {
        match self {
            ModelKind::BaseModel => Model::BaseModel(base),
            ModelKind::User => Model::User(User::with_base(base)),
            ModelKind::State => Model::State(State::with_base(base)),
            ModelKind::City => Model::City(City::with_base(base)),
            ModelKind::Amenity => Model::Amenity(Amenity::with_base(base)),
            ModelKind::Place => Model::Place(Place::with_base(base)),
            ModelKind::Review => Model::Review(Review::with_base(base)),
        }
    }
}

impl FromStr for ModelKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| DomainError::unknown_class(s))
    }
}

impl core::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A live entity of any registered kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    BaseModel(BaseModel),
    User(User),
    State(State),
    City(City),
    Amenity(Amenity),
    Place(Place),
    Review(Review),
}

macro_rules! each_kind {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            Model::BaseModel($m) => $body,
            Model::User($m) => $body,
            Model::State($m) => $body,
            Model::City($m) => $body,
            Model::Amenity($m) => $body,
            Model::Place($m) => $body,
            Model::Review($m) => $body,
        }
    };
}

impl Model {
    pub fn kind(&self) -> ModelKind {
        match self {
            Model::BaseModel(_) => ModelKind::BaseModel,
            Model::User(_) => ModelKind::User,
            Model::State(_) => ModelKind::State,
            Model::City(_) => ModelKind::City,
            Model::Amenity(_) => ModelKind::Amenity,
            Model::Place(_) => ModelKind::Place,
            Model::Review(_) => ModelKind::Review,
        }
    }

    pub fn base(&self) -> &BaseModel {
        each_kind!(self, m => m.base())
    }

    fn base_mut(&mut self) -> &mut BaseModel {
        each_kind!(self, m => m.base_mut())
    }

    fn set_field(&mut self, name: &str, value: Value) -> DomainResult<()> {
        each_kind!(self, m => m.set_field(name, value))
    }

    fn declared_values(&self) -> Vec<(&'static str, Value)> {
        each_kind!(self, m => m.declared_values())
    }

    /// Assign an attribute by name.
    ///
    /// Identity fields and class tags are read-only. Declared attributes are converted to their declared
    /// type; a failed conversion leaves the entity untouched.
    pub fn set_attribute(&mut self, name: &str, value: Value) -> DomainResult<()> {
        if is_protected(name) {
            return Err(DomainError::validation(format!("{name} is read-only")));
        }
        self.set_field(name, value)
    }

    /// Current value of an attribute, if it has been assigned.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.declared_values()
            .into_iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
            .or_else(|| self.base().extra().get(name).cloned())
    }

    /// Refresh `updated_at` ahead of a save.
    pub fn touch(&mut self) {
        self.base_mut().touch();
    }

    /// Serializable mapping: assigned attributes, ISO-8601 timestamps and the class tag.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = self.base().record_head();
        for (name, value) in self.declared_values() {
            record.insert(name.to_string(), value);
        }
        for (name, value) in self.base().extra() {
            record.insert(name.clone(), value.clone());
        }
        record.insert(CLASS_TAG.into(), Value::String(self.class_name().to_string()));
        record
    }

    /// Rebuild a model from a record, reading the class from its tag.
    ///
    /// `class_name` wins over the legacy `__class__` when both are present.
    pub fn from_record(record: &Map<String, Value>) -> DomainResult<Self> {
        let class = record
            .get(CLASS_TAG)
            .or_else(|| record.get(LEGACY_CLASS_TAG))
            .ok_or(DomainError::MissingField(CLASS_TAG))?;
        match class {
            Value::String(name) => name.parse::<ModelKind>()?.rehydrate(record),
            other => Err(DomainError::unknown_class(value_repr(other))),
        }
    }
}

impl Entity for Model {
    fn class_name(&self) -> &'static str {
        self.kind().name()
    }

    fn id(&self) -> &EntityId {
        self.base().id()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.base().created_at()
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.base().updated_at()
    }
}

/// `[ClassName] (id) {attributes}` with the attribute mapping in repr form.
impl core::fmt::Display for Model {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let base = self.base();
        let mut pairs = base.repr_head();
        let declared = self.declared_values();
        for (name, value) in &declared {
            pairs.push((*name, value_repr(value)));
        }
        for (name, value) in base.extra() {
            pairs.push((name.as_str(), value_repr(value)));
        }
        write!(f, "[{}] ({}) {}", self.class_name(), base.id(), dict_repr(pairs))
    }
}
