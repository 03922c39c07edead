//! One handler per verb.
//!
//! Each handler validates its operands against the store in a fixed order and either returns
//! the line to print (if any) or a [`CommandError`] naming the first failed check. Mutating
//! handlers persist the whole store before returning.

use serde_json::{Map, Value};

use hbnb_core::repr::str_list_repr;
use hbnb_core::{Entity, storage_key};
use hbnb_models::{AttrType, ModelKind, is_protected};
use hbnb_storage::FileStorage;

use crate::error::{CommandError, ConsoleError};
use crate::parser::{Change, RawValue, Target};

/// Output line on success (`None` when the command prints nothing).
pub type HandlerResult = Result<Option<String>, ConsoleError>;

/// class name present → class known
fn resolve_class(storage: &FileStorage, class_name: Option<&str>) -> Result<ModelKind, CommandError> {
    let name = class_name.ok_or(CommandError::ClassNameMissing)?;
    storage
        .classes()
        .iter()
        .copied()
        .find(|kind| kind.name() == name)
        .ok_or(CommandError::ClassDoesNotExist)
}

/// Declared type of `name` in the store's coercion table for `kind`.
fn declared_type(storage: &FileStorage, kind: ModelKind, name: &str) -> Option<AttrType> {
    storage
        .attributes(kind)
        .iter()
        .find(|(attribute, _)| *attribute == name)
        .map(|(_, ty)| *ty)
}

/// class name present → class known → id present → key exists
fn resolve_instance(storage: &FileStorage, target: &Target) -> Result<(ModelKind, String), CommandError> {
    let kind = resolve_class(storage, target.class_name.as_deref())?;
    let id = target.id.as_deref().ok_or(CommandError::InstanceIdMissing)?;
    let key = storage_key(kind.name(), id);
    if !storage.all().contains_key(&key) {
        return Err(CommandError::NoInstanceFound);
    }
    Ok((kind, key))
}

pub fn create(storage: &mut FileStorage, class_name: Option<&str>) -> HandlerResult {
    let kind = resolve_class(storage, class_name)?;
    let model = kind.construct();
    let id = model.id().to_string();
    let key = storage.register(model);
    storage.save_object(&key)?;
    tracing::info!(%key, "instance created");
    Ok(Some(id))
}

pub fn show(storage: &FileStorage, target: &Target) -> HandlerResult {
    let (_, key) = resolve_instance(storage, target)?;
    Ok(storage.all().get(&key).map(ToString::to_string))
}

pub fn destroy(storage: &mut FileStorage, target: &Target) -> HandlerResult {
    let (_, key) = resolve_instance(storage, target)?;
    storage.all_mut().remove(&key);
    storage.save()?;
    tracing::info!(%key, "instance destroyed");
    Ok(None)
}

pub fn all(storage: &FileStorage, class_name: Option<&str>) -> HandlerResult {
    let filter = class_name.map(|name| resolve_class(storage, Some(name))).transpose()?;
    let items: Vec<String> = storage
        .all()
        .values()
        .filter(|model| filter.is_none_or(|kind| model.kind() == kind))
        .map(ToString::to_string)
        .collect();
    Ok(Some(str_list_repr(&items)))
}

pub fn count(storage: &FileStorage, class_name: Option<&str>) -> HandlerResult {
    let kind = resolve_class(storage, class_name)?;
    Ok(Some(storage.all().count_of(kind).to_string()))
}

pub fn update(storage: &mut FileStorage, target: &Target, change: &Change) -> HandlerResult {
    let (kind, key) = resolve_instance(storage, target)?;
    match change {
        Change::Attribute { name, value } => {
            let name = name.as_deref().ok_or(CommandError::AttributeNameMissing)?;
            let raw = value.as_ref().ok_or(CommandError::ValueMissing)?;
            update_attribute(storage, kind, &key, name, raw)
        }
        Change::Object(text) => update_object(storage, kind, &key, text),
    }
}

fn update_attribute(
    storage: &mut FileStorage,
    kind: ModelKind,
    key: &str,
    name: &str,
    raw: &RawValue,
) -> HandlerResult {
    if is_protected(name) {
        tracing::debug!(%key, attribute = name, "ignoring update of read-only field");
        return Ok(None);
    }

    let value = match declared_type(storage, kind, name) {
        Some(ty) => ty
            .coerce(&Value::String(raw.text().to_string()))
            .map_err(|err| invalid_value(name, err))?,
        None => infer_value(raw),
    };

    if let Some(model) = storage.all_mut().get_mut(key) {
        model
            .set_attribute(name, value)
            .map_err(|err| invalid_value(name, err))?;
    }
    storage.save_object(key)?;
    Ok(None)
}

/// Apply every pair of `text` or none of them, then save once.
fn update_object(storage: &mut FileStorage, kind: ModelKind, key: &str, text: &str) -> HandlerResult {
    let pairs = parse_object(text).ok_or(CommandError::MalformedDictionary)?;
    let Some(current) = storage.all().get(key) else {
        return Err(CommandError::NoInstanceFound.into());
    };

    let mut updated = current.clone();
    for (name, value) in pairs {
        if is_protected(&name) {
            tracing::debug!(%key, attribute = %name, "ignoring update of read-only field");
            continue;
        }
        let value = match declared_type(storage, kind, &name) {
            Some(ty) => ty.coerce(&value).map_err(|err| invalid_value(&name, err))?,
            None => value,
        };
        updated
            .set_attribute(&name, value)
            .map_err(|err| invalid_value(&name, err))?;
    }

    storage.all_mut().insert(key.to_string(), updated);
    storage.save_object(key)?;
    Ok(None)
}

/// Brace-delimited object with single quotes normalized to double quotes.
fn parse_object(text: &str) -> Option<Map<String, Value>> {
    serde_json::from_str(&text.replace('\'', "\"")).ok()
}

/// Unquoted values become numbers when they parse: a `.` asks for a float, otherwise an
/// integer. Quoted values and unparsable text stay text.
pub fn infer_value(raw: &RawValue) -> Value {
    match raw {
        RawValue::Quoted(text) => Value::String(text.clone()),
        RawValue::Bare(text) => {
            let ty = if text.contains('.') {
                AttrType::Float
            } else {
                AttrType::Int
            };
            let text = Value::String(text.clone());
            ty.coerce(&text).unwrap_or(text)
        }
    }
}

fn invalid_value(attribute: &str, err: hbnb_core::DomainError) -> CommandError {
    tracing::debug!(attribute, error = %err, "rejected attribute value");
    CommandError::InvalidValue
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, FileStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("file.json"));
        (dir, storage)
    }

    fn target(class_name: &str, id: &str) -> Target {
        Target {
            class_name: Some(class_name.to_string()),
            id: Some(id.to_string()),
        }
    }

    fn command_error(result: HandlerResult) -> CommandError {
        match result {
            Err(ConsoleError::Command(err)) => err,
            other => panic!("Expected a command error, got {other:?}"),
        }
    }

    fn created(storage: &mut FileStorage, class_name: &str) -> String {
        create(storage, Some(class_name)).unwrap().unwrap()
    }

    #[test]
    fn create_validates_class_then_prints_id() {
        let (_dir, mut storage) = temp_store();
        assert_eq!(command_error(create(&mut storage, None)), CommandError::ClassNameMissing);
        assert_eq!(
            command_error(create(&mut storage, Some("MyModel"))),
            CommandError::ClassDoesNotExist
        );

        let id = created(&mut storage, "User");
        assert!(storage.all().contains_key(&format!("User.{id}")));
        assert!(storage.path().exists());
    }

    #[test]
    fn show_checks_in_order() {
        let (_dir, mut storage) = temp_store();
        let id = created(&mut storage, "State");

        assert_eq!(
            command_error(show(&storage, &Target::default())),
            CommandError::ClassNameMissing
        );
        assert_eq!(
            command_error(show(&storage, &target("Nation", &id))),
            CommandError::ClassDoesNotExist
        );
        let no_id = Target {
            class_name: Some("State".into()),
            id: None,
        };
        assert_eq!(command_error(show(&storage, &no_id)), CommandError::InstanceIdMissing);
        assert_eq!(
            command_error(show(&storage, &target("City", &id))),
            CommandError::NoInstanceFound
        );

        let shown = show(&storage, &target("State", &id)).unwrap().unwrap();
        assert!(shown.starts_with(&format!("[State] ({id}) {{'id': '{id}'")));
    }

    #[test]
    fn destroy_removes_and_persists() {
        let (dir, mut storage) = temp_store();
        let id = created(&mut storage, "Review");
        assert_eq!(destroy(&mut storage, &target("Review", &id)).unwrap(), None);
        assert_eq!(
            command_error(show(&storage, &target("Review", &id))),
            CommandError::NoInstanceFound
        );

        let reloaded = FileStorage::open(dir.path().join("file.json"));
        assert!(reloaded.all().is_empty());
    }

    #[test]
    fn all_filters_by_class() {
        let (_dir, mut storage) = temp_store();
        assert_eq!(all(&storage, None).unwrap().unwrap(), "[]");

        let user = created(&mut storage, "User");
        let _state = created(&mut storage, "State");
        let listed = all(&storage, Some("User")).unwrap().unwrap();
        assert!(listed.starts_with(&format!("[\"[User] ({user})")));
        assert!(!listed.contains("[State]"));
        assert!(all(&storage, None).unwrap().unwrap().contains("[State]"));
        assert_eq!(
            command_error(all(&storage, Some("Nation"))),
            CommandError::ClassDoesNotExist
        );
    }

    #[test]
    fn count_uses_class_prefix() {
        let (_dir, mut storage) = temp_store();
        created(&mut storage, "City");
        created(&mut storage, "City");
        created(&mut storage, "Place");
        assert_eq!(count(&storage, Some("City")).unwrap().unwrap(), "2");
        assert_eq!(count(&storage, Some("Amenity")).unwrap().unwrap(), "0");
        assert_eq!(command_error(count(&storage, None)), CommandError::ClassNameMissing);
    }

    #[test]
    fn update_checks_attribute_then_value() {
        let (_dir, mut storage) = temp_store();
        let id = created(&mut storage, "User");
        let t = target("User", &id);

        let no_name = Change::Attribute {
            name: None,
            value: None,
        };
        assert_eq!(
            command_error(update(&mut storage, &t, &no_name)),
            CommandError::AttributeNameMissing
        );
        let no_value = Change::Attribute {
            name: Some("email".into()),
            value: None,
        };
        assert_eq!(
            command_error(update(&mut storage, &t, &no_value)),
            CommandError::ValueMissing
        );
        assert_eq!(
            command_error(update(&mut storage, &target("User", "missing"), &no_value)),
            CommandError::NoInstanceFound
        );
    }

    #[test]
    fn update_applies_declared_coercion_over_inference() {
        let (_dir, mut storage) = temp_store();
        let id = created(&mut storage, "Place");
        let t = target("Place", &id);
        let key = format!("Place.{id}");

        let set = |storage: &mut FileStorage, name: &str, value: RawValue| {
            update(
                storage,
                &t,
                &Change::Attribute {
                    name: Some(name.into()),
                    value: Some(value),
                },
            )
        };

        set(&mut storage, "number_rooms", RawValue::Quoted("3".into())).unwrap();
        set(&mut storage, "latitude", RawValue::Bare("12".into())).unwrap();
        set(&mut storage, "name", RawValue::Bare("42".into())).unwrap();
        set(&mut storage, "rating", RawValue::Bare("4.5".into())).unwrap();
        set(&mut storage, "floors", RawValue::Bare("2".into())).unwrap();
        set(&mut storage, "nickname", RawValue::Bare("loft".into())).unwrap();
        set(&mut storage, "code", RawValue::Quoted("7".into())).unwrap();

        let model = storage.all().get(&key).unwrap();
        assert_eq!(model.attribute("number_rooms"), Some(json!(3)));
        assert_eq!(model.attribute("latitude"), Some(json!(12.0)));
        assert_eq!(model.attribute("name"), Some(json!("42")));
        assert_eq!(model.attribute("rating"), Some(json!(4.5)));
        assert_eq!(model.attribute("floors"), Some(json!(2)));
        assert_eq!(model.attribute("nickname"), Some(json!("loft")));
        assert_eq!(model.attribute("code"), Some(json!("7")));

        assert_eq!(
            command_error(set(&mut storage, "max_guest", RawValue::Bare("many".into()))),
            CommandError::InvalidValue
        );
        assert_eq!(storage.all().get(&key).unwrap().attribute("max_guest"), None);
    }

    #[test]
    fn update_never_touches_identity_fields() {
        let (_dir, mut storage) = temp_store();
        let id = created(&mut storage, "Amenity");
        let change = Change::Attribute {
            name: Some("id".into()),
            value: Some(RawValue::Quoted("hijacked".into())),
        };
        assert_eq!(update(&mut storage, &target("Amenity", &id), &change).unwrap(), None);
        assert!(storage.all().contains_key(&format!("Amenity.{id}")));
        assert_eq!(
            storage.all().get(&format!("Amenity.{id}")).unwrap().id().as_str(),
            id
        );
    }

    #[test]
    fn object_update_is_all_or_nothing() {
        let (_dir, mut storage) = temp_store();
        let id = created(&mut storage, "Place");
        let key = format!("Place.{id}");
        let t = target("Place", &id);

        let ok = Change::Object("{'name': 'Loft', 'max_guest': '4', 'pets': true}".into());
        update(&mut storage, &t, &ok).unwrap();
        let model = storage.all().get(&key).unwrap();
        assert_eq!(model.attribute("name"), Some(json!("Loft")));
        assert_eq!(model.attribute("max_guest"), Some(json!(4)));
        assert_eq!(model.attribute("pets"), Some(json!(true)));

        let bad = Change::Object("{'name': 'Palace', 'latitude': 'north'}".into());
        assert_eq!(command_error(update(&mut storage, &t, &bad)), CommandError::InvalidValue);
        assert_eq!(
            storage.all().get(&key).unwrap().attribute("name"),
            Some(json!("Loft"))
        );

        let malformed = Change::Object("{'name': }".into());
        assert_eq!(
            command_error(update(&mut storage, &t, &malformed)),
            CommandError::MalformedDictionary
        );
    }

    #[test]
    fn object_update_saves_once_with_every_pair() {
        let (_dir, mut storage) = temp_store();
        let id = created(&mut storage, "Place");
        let key = format!("Place.{id}");
        let t = target("Place", &id);
        let before = storage.all().get(&key).unwrap().updated_at();
        std::thread::sleep(std::time::Duration::from_millis(2));

        let change = Change::Object("{'name': 'Loft', 'number_rooms': 3, 'view': 'sea'}".into());
        update(&mut storage, &t, &change).unwrap();

        let model = storage.all().get(&key).unwrap();
        assert!(model.updated_at() > before);
        let raw = std::fs::read_to_string(storage.path()).unwrap();
        let document: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(document[&key], Value::Object(model.to_record()));

        let rejected = Change::Object("{'view': 'garden', 'max_guest': 'lots'}".into());
        assert_eq!(command_error(update(&mut storage, &t, &rejected)), CommandError::InvalidValue);
        assert_eq!(std::fs::read_to_string(storage.path()).unwrap(), raw);
    }

    #[test]
    fn update_ignores_class_tags() {
        let (_dir, mut storage) = temp_store();
        let id = created(&mut storage, "User");
        let key = format!("User.{id}");
        let t = target("User", &id);

        let attribute = Change::Attribute {
            name: Some("__class__".into()),
            value: Some(RawValue::Quoted("State".into())),
        };
        assert_eq!(update(&mut storage, &t, &attribute).unwrap(), None);
        let object = Change::Object("{'class_name': 'Ghost', '__class__': 'City', 'email': 'a@b.c'}".into());
        assert_eq!(update(&mut storage, &t, &object).unwrap(), None);

        let record = storage.all().get(&key).unwrap().to_record();
        assert_eq!(record["class_name"], json!("User"));
        assert_eq!(record["email"], json!("a@b.c"));
        assert!(!record.contains_key("__class__"));
    }

    #[test]
    fn object_update_reports_missing_instance_before_parsing() {
        let (_dir, mut storage) = temp_store();
        let malformed = Change::Object("{oops".into());
        assert_eq!(
            command_error(update(&mut storage, &target("User", "nope"), &malformed)),
            CommandError::NoInstanceFound
        );
    }

    #[test]
    fn inference_examples() {
        assert_eq!(infer_value(&RawValue::Bare("5".into())), json!(5));
        assert_eq!(infer_value(&RawValue::Bare("5.5".into())), json!(5.5));
        assert_eq!(infer_value(&RawValue::Bare("5.5.5".into())), json!("5.5.5"));
        assert_eq!(infer_value(&RawValue::Quoted("5".into())), json!("5"));
    }

    proptest! {
        /// Property: unquoted numbers with a `.` are stored as floats, without one as integers.
        #[test]
        fn unquoted_numbers_pick_their_type(i in -1_000_000i64..1_000_000, frac in 0u32..1000) {
            let int_value = infer_value(&RawValue::Bare(i.to_string()));
            prop_assert_eq!(int_value, json!(i));

            let float_text = format!("{i}.{frac}");
            let float_value = infer_value(&RawValue::Bare(float_text.clone()));
            prop_assert!(float_value.is_f64());
            prop_assert_eq!(float_value.as_f64(), float_text.parse::<f64>().ok());
        }
    }
}
