//! Conversion between records and plain JSON field maps.
//!
//! Every persisted entry carries a `__class__` discriminator. Decoding looks
//! it up in a closed table of constructors, one per registered model; a
//! discriminator outside the table is rejected and nothing is constructed.
//!
//! Decoding restores exactly the fields that were written; model defaults
//! are not filled in. JSON has no timestamp type, so a string field (or list
//! item) whose text is exactly a formatted timestamp is read back as a
//! [`FieldValue::Timestamp`].

use hbnb_types::{FieldValue, ModelKind, Record, Timestamp};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Name of the type discriminator in each persisted entry.
pub const CLASS_FIELD: &str = "__class__";

type Constructor = fn(Map<String, Value>) -> Result<Record, DecodeError>;

const CONSTRUCTORS: [(&str, Constructor); 7] = [
    ("BaseModel", base_model),
    ("User", user),
    ("State", state),
    ("City", city),
    ("Amenity", amenity),
    ("Place", place),
    ("Review", review),
];

fn base_model(map: Map<String, Value>) -> Result<Record, DecodeError> {
    build(ModelKind::BaseModel, map)
}

fn user(map: Map<String, Value>) -> Result<Record, DecodeError> {
    build(ModelKind::User, map)
}

fn state(map: Map<String, Value>) -> Result<Record, DecodeError> {
    build(ModelKind::State, map)
}

fn city(map: Map<String, Value>) -> Result<Record, DecodeError> {
    build(ModelKind::City, map)
}

fn amenity(map: Map<String, Value>) -> Result<Record, DecodeError> {
    build(ModelKind::Amenity, map)
}

fn place(map: Map<String, Value>) -> Result<Record, DecodeError> {
    build(ModelKind::Place, map)
}

fn review(map: Map<String, Value>) -> Result<Record, DecodeError> {
    build(ModelKind::Review, map)
}

fn constructor_for(class: &str) -> Option<Constructor> {
    CONSTRUCTORS
        .iter()
        .find(|(name, _)| *name == class)
        .map(|(_, ctor)| *ctor)
}

fn take_string(map: &mut Map<String, Value>, field: &'static str) -> Result<String, DecodeError> {
    match map.shift_remove(field) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(DecodeError::MissingField(field)),
    }
}

fn take_timestamp(
    map: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Timestamp, DecodeError> {
    let raw = take_string(map, field)?;
    Timestamp::parse(&raw).map_err(|source| DecodeError::Timestamp { field, source })
}

fn revive_timestamps(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Str(s) => match Timestamp::parse(&s) {
            Ok(ts) if ts.format() == s => FieldValue::Timestamp(ts),
            _ => FieldValue::Str(s),
        },
        FieldValue::List(items) => {
            FieldValue::List(items.into_iter().map(revive_timestamps).collect())
        }
        other => other,
    }
}

fn build(kind: ModelKind, mut map: Map<String, Value>) -> Result<Record, DecodeError> {
    let id = take_string(&mut map, "id")?;
    let created_at = take_timestamp(&mut map, "created_at")?;
    let updated_at = take_timestamp(&mut map, "updated_at")?;

    let mut record = Record::from_parts(kind, id, created_at, updated_at);
    for (name, raw) in map {
        let value = FieldValue::from_json(&raw)
            .ok_or_else(|| DecodeError::UnsupportedValue(name.clone()))?;
        record.set_field(&name, revive_timestamps(value))?;
    }
    Ok(record)
}

/// Render a record as a plain field map, including `__class__`.
pub fn to_dict(record: &Record) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("id".into(), Value::String(record.id().to_string()));
    map.insert("created_at".into(), Value::String(record.created_at().format()));
    map.insert("updated_at".into(), Value::String(record.updated_at().format()));
    for (name, value) in record.fields() {
        map.insert(name.clone(), value.to_json());
    }
    map.insert(CLASS_FIELD.into(), Value::String(record.kind().as_str().into()));
    map
}

/// Rebuild a record from a plain field map, dispatching on `__class__`.
pub fn from_dict(mut map: Map<String, Value>) -> Result<Record, DecodeError> {
    let class = match map.shift_remove(CLASS_FIELD) {
        Some(Value::String(class)) => class,
        _ => return Err(DecodeError::MissingClass(describe_id(&map))),
    };
    let ctor = constructor_for(&class).ok_or(DecodeError::UnknownClass(class))?;
    ctor(map)
}

fn describe_id(map: &Map<String, Value>) -> String {
    map.get("id")
        .and_then(Value::as_str)
        .unwrap_or("<no id>")
        .to_string()
}

/// Serialize a whole key -> record mapping to the persisted document.
pub fn encode_document(
    objects: &IndexMap<String, Record>,
    pretty: bool,
) -> Result<Vec<u8>, serde_json::Error> {
    let document: Map<String, Value> = objects
        .iter()
        .map(|(key, record)| (key.clone(), Value::Object(to_dict(record))))
        .collect();
    if pretty {
        serde_json::to_vec_pretty(&document)
    } else {
        serde_json::to_vec(&document)
    }
}

/// Parse a persisted document back into a key -> record mapping.
///
/// Each entry must decode to a record whose own key equals the key it was
/// stored under.
pub fn decode_document(bytes: &[u8]) -> Result<IndexMap<String, Record>, DecodeError> {
    let Value::Object(entries) = serde_json::from_slice::<Value>(bytes)? else {
        return Err(DecodeError::NotAnObject("document root".into()));
    };

    let mut objects = IndexMap::with_capacity(entries.len());
    for (key, entry) in entries {
        let Value::Object(fields) = entry else {
            return Err(DecodeError::NotAnObject(key));
        };
        let record = from_dict(fields)?;
        let actual = record.key();
        if actual != key {
            return Err(DecodeError::KeyMismatch { key, actual });
        }
        objects.insert(key, record);
    }
    Ok(objects)
}
