use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::error::TypeError;
use crate::model::ModelKind;
use crate::temporal::Timestamp;
use crate::value::FieldValue;

/// Attribute names that belong to the record itself rather than to its
/// free-form fields.
pub const RESERVED_FIELDS: [&str; 4] = ["id", "created_at", "updated_at", "__class__"];

/// Build the store key for a model name and id: `"<model>.<id>"`.
pub fn record_key(model: &str, id: &str) -> String {
    format!("{model}.{id}")
}

/// One domain model instance.
///
/// Every record has a registered [`ModelKind`], a string id, creation and
/// update timestamps, and an insertion-ordered map of free-form fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    kind: ModelKind,
    id: String,
    created_at: Timestamp,
    updated_at: Timestamp,
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    /// Create a fresh instance with a random UUID v4 id, both timestamps set
    /// to now, and the model's default business fields.
    pub fn new(kind: ModelKind) -> Self {
        let now = Timestamp::now();
        let mut record = Self::from_parts(kind, Uuid::new_v4().to_string(), now, now);
        record.apply_defaults();
        record
    }

    /// Assemble a record from existing identity and timestamps, with no
    /// free-form fields.
    pub fn from_parts(
        kind: ModelKind,
        id: impl Into<String>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            created_at,
            updated_at,
            fields: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// The key this record is stored under.
    pub fn key(&self) -> String {
        record_key(self.kind.as_str(), &self.id)
    }

    /// Free-form fields in insertion order.
    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Set a free-form field, returning the previous value.
    ///
    /// Reserved names (see [`RESERVED_FIELDS`]) are rejected, and so are
    /// non-finite floats.
    pub fn set_field(
        &mut self,
        name: &str,
        value: FieldValue,
    ) -> Result<Option<FieldValue>, TypeError> {
        if RESERVED_FIELDS.contains(&name) {
            return Err(TypeError::ReservedField(name.to_string()));
        }
        if !value.is_finite() {
            return Err(TypeError::NonFiniteFloat(name.to_string()));
        }
        Ok(self.fields.insert(name.to_string(), value))
    }

    /// Remove a free-form field, keeping the order of the rest.
    pub fn remove_field(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.shift_remove(name)
    }

    /// Fill in any missing default business fields for this record's model.
    pub fn apply_defaults(&mut self) {
        for (name, value) in self.kind.default_fields() {
            self.fields.entry(name.to_string()).or_insert(value);
        }
    }

    /// Refresh `updated_at` to the current time.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

impl fmt::Display for Record {
    /// `[User] (<id>) {"id": ..., "created_at": ..., "updated_at": ..., <fields>}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {{\"id\": {}, \"created_at\": \"{}\", \"updated_at\": \"{}\"",
            self.kind,
            self.id,
            Value::String(self.id.clone()),
            self.created_at,
            self.updated_at
        )?;
        for (name, value) in &self.fields {
            write!(f, ", {}: {}", Value::String(name.clone()), value.to_json())?;
        }
        f.write_str("}")
    }
}
