//! The object store: an in-memory key -> record mapping mirrored to one
//! persisted document.
//!
//! Every operation that takes a model name checks it against the registry
//! first, then the key, and only then mutates. Mutating operations take
//! `&mut self`; a host that shares a store across threads wraps it in a
//! single lock (see [`SharedStore`]).

use std::sync::{Arc, Mutex};

use hbnb_types::{is_valid_model, record_key, FieldValue, Record, RESERVED_FIELDS};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::codec::{decode_document, encode_document};
use crate::config::StoreConfig;
use crate::error::{DecodeError, StoreError, StoreResult};
use crate::file::JsonFileBackend;
use crate::traits::Backend;

/// Fields `update_field` silently refuses to touch.
pub const PROTECTED_FIELDS: [&str; 4] = RESERVED_FIELDS;

/// `""` stands for every model; anything else must be registered.
fn check_prefix_model(model: &str) -> StoreResult<()> {
    if !model.is_empty() && !is_valid_model(model) {
        return Err(StoreError::ModelNotFound {
            model: model.to_string(),
        });
    }
    Ok(())
}

/// A store shared between threads behind one exclusive lock.
pub type SharedStore<B = JsonFileBackend> = Arc<Mutex<ObjectStore<B>>>;

pub struct ObjectStore<B: Backend = JsonFileBackend> {
    objects: IndexMap<String, Record>,
    backend: B,
    pretty: bool,
}

impl<B: Backend> std::fmt::Debug for ObjectStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("location", &self.backend.location())
            .field("objects", &self.objects.len())
            .finish()
    }
}

impl ObjectStore<JsonFileBackend> {
    /// Create an empty store mirrored to the configured file. Nothing is read
    /// until [`load`](Self::load) is called.
    pub fn from_config(config: &StoreConfig) -> Self {
        let mut store = Self::new(JsonFileBackend::new(&config.file_path));
        store.pretty = config.pretty;
        store
    }
}

impl<B: Backend> ObjectStore<B> {
    /// Create an empty store over `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            objects: IndexMap::new(),
            backend,
            pretty: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Look up a record by its full key.
    pub fn get(&self, key: &str) -> Option<&Record> {
        self.objects.get(key)
    }

    /// Wrap the store for sharing across threads.
    pub fn into_shared(self) -> SharedStore<B> {
        Arc::new(Mutex::new(self))
    }

    /// The live mapping, in insertion order.
    pub fn all(&self) -> &IndexMap<String, Record> {
        &self.objects
    }

    /// Register `record` under `"<kind>.<id>"`, replacing any record already
    /// stored there.
    pub fn put(&mut self, record: Record) {
        let key = record.key();
        if self.objects.insert(key.clone(), record).is_some() {
            debug!(%key, "record replaced");
        } else {
            debug!(%key, "record added");
        }
    }

    /// Write every record to the backend, replacing the whole document.
    pub fn save(&self) -> StoreResult<()> {
        let data = encode_document(&self.objects, self.pretty).map_err(std::io::Error::from)?;
        self.backend.write(&data)?;
        debug!(location = %self.backend.location(), count = self.objects.len(), "store saved");
        Ok(())
    }

    /// Replace the in-memory mapping with the persisted document.
    ///
    /// A missing document leaves the store as it is. So does a document that
    /// is not valid JSON, which is logged but not reported. A document with
    /// an entry outside the registry fails with [`StoreError::Decode`] and
    /// also leaves the store unchanged.
    pub fn load(&mut self) -> StoreResult<()> {
        let location = self.backend.location();
        let Some(bytes) = self.backend.read()? else {
            debug!(%location, "nothing persisted yet");
            return Ok(());
        };

        match decode_document(&bytes) {
            Ok(objects) => {
                info!(%location, count = objects.len(), "store loaded");
                self.objects = objects;
                Ok(())
            }
            Err(DecodeError::Json(e)) => {
                warn!(%location, error = %e, "persisted document is not valid JSON; keeping current state");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check the model name and that `"<model>.<id>"` exists, returning the
    /// key.
    fn resolve(&self, model: &str, id: &str) -> StoreResult<String> {
        if !is_valid_model(model) {
            return Err(StoreError::ModelNotFound {
                model: model.to_string(),
            });
        }
        let key = record_key(model, id);
        if !self.objects.contains_key(&key) {
            return Err(StoreError::InstanceNotFound {
                model: model.to_string(),
                id: id.to_string(),
            });
        }
        Ok(key)
    }

    pub fn find_by_id(&self, model: &str, id: &str) -> StoreResult<&Record> {
        let key = self.resolve(model, id)?;
        self.objects
            .get(&key)
            .ok_or_else(|| StoreError::InstanceNotFound {
                model: model.to_string(),
                id: id.to_string(),
            })
    }

    /// Remove a record and save immediately.
    ///
    /// If the save fails the record stays removed in memory; retry
    /// [`save`](Self::save) rather than the delete.
    pub fn delete_by_id(&mut self, model: &str, id: &str) -> StoreResult<()> {
        let key = self.resolve(model, id)?;
        self.objects.shift_remove(&key);
        debug!(%key, "record deleted");
        self.save()
    }

    /// Render every record whose key starts with `model`.
    ///
    /// `""` matches everything. Matching is on the raw key prefix, so
    /// `"User"` would also match a model named `"UserX"` if one were
    /// registered.
    pub fn find_all(&self, model: &str) -> StoreResult<Vec<String>> {
        check_prefix_model(model)?;
        Ok(self
            .objects
            .iter()
            .filter(|(key, _)| key.starts_with(model))
            .map(|(_, record)| record.to_string())
            .collect())
    }

    /// Number of records [`find_all`](Self::find_all) would return.
    pub fn count(&self, model: &str) -> StoreResult<usize> {
        check_prefix_model(model)?;
        Ok(self.objects.keys().filter(|key| key.starts_with(model)).count())
    }

    /// Set one field on a stored record and save.
    ///
    /// Protected fields are ignored without error and without saving. An
    /// existing field keeps its type: `value` is coerced to it. A new field
    /// takes `value` as given. Either way `updated_at` is refreshed and the
    /// store is saved, even when coercion fails; the coercion error is
    /// returned after the save. A non-finite float is never assigned and is
    /// reported the same way.
    pub fn update_field(
        &mut self,
        model: &str,
        id: &str,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> StoreResult<()> {
        let key = self.resolve(model, id)?;
        if PROTECTED_FIELDS.contains(&field) {
            debug!(%key, field, "protected field left unchanged");
            return Ok(());
        }

        let outcome = {
            let record = self
                .objects
                .get_mut(&key)
                .ok_or_else(|| StoreError::InstanceNotFound {
                    model: model.to_string(),
                    id: id.to_string(),
                })?;
            let value = value.into();
            let coerced = match record.field(field) {
                Some(existing) => value.coerce_to(existing.kind()),
                None => Ok(value),
            };
            let assigned = coerced.and_then(|v| record.set_field(field, v));
            record.touch();
            assigned
        };

        self.save()?;
        outcome?;
        debug!(%key, field, "field updated");
        Ok(())
    }
}
