//! File-backed object store for HBNB records.
//!
//! The [`ObjectStore`] keeps every record in memory under a `"<model>.<id>"`
//! key and mirrors the whole mapping to a single JSON document on demand.
//!
//! # Persistence Backends
//!
//! All backends implement the [`Backend`] trait:
//!
//! - [`JsonFileBackend`] -- one file on disk, replaced atomically on save
//! - [`InMemoryBackend`] -- byte buffer for tests and embedding
//!
//! # Rules
//!
//! 1. Model names are checked against the closed registry before any lookup.
//! 2. Validation failures never mutate the store.
//! 3. `save` rewrites the whole document; there is no partial update.
//! 4. A missing or malformed file on `load` is not an error. An unknown
//!    `__class__` is.
//! 5. Persistence errors surface after the in-memory change has happened.

pub mod codec;
pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod store;
pub mod traits;

pub use codec::{from_dict, to_dict, CLASS_FIELD};
pub use config::StoreConfig;
pub use error::{DecodeError, StoreError, StoreResult};
pub use file::JsonFileBackend;
pub use memory::InMemoryBackend;
pub use store::{ObjectStore, SharedStore, PROTECTED_FIELDS};
pub use traits::Backend;
