//! Foundation types for HBNB storage.
//!
//! This crate defines the closed model registry and the record shape shared
//! by every domain model. The storage engine in `hbnb-store` depends on it
//! for type dispatch and field mutation.
//!
//! # Key Types
//!
//! - [`ModelKind`] — The closed set of registered model names
//! - [`Record`] — One model instance: identity, timestamps, free-form fields
//! - [`FieldValue`] — Tagged field value with explicit coercion
//! - [`Timestamp`] — UTC timestamp with a fixed textual format

pub mod error;
pub mod model;
pub mod record;
pub mod temporal;
pub mod value;

pub use error::TypeError;
pub use model::{is_valid_model, ModelKind};
pub use record::{record_key, Record, RESERVED_FIELDS};
pub use temporal::{Timestamp, TIMESTAMP_FORMAT};
pub use value::{FieldValue, ValueKind};
