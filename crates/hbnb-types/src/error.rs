use thiserror::Error;

use crate::value::ValueKind;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypeError {
    #[error("Model with name {0} is not registered!")]
    UnknownModel(String),

    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("cannot convert {value} to {target}")]
    Coercion { value: String, target: ValueKind },

    /// Identity and bookkeeping attributes are not free-form fields.
    #[error("field {0:?} is reserved")]
    ReservedField(String),

    #[error("field {0:?} holds a non-finite float")]
    NonFiniteFloat(String),
}
