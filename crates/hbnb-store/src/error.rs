use hbnb_types::TypeError;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The model name is not in the registry.
    #[error("Model with name {model} is not registered!")]
    ModelNotFound { model: String },

    /// The model is registered but no record has this id.
    #[error("Instance of {model} with id {id} does not exist!")]
    InstanceNotFound { model: String, id: String },

    /// The backing file could not be read or written.
    #[error("persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    /// The backing file content could not be interpreted.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A field value could not be converted or assigned.
    #[error("{0}")]
    Type(#[from] TypeError),
}

/// Errors raised while turning persisted JSON back into records.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The document is not valid JSON.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document or one of its entries is valid JSON but not an object.
    #[error("expected a JSON object at {0}")]
    NotAnObject(String),

    #[error("entry {0} has no string __class__ field")]
    MissingClass(String),

    /// The discriminator names a type outside the registry.
    #[error("unknown class {0:?}")]
    UnknownClass(String),

    #[error("entry stored under {key} decodes to key {actual}")]
    KeyMismatch { key: String, actual: String },

    #[error("missing or non-string field {0:?}")]
    MissingField(&'static str),

    #[error("invalid timestamp in field {field:?}: {source}")]
    Timestamp {
        field: &'static str,
        #[source]
        source: TypeError,
    },

    #[error("field {0:?} holds a value with no field representation")]
    UnsupportedValue(String),

    #[error("invalid field: {0}")]
    Field(#[from] TypeError),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
