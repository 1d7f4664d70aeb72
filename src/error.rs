use derive_builder::UninitializedFieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("You need to define an entity")]
    MissingEntity,
    #[error("Invalid card configuration: {0}")]
    InvalidConfig(String),
    #[error("Card type {0} is already registered")]
    AlreadyRegistered(String),
    #[error("Unknown card type: {0}")]
    UnknownCardType(String),
    #[error("Template failed: {0}")]
    Template(#[from] minijinja::Error),
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UninitializedFieldError> for CardError {
    fn from(value: UninitializedFieldError) -> Self {
        match value.field_name() {
            "entity" => CardError::MissingEntity,
            field => CardError::InvalidConfig(format!("missing field {field}")),
        }
    }
}
