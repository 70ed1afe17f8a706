use thiserror::Error;
use tint_model::ModelError;

#[derive(Error, Debug)]
pub enum TintError {
    #[error("Invalid color input: {0}")]
    InvalidColorInput(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Palette delivery failed: {0}")]
    Delivery(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, TintError>;
