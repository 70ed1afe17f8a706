use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Input could not be normalized into a `#rrggbb` color.
    InvalidColor(String),
    /// Input is not a usable web origin.
    InvalidOrigin(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidColor(raw) => {
                write!(f, "invalid color: {raw:?}")
            }
            ModelError::InvalidOrigin(raw) => {
                write!(f, "invalid origin: {raw:?}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
