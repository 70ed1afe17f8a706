//! Configuration loading for tint.
//!
//! Settings come from a config file, inline JSON, or built-in defaults, with a
//! couple of single-field environment overrides applied on top. The loaded
//! [`TintConfig`] hands the core library everything it needs to build an
//! apply coordinator and a file-backed store.
#![allow(missing_docs)]

pub mod models;
pub mod util;
pub mod validation;

pub use models::{
    ApplyConfig, ConfigFormat, EnvConfig, StoreConfig, TintConfig, TintConfigSource,
};
pub use validation::{ConfigWarning, ConfigWarnings};
