//! Palette derivation, per-origin color storage, and debounced apply for the
//! tint accent chooser.
//!
//! Data flows from a raw color input through [`apply::ApplyCoordinator`],
//! which persists the base color in [`store::OriginColorStore`], derives the
//! tonal palette with [`color`], hands it to the page through
//! [`apply::PaletteDelivery`], and records the color as a recent selection
//! once it has been stable for the commit window.
#![allow(missing_docs)]

pub mod apply;
pub mod color;
pub mod error;
pub mod store;

pub use apply::{
    AppliedColor, ApplyCoordinator, CommitPolicy, CommitState, CoordinatorConfig,
    DeliveryOutcome, PaletteChannel, PaletteDelivery, PaletteInjector,
    PaletteRequest, StyleOverrides,
};
pub use color::{Palette, PalettePolicy, derive_palette, normalize};
pub use error::{Result, TintError};
pub use store::{
    JsonFileStore, KeyValueStore, MemoryStore, OriginColorStore,
    RECENT_COLORS_LIMIT,
};
pub use tint_model::{HexColor, Hsl, ModelError, Origin, Rgb};
