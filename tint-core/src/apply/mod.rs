//! Apply path: coordinator plus the page delivery boundary.

pub mod coordinator;
pub mod delivery;

pub use coordinator::{
    AppliedColor, ApplyCoordinator, CommitPolicy, CommitState,
    CoordinatorConfig, DEFAULT_BASE_RGB, DEFAULT_COMMIT_DELAY,
    default_base_color,
};
pub use delivery::{
    DeliveryOutcome, PaletteChannel, PaletteDelivery, PaletteInjector,
    PaletteRequest, StyleOverrides, StyleProperty,
};
