//! Value types shared across tint crates.
//!
//! Every color that leaves this crate is a canonical lowercase `#rrggbb`
//! string, and every origin is a non-empty scheme+host+port serialization.

pub mod color;
pub mod error;
pub mod origin;

pub use color::{HexColor, Hsl, Rgb};
pub use error::{ModelError, Result};
pub use origin::Origin;
