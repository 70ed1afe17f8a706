//! Color math for accent palettes
//!
//! Pure conversions between hex, RGB and HSL plus the tonal palette
//! derivation. Both the live page channel and the one-shot injection fallback
//! build their payloads from this module so the two paths never drift.

pub mod convert;
pub mod palette;

pub use convert::{
    hex_to_hsl, hex_to_rgb, hsl_to_hex, hsl_to_rgb, rgb_to_hex, rgb_to_hsl,
};
pub use palette::{Palette, PalettePolicy, derive_palette};

use tint_model::HexColor;

/// Normalize raw input into a canonical color, or `None` when it is not a
/// 3- or 6-digit hex color.
pub fn normalize(input: &str) -> Option<HexColor> {
    HexColor::parse(input).ok()
}
