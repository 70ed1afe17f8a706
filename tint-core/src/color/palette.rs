//! Tonal palette derivation
//!
//! Produces three progressively lighter, desaturated variants ("levels")
//! of a base color for secondary navigation surfaces.

use tint_model::{HexColor, Hsl};

use super::convert::{hex_to_hsl, hsl_to_hex};

/// Number of derived levels (level zero is the base itself).
pub const PALETTE_LEVELS: usize = 3;

/// Saturation (percent) above which the ratio policy applies in
/// [`PalettePolicy::Hybrid`].
pub const RATIO_SATURATION_THRESHOLD: f64 = 3.0;

/// `(saturation ratio, lightness ratio)` per level.
const LEVEL_RATIOS: [(f64, f64); PALETTE_LEVELS] =
    [(0.4205, 1.81), (0.3136, 2.216), (0.3094, 2.719)];

/// `(saturation delta, lightness delta)` per level, in percentage points.
const LEVEL_DELTAS: [(f64, f64); PALETTE_LEVELS] = [
    (-32.084, 19.216),
    (-38.017, 28.824),
    (-38.245, 40.785),
];

/// How the levels are derived from the base HSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PalettePolicy {
    /// Ratio policy for saturated bases, additive deltas for near-grays.
    #[default]
    Hybrid,
    /// Scale saturation and lightness by fixed ratios.
    Ratio,
    /// Shift saturation and lightness by fixed deltas.
    Delta,
}

impl PalettePolicy {
    /// Derive the three levels for `base`. Hue is never changed.
    pub fn derive(&self, base: &HexColor) -> Palette {
        let hsl = hex_to_hsl(base);
        let use_ratio = match self {
            Self::Hybrid => hsl.s > RATIO_SATURATION_THRESHOLD,
            Self::Ratio => true,
            Self::Delta => false,
        };

        let levels = std::array::from_fn(|level| {
            let (s, l) = if use_ratio {
                let (s_ratio, l_ratio) = LEVEL_RATIOS[level];
                (hsl.s * s_ratio, hsl.l * l_ratio)
            } else {
                let (s_delta, l_delta) = LEVEL_DELTAS[level];
                (hsl.s + s_delta, hsl.l + l_delta)
            };
            hsl_to_hex(Hsl::new(hsl.h, s, l))
        });

        Palette {
            base: base.clone(),
            levels,
        }
    }
}

/// A base color with its derived levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub base: HexColor,
    pub levels: [HexColor; PALETTE_LEVELS],
}

impl Palette {
    /// Level zero is the base color, levels one through three are derived.
    pub fn level(&self, index: usize) -> Option<&HexColor> {
        match index {
            0 => Some(&self.base),
            n => self.levels.get(n - 1),
        }
    }
}

/// Derive the palette with the default hybrid policy.
pub fn derive_palette(base: &HexColor) -> Palette {
    PalettePolicy::Hybrid.derive(base)
}
