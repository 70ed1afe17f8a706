//! Color value types.
//!
//! `HexColor` is the only color representation that is persisted or handed
//! to a page. `Rgb` and `Hsl` are working representations used by the color
//! math in `tint-core`.

use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// A color in canonical `#rrggbb` form (lowercase, six hex digits).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct HexColor(String);

impl HexColor {
    /// Normalize user input into a canonical color.
    ///
    /// Leading/trailing whitespace is trimmed and a missing `#` is added.
    /// Three-digit shorthand is expanded by doubling each digit. Anything
    /// other than 3 or 6 hex digits is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ModelError::InvalidColor(raw.to_string()));
        }

        let mut canonical = String::with_capacity(7);
        canonical.push('#');
        match digits.len() {
            3 => {
                for ch in digits.chars() {
                    let lower = ch.to_ascii_lowercase();
                    canonical.push(lower);
                    canonical.push(lower);
                }
            }
            6 => canonical.push_str(&digits.to_ascii_lowercase()),
            _ => return Err(ModelError::InvalidColor(raw.to_string())),
        }

        Ok(Self(canonical))
    }

    /// Encode 8-bit channels as a canonical color.
    pub fn from_rgb(rgb: Rgb) -> Self {
        Self(format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b))
    }

    /// Decode the channel pairs.
    pub fn to_rgb(&self) -> Rgb {
        // The constructor guarantees `#` followed by six hex digits.
        let channel = |offset: usize| {
            u8::from_str_radix(&self.0[offset..offset + 2], 16)
                .unwrap_or_default()
        };
        Rgb::new(channel(1), channel(3), channel(5))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for HexColor {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

/// 8-bit sRGB channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `"r,g,b"` triple for `rgba(var(--x), alpha)` style usages.
    pub fn css_parts(&self) -> String {
        format!("{},{},{}", self.r, self.g, self.b)
    }
}

/// A color in HSL space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue in degrees, `[0, 360)`
    pub h: f64,
    /// Saturation as percentage, `[0, 100]`
    pub s: f64,
    /// Lightness as percentage, `[0, 100]`
    pub l: f64,
}

impl Hsl {
    /// Create a new HSL color, wrapping hue and clamping the percentages.
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 100.0),
            l: l.clamp(0.0, 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_expands_shorthand() {
        assert_eq!(HexColor::parse("#abc").unwrap().as_str(), "#aabbcc");
        assert_eq!(HexColor::parse("F0a").unwrap().as_str(), "#ff00aa");
    }

    #[test]
    fn parse_trims_and_lowercases() {
        let color = HexColor::parse("  #3584E4 \n").unwrap();
        assert_eq!(color.as_str(), "#3584e4");
        let color = HexColor::parse("3584e4").unwrap();
        assert_eq!(color.as_str(), "#3584e4");
    }

    #[test]
    fn parse_rejects_garbage() {
        for raw in ["", "#", "#12", "#1234", "not-a-color", "#ggg", "##abc", "#abcdeff"] {
            assert!(
                matches!(HexColor::parse(raw), Err(ModelError::InvalidColor(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_is_idempotent() {
        for raw in ["#abc", "ABCDEF", " 123 ", "#0f0f0f"] {
            let once = HexColor::parse(raw).unwrap();
            let twice = HexColor::parse(once.as_str()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn rgb_roundtrip_is_exact() {
        for raw in ["#000000", "#ffffff", "#3584e4", "#0a0b0c"] {
            let color = HexColor::parse(raw).unwrap();
            assert_eq!(HexColor::from_rgb(color.to_rgb()), color);
        }
    }

    #[test]
    fn css_parts_formats_channels() {
        let rgb = HexColor::parse("#3584e4").unwrap().to_rgb();
        assert_eq!(rgb, Rgb::new(0x35, 0x84, 0xe4));
        assert_eq!(rgb.css_parts(), "53,132,228");
    }

    #[test]
    fn hsl_new_wraps_and_clamps() {
        let hsl = Hsl::new(-30.0, 120.0, -5.0);
        assert!((hsl.h - 330.0).abs() < 1e-9);
        assert_eq!(hsl.s, 100.0);
        assert_eq!(hsl.l, 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_canonical_string() {
        let color: HexColor = serde_json::from_str("\"#ABC\"").unwrap();
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#aabbcc\"");
        assert!(serde_json::from_str::<HexColor>("\"#zz\"").is_err());
    }
}
