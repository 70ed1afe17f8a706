//! Hex / RGB / HSL conversions.

use tint_model::{HexColor, Hsl, Rgb};

/// Decode the channel pairs of a canonical color.
pub fn hex_to_rgb(hex: &HexColor) -> Rgb {
    hex.to_rgb()
}

/// Encode channels as a canonical color.
pub fn rgb_to_hex(rgb: Rgb) -> HexColor {
    HexColor::from_rgb(rgb)
}

/// Convert 8-bit RGB to HSL (h: 0-360, s: 0-100, l: 0-100).
///
/// Components are rounded to three decimals so stored and recomputed
/// palettes agree regardless of which side derived them.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f64::EPSILON {
        // Achromatic (gray)
        return Hsl::new(0.0, 0.0, round3(l * 100.0));
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if (max - r).abs() < f64::EPSILON {
        let mut h = (g - b) / d;
        if g < b {
            h += 6.0;
        }
        h
    } else if (max - g).abs() < f64::EPSILON {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(round3(h * 60.0), round3(s * 100.0), round3(l * 100.0))
}

/// Convert HSL (h: 0-360, s: 0-100, l: 0-100) to 8-bit RGB.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let s = hsl.s / 100.0;
    let l = hsl.l / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hh = hsl.h / 60.0;
    let x = c * (1.0 - ((hh % 2.0) - 1.0).abs());

    let (r, g, b) = match hh {
        hh if (0.0..1.0).contains(&hh) => (c, x, 0.0),
        hh if (1.0..2.0).contains(&hh) => (x, c, 0.0),
        hh if (2.0..3.0).contains(&hh) => (0.0, c, x),
        hh if (3.0..4.0).contains(&hh) => (0.0, x, c),
        hh if (4.0..5.0).contains(&hh) => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = l - c / 2.0;
    Rgb::new(to_channel(r + m), to_channel(g + m), to_channel(b + m))
}

pub fn hex_to_hsl(hex: &HexColor) -> Hsl {
    rgb_to_hsl(hex_to_rgb(hex))
}

pub fn hsl_to_hex(hsl: Hsl) -> HexColor {
    rgb_to_hex(hsl_to_rgb(hsl))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(raw: &str) -> HexColor {
        HexColor::parse(raw).unwrap()
    }

    #[test]
    fn primaries_map_to_expected_hues() {
        let red = hex_to_hsl(&hex("#ff0000"));
        assert_eq!((red.h, red.s, red.l), (0.0, 100.0, 50.0));

        let green = hex_to_hsl(&hex("#00ff00"));
        assert_eq!((green.h, green.s, green.l), (120.0, 100.0, 50.0));

        let blue = hex_to_hsl(&hex("#0000ff"));
        assert_eq!((blue.h, blue.s, blue.l), (240.0, 100.0, 50.0));
    }

    #[test]
    fn gray_has_no_hue_or_saturation() {
        let gray = hex_to_hsl(&hex("#808080"));
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.s, 0.0);
        assert!((gray.l - 50.196).abs() < 1e-9);
    }

    #[test]
    fn magenta_wraps_into_last_sextant() {
        let magenta = hex_to_hsl(&hex("#ff00ff"));
        assert_eq!(magenta.h, 300.0);
        assert_eq!(hsl_to_hex(magenta), hex("#ff00ff"));
    }

    #[test]
    fn reference_accent_converts() {
        let hsl = hex_to_hsl(&hex("#3584e4"));
        assert!((hsl.h - 212.914).abs() < 1e-9);
        assert!((hsl.s - 76.419).abs() < 1e-9);
        assert!((hsl.l - 55.098).abs() < 1e-9);
    }

    fn max_channel_delta(a: Rgb, b: Rgb) -> u8 {
        a.r.abs_diff(b.r).max(a.g.abs_diff(b.g)).max(a.b.abs_diff(b.b))
    }

    #[test]
    fn hsl_roundtrip_stays_within_one_step() {
        for r in (0..=255u16).step_by(5) {
            for g in (0..=255u16).step_by(5) {
                for b in (0..=255u16).step_by(5) {
                    let rgb = Rgb::new(r as u8, g as u8, b as u8);
                    let back = hsl_to_rgb(rgb_to_hsl(rgb));
                    assert!(
                        max_channel_delta(rgb, back) <= 1,
                        "{rgb:?} came back as {back:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn hex_roundtrip_is_exact() {
        for raw in ["#000000", "#ffffff", "#1a2b3c", "#3584e4"] {
            let color = hex(raw);
            assert_eq!(rgb_to_hex(hex_to_rgb(&color)), color);
        }
    }

    #[test]
    fn full_lightness_is_white() {
        let white = hsl_to_rgb(Hsl {
            h: 0.0,
            s: 0.0,
            l: 100.0,
        });
        assert_eq!(white, Rgb::new(255, 255, 255));
    }
}
