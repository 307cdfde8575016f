//! Color conversion helpers.
//!
//! Converts between CSS-style `rgb()`/`rgba()` strings and `#rrggbb` hex
//! strings, and classifies colors as light or dark by perceived luminance.

use std::sync::OnceLock;

use regex::Regex;

use super::cached_regex;
use crate::error::{Error, Result};

/// Luminance above which a color counts as light
pub const LIGHT_THRESHOLD: f64 = 128.0;

fn rgba_loose() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(
        &CELL,
        r"(?i)rgba\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d+\.)?\d+\s*\)",
    )
}

fn rgb_loose() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(&CELL, r"(?i)rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)")
}

fn rgba_strict() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(&CELL, r"(?i)^rgba\((\d+),(\d+),(\d+),\d+(\.\d+)?\)$")
}

fn rgb_strict() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    cached_regex(&CELL, r"(?i)^rgb\((\d+),(\d+),(\d+)\)$")
}

/// Pull the three color channels out of a regex match
fn channels(caps: &regex::Captures<'_>) -> Option<[u32; 3]> {
    let channel = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();
    Some([channel(1)?, channel(2)?, channel(3)?])
}

/// Decode `rrggbb` (no `#`) into channels
fn decode_hex(digits: &str) -> Option<[u8; 3]> {
    let mut rgb = [0u8; 3];
    hex::decode_to_slice(digits, &mut rgb).ok()?;
    Some(rgb)
}

/// Perceived luminance: 0.299 R + 0.587 G + 0.114 B
#[inline]
pub fn luminance(r: f64, g: f64, b: f64) -> f64 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// Convert an `rgb(r, g, b)` or `rgba(r, g, b, a)` string to `#rrggbb`.
///
/// Alpha is ignored.
///
/// # Examples
/// ```
/// use utilkit::util::color::rgb_to_hex;
/// assert_eq!(rgb_to_hex("rgb(255, 255, 255)").unwrap(), "#ffffff");
/// ```
pub fn rgb_to_hex(color: &str) -> Result<String> {
    let invalid = || Error::InvalidRgbColor(color.to_string());

    let caps = rgba_loose()
        .captures(color)
        .or_else(|| rgb_loose().captures(color))
        .ok_or_else(invalid)?;

    let [r, g, b] = channels(&caps).ok_or_else(invalid)?;
    let to_byte = |c: u32| u8::try_from(c).map_err(|_| invalid());
    Ok(format!("#{}", hex::encode([to_byte(r)?, to_byte(g)?, to_byte(b)?])))
}

/// Convert `#rrggbb` (the `#` is optional) to `rgb(r, g, b)`
pub fn hex_to_rgb(hex_color: &str) -> Result<String> {
    let digits = hex_color.strip_prefix('#').unwrap_or(hex_color);
    let [r, g, b] = decode_hex(digits).ok_or_else(|| Error::InvalidHexColor(hex_color.to_string()))?;
    Ok(format!("rgb({}, {}, {})", r, g, b))
}

/// Whether a HEX, RGB or RGBA color is light.
///
/// Whitespace anywhere in the input is ignored; alpha does not affect the result.
pub fn is_light_color(color: &str) -> Result<bool> {
    let invalid = || Error::InvalidColor(color.to_string());
    let compact: String = color.chars().filter(|c| !c.is_whitespace()).collect();

    let [r, g, b] = if let Some(caps) = rgba_strict()
        .captures(&compact)
        .or_else(|| rgb_strict().captures(&compact))
    {
        channels(&caps).ok_or_else(invalid)?
    } else {
        let digits = compact.replacen('#', "", 1);
        if digits.len() != 6 {
            return Err(invalid());
        }
        decode_hex(&digits).ok_or_else(invalid)?.map(u32::from)
    };

    Ok(luminance(f64::from(r), f64::from(g), f64::from(b)) > LIGHT_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(rgb_to_hex("rgb(255, 255, 255)").unwrap(), "#ffffff");
        assert_eq!(rgb_to_hex("rgb(0,128,9)").unwrap(), "#008009");
        assert_eq!(rgb_to_hex("RGB( 1 , 2 , 3 )").unwrap(), "#010203");
    }

    #[test]
    fn test_rgba_to_hex() {
        assert_eq!(rgb_to_hex("rgba(255,0,0,0.5)").unwrap(), "#ff0000");
        assert_eq!(rgb_to_hex("rgba(255, 0, 0, 0.5)").unwrap(), "#ff0000");
        assert_eq!(rgb_to_hex("rgba(16, 32, 48, 1)").unwrap(), "#102030");
    }

    #[test]
    fn test_rgb_to_hex_invalid() {
        let err = rgb_to_hex("invalidColor").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid color format 'invalidColor'. Please provide a valid RGB or RGBA color."
        );
        assert!(rgb_to_hex("rgb(256, 0, 0)").is_err());
        assert!(rgb_to_hex("#ffffff").is_err());
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ffffff").unwrap(), "rgb(255, 255, 255)");
        assert_eq!(hex_to_rgb("0A1b2C").unwrap(), "rgb(10, 27, 44)");
        assert!(matches!(hex_to_rgb("#fff"), Err(Error::InvalidHexColor(_))));
        assert!(matches!(hex_to_rgb("#gggggg"), Err(Error::InvalidHexColor(_))));
    }

    #[test]
    fn test_is_light_color_hex() {
        assert!(is_light_color("#f0f0f0").unwrap());
        assert!(!is_light_color("#333333").unwrap());
        assert!(is_light_color("FFFFFF").unwrap());
    }

    #[test]
    fn test_is_light_color_rgb() {
        assert!(is_light_color("rgb(200, 220, 255)").unwrap());
        assert!(!is_light_color("rgb(10, 20, 30)").unwrap());
        assert!(is_light_color("rgba(255, 255, 255, 0.5)").unwrap());
        assert!(!is_light_color("rgba(0, 0, 0, 0.8)").unwrap());
    }

    #[test]
    fn test_is_light_color_invalid() {
        let err = is_light_color("invalid-color").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid color format 'invalid-color'. Please provide a valid HEX, RGB, or RGBA color."
        );
        assert!(is_light_color("#12345").is_err());
    }

    #[test]
    fn test_luminance() {
        assert_eq!(luminance(0.0, 0.0, 0.0), 0.0);
        assert!((luminance(255.0, 255.0, 255.0) - 255.0).abs() < 1e-9);
        // green weighs most
        assert!(luminance(0.0, 230.0, 0.0) > LIGHT_THRESHOLD);
        assert!(luminance(200.0, 0.0, 0.0) < LIGHT_THRESHOLD);
    }
}
