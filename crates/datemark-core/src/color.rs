use std::sync::LazyLock;

use image::Rgba;
use regex::Regex;

use crate::error::{Error, Result};

static RGB_FN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(\d*\.?\d+)\s*)?\)$").unwrap()
});

/// CSS color keywords.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("navy", [0, 0, 128]),
    ("purple", [128, 0, 128]),
    ("teal", [0, 128, 128]),
    ("orange", [255, 165, 0]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gold", [255, 215, 0]),
    ("ivory", [255, 255, 240]),
    ("beige", [245, 245, 220]),
    ("coral", [255, 127, 80]),
    ("crimson", [220, 20, 60]),
    ("tomato", [255, 99, 71]),
    ("orangered", [255, 69, 0]),
    ("khaki", [240, 230, 140]),
    ("violet", [238, 130, 238]),
    ("indigo", [75, 0, 130]),
    ("skyblue", [135, 206, 235]),
    ("steelblue", [70, 130, 180]),
    ("whitesmoke", [245, 245, 245]),
];

/// Parse a watermark color: a CSS name, `#rgb`, `#rrggbb`, `#rrggbbaa`,
/// `rgb(r, g, b)` or `rgba(r, g, b, a)`.
///
/// In `rgba()` the alpha is 0-255, or a fraction when it contains a dot.
pub fn parse_color(s: &str) -> Result<Rgba<u8>> {
    let invalid = || Error::InvalidColor(s.to_string());
    let spec = s.trim().to_ascii_lowercase();

    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(invalid);
    }

    if let Some(caps) = RGB_FN_RE.captures(&spec) {
        let channel = |i: usize| caps[i].parse::<u8>().ok();
        let (r, g, b) = (channel(1), channel(2), channel(3));
        let a = match caps.get(4) {
            None => Some(255),
            Some(m) if m.as_str().contains('.') => m
                .as_str()
                .parse::<f32>()
                .ok()
                .filter(|f| (0.0..=1.0).contains(f))
                .map(|f| (f * 255.0).round() as u8),
            Some(m) => m.as_str().parse::<u8>().ok(),
        };
        return match (r, g, b, a) {
            (Some(r), Some(g), Some(b), Some(a)) => Ok(Rgba([r, g, b, a])),
            _ => Err(invalid()),
        };
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == spec)
        .map(|(_, [r, g, b])| Rgba([*r, *g, *b, 255]))
        .ok_or_else(invalid)
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);

    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named() {
        assert_eq!(parse_color("white").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color(" Black ").unwrap(), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_hex() {
        assert_eq!(parse_color("#FF0000").unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_color("#0f0").unwrap(), Rgba([0, 255, 0, 255]));
        assert_eq!(parse_color("#11223380").unwrap(), Rgba([0x11, 0x22, 0x33, 0x80]));
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#gggggg").is_err());
    }

    #[test]
    fn test_rgba_function() {
        assert_eq!(parse_color("rgba(255, 255, 255, 180)").unwrap(), Rgba([255, 255, 255, 180]));
        assert_eq!(parse_color("rgb(1,2,3)").unwrap(), Rgba([1, 2, 3, 255]));
        assert_eq!(parse_color("rgba(0, 0, 0, 0.5)").unwrap(), Rgba([0, 0, 0, 128]));
        assert!(parse_color("rgba(256, 0, 0, 1)").is_err());
        assert!(parse_color("rgba(0, 0, 0, 1.5)").is_err());
    }

    #[test]
    fn test_unknown() {
        let err = parse_color("ultraviolet").unwrap_err();
        assert!(matches!(err, Error::InvalidColor(ref s) if s == "ultraviolet"));
    }
}
