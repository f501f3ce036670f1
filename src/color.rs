//! Color model for style elements
//!
//! The output format writes colors as eight lowercase hex digits in
//! `aabbggrr` order (alpha first, then blue, green, red). Parsing is
//! deliberately lenient: malformed hex strings fall back to opaque black
//! rather than erroring.

use log::warn;
use serde::{Deserialize, Serialize};

/// An RGBA color emitted in KML `aabbggrr` hex order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KmlColor {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl KmlColor {
    pub const BLACK: KmlColor = KmlColor::from_rgba(0, 0, 0, 255);
    pub const WHITE: KmlColor = KmlColor::from_rgba(255, 255, 255, 255);
    pub const CLEAR: KmlColor = KmlColor::from_rgba(0, 0, 0, 0);
    pub const WARNING: KmlColor = KmlColor::from_rgba(255, 0, 0, 255);
    pub const CAUTION: KmlColor = KmlColor::from_rgba(255, 214, 10, 255);
    pub const ADVISORY: KmlColor = KmlColor::from_rgba(48, 209, 88, 255);

    /// Opaque color from 8-bit RGB channels
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, 255)
    }

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Color from normalized channels (0.0–1.0, clamped and rounded)
    pub fn from_rgb_f64(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        fn scale(value: f64) -> u8 {
            (value.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::from_rgba(scale(red), scale(green), scale(blue), scale(alpha))
    }

    /// Parse a display-order hex string: `RGB`, `RRGGBB` or `AARRGGBB`,
    /// with an optional `#` prefix. Malformed input yields opaque black.
    pub fn from_hex(hex: &str) -> Self {
        let cleaned = hex.trim().trim_start_matches('#');
        if !cleaned.bytes().all(|b| b.is_ascii_hexdigit()) {
            warn!("invalid hex color {hex:?}, falling back to opaque black");
            return Self::BLACK;
        }

        match cleaned.len() {
            3 => {
                let r = nibble(cleaned, 0);
                let g = nibble(cleaned, 1);
                let b = nibble(cleaned, 2);
                Self::from_rgb(r * 17, g * 17, b * 17)
            }
            6 => Self::from_rgb(byte(cleaned, 0), byte(cleaned, 2), byte(cleaned, 4)),
            8 => Self::from_rgba(
                byte(cleaned, 2),
                byte(cleaned, 4),
                byte(cleaned, 6),
                byte(cleaned, 0),
            ),
            _ => {
                warn!("invalid hex color {hex:?}, falling back to opaque black");
                Self::BLACK
            }
        }
    }

    /// Parse a KML-order hex string (`aabbggrr`, 8 digits). Malformed
    /// input yields opaque black.
    pub fn from_kml_hex(kml_hex: &str) -> Self {
        let cleaned = kml_hex.trim().trim_start_matches('#');
        if cleaned.len() != 8 || !cleaned.bytes().all(|b| b.is_ascii_hexdigit()) {
            warn!("invalid KML hex color {kml_hex:?}, falling back to opaque black");
            return Self::BLACK;
        }
        Self::from_rgba(
            byte(cleaned, 6),
            byte(cleaned, 4),
            byte(cleaned, 2),
            byte(cleaned, 0),
        )
    }

    /// The same color with a different 8-bit alpha
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self::from_rgba(self.r, self.g, self.b, alpha)
    }

    /// The same color with a normalized alpha (0.0–1.0, clamped)
    pub fn with_alpha_f64(self, alpha: f64) -> Self {
        self.with_alpha((alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Eight lowercase hex digits in `aabbggrr` order
    pub fn kml_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}{:02x}", self.a, self.b, self.g, self.r)
    }
}

impl std::fmt::Display for KmlColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.kml_hex())
    }
}

fn nibble(s: &str, index: usize) -> u8 {
    u8::from_str_radix(&s[index..index + 1], 16).unwrap_or(0)
}

fn byte(s: &str, index: usize) -> u8 {
    u8::from_str_radix(&s[index..index + 2], 16).unwrap_or(0)
}
