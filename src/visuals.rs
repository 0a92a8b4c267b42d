//! Colors and the fixed palettes the scenes draw with.
//!
//! Colors are straight (non-premultiplied) RGBA in `0.0..=1.0`. In config
//! files they are written as `"#rrggbb"` or `"#rrggbbaa"` strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb8(255, 255, 255);
    pub const BLACK: Color = Color::rgb8(0, 0, 0);
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parse `"#rrggbb"` / `"#rrggbbaa"`, with or without the `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 && hex.len() != 8 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        let mut color = Self::rgb8(channel(0)?, channel(2)?, channel(4)?);
        if hex.len() == 8 {
            color.a = channel(6)? as f32 / 255.0;
        }
        Some(color)
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    /// Same color with alpha replaced.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Component-wise linear blend, alpha included.
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color {value:?}, expected #rrggbb"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Named colors used by the default scenes.
pub mod palette {
    use super::Color;

    pub const VIOLET: Color = Color::rgb8(139, 92, 246);
    pub const DEEP_VIOLET: Color = Color::rgb8(124, 58, 237);
    pub const LAVENDER: Color = Color::rgb8(167, 139, 250);
    pub const SKY: Color = Color::rgb8(14, 165, 233);
    pub const BLUE: Color = Color::rgb8(59, 130, 246);
    pub const EMERALD: Color = Color::rgb8(16, 185, 129);
    pub const NIGHT: Color = Color::rgb8(5, 5, 12);

    /// Star colors: white, purple, blue, light purple.
    pub const STARS: [Color; 4] = [Color::WHITE, DEEP_VIOLET, BLUE, LAVENDER];
}
