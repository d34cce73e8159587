use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pos2 {
    pub x: f64,
    pub y: f64,
}

impl Pos2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Straight (non-premultiplied) RGBA, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// White at the given opacity. Out-of-range alpha is clamped.
    pub fn white(alpha: f64) -> Self {
        Self::rgba(1.0, 1.0, 1.0, alpha.clamp(0.0, 1.0) as f32)
    }

    /// Parse `#rgb` or `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').filter(|d| d.is_ascii())?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        match digits.len() {
            6 => Some(Self::rgba(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                1.0,
            )),
            3 => {
                let short = |i: usize| channel(digits[i..i + 1].repeat(2).as_str());
                Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0))
            }
            _ => None,
        }
    }

    /// CSS `rgba(...)` notation, as accepted by canvas and SVG.
    pub fn to_css(self) -> String {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

/// How a frame clears the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Background {
    /// Clear to transparent; the page background shows through.
    Transparent,
    Solid(Color),
    /// Any CSS color string, typically resolved from a custom property.
    Css(String),
}

impl Background {
    /// The fill to paint after clearing, if any.
    pub fn fill_css(&self) -> Option<String> {
        match self {
            Background::Transparent => None,
            Background::Solid(color) => Some(color.to_css()),
            Background::Css(value) => Some(value.clone()),
        }
    }
}
