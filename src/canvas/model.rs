use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Paint,
    Erase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_rgba_slice(px: &[u8]) -> Self {
        Self::rgba(px[0], px[1], px[2], px[3])
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`. Six-digit colors are opaque.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn opaque(self) -> Self {
        Self { a: 255, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset_by(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub mode: BlendMode,
    /// Ignored when `mode` is [`BlendMode::Erase`].
    pub color: Color,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 4.0,
            mode: BlendMode::Paint,
            color: Color::WHITE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSegment {
    pub start: Point,
    pub end: Point,
    pub style: StrokeStyle,
}

/// The user's current brush selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolState {
    pub mode: BlendMode,
    pub color: Color,
    pub width: f32,
}

impl Default for ToolState {
    fn default() -> Self {
        let style = StrokeStyle::default();
        Self {
            mode: style.mode,
            color: style.color,
            width: style.width,
        }
    }
}

impl ToolState {
    pub fn select_mode(&mut self, mode: BlendMode) {
        self.mode = mode;
    }

    pub fn select_color(&mut self, color: Color) {
        self.color = color.opaque();
    }

    pub fn select_width(&mut self, width: f32, limits: RangeInclusive<f32>) {
        if !width.is_finite() {
            return;
        }
        self.width = width.clamp(*limits.start(), *limits.end());
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            width: self.width,
            mode: self.mode,
            color: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_with_and_without_alpha() {
        assert_eq!(Color::from_hex("#FFFFFF"), Some(Color::WHITE));
        assert_eq!(
            Color::from_hex("#10203040"),
            Some(Color::rgba(0x10, 0x20, 0x30, 0x40))
        );
        assert_eq!(Color::from_hex("FFFFFF"), None);
        assert_eq!(Color::from_hex("#FFF"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
        assert_eq!(Color::rgb(0xE6, 0x49, 0x80).to_hex(), "#E64980");
    }

    #[test]
    fn width_selection_is_clamped_to_limits() {
        let mut tool = ToolState::default();
        tool.select_width(42.0, 1.0..=20.0);
        assert_eq!(tool.width, 20.0);
        tool.select_width(0.0, 1.0..=20.0);
        assert_eq!(tool.width, 1.0);
        tool.select_width(f32::NAN, 1.0..=20.0);
        assert_eq!(tool.width, 1.0);
    }

    #[test]
    fn selected_colors_are_forced_opaque() {
        let mut tool = ToolState::default();
        tool.select_color(Color::rgba(1, 2, 3, 0));
        assert_eq!(tool.color, Color::rgb(1, 2, 3));
    }
}
