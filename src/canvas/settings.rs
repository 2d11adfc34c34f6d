use crate::canvas::model::{BlendMode, Color, Point, ToolState};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

const MIN_WIDTH_FLOOR: f32 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanvasSettings {
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default = "default_tool_mode")]
    pub default_mode: BlendMode,
    #[serde(default = "default_brush_color")]
    pub default_color: Color,
    #[serde(default = "default_brush_width")]
    pub default_width: f32,
    #[serde(default = "default_min_width")]
    pub min_width: f32,
    #[serde(default = "default_max_width")]
    pub max_width: f32,
    #[serde(default = "default_quick_colors")]
    pub quick_colors: Vec<Color>,
    /// Where results land when the surface holds no strokes.
    #[serde(default = "default_fallback_anchor")]
    pub fallback_anchor: Point,
    /// Wipe the drawing once its results have been placed.
    #[serde(default = "default_clear_surface_on_result")]
    pub clear_surface_on_result: bool,
    #[serde(default = "default_recognizer_endpoint")]
    pub recognizer_endpoint: String,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_background_color() -> Color {
    Color::BLACK
}

fn default_tool_mode() -> BlendMode {
    BlendMode::Paint
}

fn default_brush_color() -> Color {
    Color::WHITE
}

fn default_brush_width() -> f32 {
    4.0
}

fn default_min_width() -> f32 {
    1.0
}

fn default_max_width() -> f32 {
    20.0
}

fn default_quick_colors() -> Vec<Color> {
    vec![
        Color::rgb(0xFF, 0xFF, 0xFF),
        Color::rgb(0xEE, 0x33, 0x33),
        Color::rgb(0xE6, 0x49, 0x80),
        Color::rgb(0xBE, 0x4B, 0xDB),
        Color::rgb(0x22, 0x8B, 0xE6),
        Color::rgb(0x33, 0x33, 0xEE),
        Color::rgb(0x40, 0xC0, 0x57),
        Color::rgb(0x00, 0xAA, 0x00),
        Color::rgb(0xFA, 0xB0, 0x05),
        Color::rgb(0xFD, 0x7E, 0x14),
    ]
}

fn default_fallback_anchor() -> Point {
    Point::new(10.0, 200.0)
}

fn default_clear_surface_on_result() -> bool {
    true
}

fn default_recognizer_endpoint() -> String {
    "http://localhost:8900".to_owned()
}

fn default_request_timeout_seconds() -> u64 {
    60
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            default_mode: default_tool_mode(),
            default_color: default_brush_color(),
            default_width: default_brush_width(),
            min_width: default_min_width(),
            max_width: default_max_width(),
            quick_colors: default_quick_colors(),
            fallback_anchor: default_fallback_anchor(),
            clear_surface_on_result: default_clear_surface_on_result(),
            recognizer_endpoint: default_recognizer_endpoint(),
            request_timeout_seconds: default_request_timeout_seconds(),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl CanvasSettings {
    /// Repairs values that would break drawing: non-finite or inverted width
    /// limits, a translucent background, an out-of-range default width.
    pub fn sanitize(&mut self) {
        if !self.min_width.is_finite() || self.min_width < MIN_WIDTH_FLOOR {
            self.min_width = default_min_width();
        }
        if !self.max_width.is_finite() || self.max_width < self.min_width {
            self.max_width = self.min_width.max(default_max_width());
        }
        if !self.default_width.is_finite() {
            self.default_width = default_brush_width();
        }
        self.default_width = self.default_width.clamp(self.min_width, self.max_width);
        self.background_color = self.background_color.opaque();
        self.default_color = self.default_color.opaque();
        if !self.fallback_anchor.x.is_finite() || !self.fallback_anchor.y.is_finite() {
            self.fallback_anchor = default_fallback_anchor();
        }
        if self.request_timeout_seconds == 0 {
            self.request_timeout_seconds = default_request_timeout_seconds();
        }
    }

    /// Palette entry `slot`, if configured.
    pub fn quick_color(&self, slot: usize) -> Option<Color> {
        self.quick_colors.get(slot).copied()
    }

    pub fn width_limits(&self) -> RangeInclusive<f32> {
        self.min_width..=self.max_width
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn initial_tool(&self) -> ToolState {
        let mut tool = ToolState {
            mode: self.default_mode,
            ..ToolState::default()
        };
        tool.select_color(self.default_color);
        tool.select_width(self.default_width, self.width_limits());
        tool
    }
}
