use crate::canvas::composite::composite_pixel;
use crate::canvas::export::encode_png_data_uri;
use crate::canvas::model::{Color, StrokeSegment};
use crate::canvas::raster::{rasterize_segment, DirtyRect};
use anyhow::Result;

/// RGBA8 raster the user draws on. Every pixel equal to `background` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    background: Color,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let background = background.opaque();
        Self {
            width,
            height,
            background,
            pixels: filled(width, height, background),
        }
    }

    /// Reallocates the buffer at the new size. Existing strokes are dropped.
    pub fn initialize(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "initialize canvas surface");
        self.width = width;
        self.height = height;
        self.pixels = filled(width, height, self.background);
    }

    pub fn clear(&mut self) {
        let bg = self.background.to_rgba_array();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bg);
        }
    }

    pub fn commit_segment(&mut self, segment: &StrokeSegment) -> Option<DirtyRect> {
        let (width, height) = (self.width, self.height);
        let background = self.background;
        let style = segment.style;
        let pixels = &mut self.pixels;
        rasterize_segment(
            segment.start,
            segment.end,
            style.width,
            width,
            height,
            |x, y| {
                let idx = ((y as usize) * (width as usize) + x as usize) * 4;
                composite_pixel(&mut pixels[idx..idx + 4], style.mode, style.color, background);
            },
        )
    }

    pub fn export_image(&self) -> Result<String> {
        encode_png_data_uri(self.width, self.height, &self.pixels)
    }

    pub fn read_pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Color::from_rgba_slice(&self.pixels[idx..idx + 4])
    }

    pub fn is_blank(&self) -> bool {
        let bg = self.background.to_rgba_array();
        self.pixels.chunks_exact(4).all(|px| px == bg)
    }
}

fn filled(width: u32, height: u32, fill: Color) -> Vec<u8> {
    let len = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    let mut pixels = vec![0u8; len];
    for chunk in pixels.chunks_exact_mut(4) {
        chunk.copy_from_slice(&fill.to_rgba_array());
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::model::{BlendMode, Point, StrokeStyle};

    fn segment(start: (f32, f32), end: (f32, f32), width: f32, mode: BlendMode) -> StrokeSegment {
        StrokeSegment {
            start: Point::new(start.0, start.1),
            end: Point::new(end.0, end.1),
            style: StrokeStyle {
                width,
                mode,
                color: Color::WHITE,
            },
        }
    }

    #[test]
    fn new_surface_is_filled_with_opaque_background() {
        let surface = Surface::new(3, 2, Color::rgba(1, 2, 3, 0));
        assert_eq!(surface.background(), Color::rgb(1, 2, 3));
        assert_eq!(surface.read_pixels().len(), 3 * 2 * 4);
        assert!(surface.is_blank());
    }

    #[test]
    fn initialize_resizes_and_drops_strokes() {
        let mut surface = Surface::new(20, 20, Color::BLACK);
        surface.commit_segment(&segment((2.0, 2.0), (15.0, 15.0), 3.0, BlendMode::Paint));
        assert!(!surface.is_blank());

        surface.initialize(40, 10);
        assert_eq!(surface.size(), (40, 10));
        assert!(surface.is_blank());
    }

    #[test]
    fn paint_writes_stroke_color() {
        let mut surface = Surface::new(20, 20, Color::BLACK);
        let dirty = surface.commit_segment(&segment((5.0, 5.0), (5.0, 10.0), 2.0, BlendMode::Paint));
        assert!(dirty.is_some());
        assert_eq!(surface.pixel(5, 7), Color::WHITE);
        assert_eq!(surface.pixel(15, 15), Color::BLACK);
    }

    #[test]
    fn erase_over_paint_matches_never_drawn_surface() {
        let mut surface = Surface::new(30, 30, Color::BLACK);
        surface.commit_segment(&segment((5.0, 5.0), (20.0, 5.0), 4.0, BlendMode::Paint));
        surface.commit_segment(&segment((20.0, 5.0), (20.0, 20.0), 4.0, BlendMode::Paint));
        surface.commit_segment(&segment((5.0, 5.0), (20.0, 5.0), 6.0, BlendMode::Erase));
        surface.commit_segment(&segment((20.0, 5.0), (20.0, 20.0), 6.0, BlendMode::Erase));

        assert_eq!(surface, Surface::new(30, 30, Color::BLACK));
    }

    #[test]
    fn clear_keeps_dimensions() {
        let mut surface = Surface::new(8, 4, Color::BLACK);
        surface.commit_segment(&segment((1.0, 1.0), (6.0, 2.0), 2.0, BlendMode::Paint));
        surface.clear();
        assert_eq!(surface.size(), (8, 4));
        assert!(surface.is_blank());
    }

    #[test]
    fn zero_sized_surface_ignores_segments() {
        let mut surface = Surface::new(0, 0, Color::BLACK);
        assert!(surface
            .commit_segment(&segment((0.0, 0.0), (1.0, 1.0), 2.0, BlendMode::Paint))
            .is_none());
        assert!(surface.read_pixels().is_empty());
    }
}
