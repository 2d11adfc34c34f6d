use crate::canvas::model::Point;
use crate::canvas::surface::Surface;

/// Inclusive pixel bounds of everything drawn on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) as f32 / 2.0,
            (self.min_y + self.max_y) as f32 / 2.0,
        )
    }
}

/// Full row-major scan for pixels that differ from the surface background.
/// Returns `None` when nothing is drawn.
pub fn marked_bounds(surface: &Surface) -> Option<BoundingBox> {
    let (width, height) = surface.size();
    let background = surface.background().to_rgba_array();
    let pixels = surface.read_pixels();

    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut marked = false;

    for y in 0..height {
        let row = (y as usize) * (width as usize) * 4;
        for x in 0..width {
            let idx = row + (x as usize) * 4;
            if pixels[idx..idx + 4] != background {
                marked = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }

    if !marked || min_x > max_x || min_y > max_y {
        return None;
    }
    Some(BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
    })
}

/// Anchor point for result overlays: the center of the drawn content, or
/// `fallback` when the surface is empty.
pub fn locate(surface: &Surface, fallback: Point) -> Point {
    match marked_bounds(surface) {
        Some(bounds) => bounds.center(),
        None => {
            tracing::debug!(?fallback, "no marked pixels; using fallback anchor");
            fallback
        }
    }
}
