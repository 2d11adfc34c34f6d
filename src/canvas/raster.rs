use crate::canvas::model::Point;

pub const MIN_STROKE_WIDTH: f32 = 1.0;

/// Pixel rectangle touched by a draw call, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DirtyRect {
    pub fn from_points(a: (i32, i32), b: (i32, i32), pad: i32) -> Self {
        let min_x = a.0.min(b.0).saturating_sub(pad);
        let max_x = a.0.max(b.0).saturating_add(pad);
        let min_y = a.1.min(b.1).saturating_sub(pad);
        let max_y = a.1.max(b.1).saturating_add(pad);
        Self {
            x: min_x,
            y: min_y,
            width: max_x.saturating_sub(min_x).saturating_add(1).max(1),
            height: max_y.saturating_sub(min_y).saturating_add(1).max(1),
        }
    }

    fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: dimension(width),
            height: dimension(height),
        }
    }

    pub fn union(self, other: DirtyRect) -> DirtyRect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = self.right().max(other.right());
        let max_y = self.bottom().max(other.bottom());
        DirtyRect {
            x: min_x,
            y: min_y,
            width: max_x.saturating_sub(min_x).max(1),
            height: max_y.saturating_sub(min_y).max(1),
        }
    }

    pub fn clamp(self, width: u32, height: u32) -> Option<DirtyRect> {
        let max_w = dimension(width);
        let max_h = dimension(height);
        let x0 = self.x.clamp(0, max_w);
        let y0 = self.y.clamp(0, max_h);
        let x1 = self.right().clamp(0, max_w);
        let y1 = self.bottom().clamp(0, max_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(DirtyRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }
}

fn dimension(size: u32) -> i32 {
    i32::try_from(size).unwrap_or(i32::MAX)
}

/// Coordinates are kept within this distance of the origin so that every
/// rectangle width or height still fits in an `i32`.
const PIXEL_COORD_LIMIT: f32 = (i32::MAX / 2) as f32;

pub fn segment_dirty_bounds(start: Point, end: Point, stroke_width: f32) -> DirtyRect {
    let pad = (stroke_width.max(MIN_STROKE_WIDTH) / 2.0).ceil() + 1.0;
    let to_px = |v: f32| v.round().clamp(-PIXEL_COORD_LIMIT, PIXEL_COORD_LIMIT) as i32;
    DirtyRect::from_points(
        (to_px(start.x.min(end.x) - pad), to_px(start.y.min(end.y) - pad)),
        (to_px(start.x.max(end.x) + pad), to_px(start.y.max(end.y) + pad)),
        0,
    )
}

/// Rasterizes a round-capped segment of the given width, calling `plot` once
/// for every covered pixel inside a `width` x `height` surface.
///
/// Coverage is binary: a pixel is covered when its sample point lies within
/// half the stroke width of the segment. Consecutive segments that share an
/// endpoint therefore join with a round join.
pub fn rasterize_segment<F>(
    start: Point,
    end: Point,
    stroke_width: f32,
    width: u32,
    height: u32,
    mut plot: F,
) -> Option<DirtyRect>
where
    F: FnMut(u32, u32),
{
    if width == 0 || height == 0 {
        return None;
    }
    if ![start.x, start.y, end.x, end.y, stroke_width]
        .iter()
        .all(|v| v.is_finite())
    {
        return None;
    }

    let radius = stroke_width.max(MIN_STROKE_WIDTH) / 2.0;
    let clip = segment_dirty_bounds(start, end, stroke_width).clamp(width, height)?;
    let radius_sq = radius * radius;
    for y in clip.y..(clip.y + clip.height) {
        for x in clip.x..(clip.x + clip.width) {
            if point_segment_distance_sq(Point::new(x as f32, y as f32), start, end) <= radius_sq {
                plot(x as u32, y as u32);
            }
        }
    }
    Some(clip)
}

fn point_segment_distance_sq(point: Point, start: Point, end: Point) -> f32 {
    let vx = end.x - start.x;
    let vy = end.y - start.y;
    let wx = point.x - start.x;
    let wy = point.y - start.y;
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        return wx * wx + wy * wy;
    }
    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let dx = point.x - (start.x + vx * t);
    let dy = point.y - (start.y + vy * t);
    dx * dx + dy * dy
}
