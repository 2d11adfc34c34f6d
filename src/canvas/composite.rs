use crate::canvas::model::{BlendMode, Color};

/// Porter-Duff source-over with straight (non-premultiplied) alpha.
pub fn source_over(bottom: Color, top: Color) -> Color {
    let sa = top.a as f32 / 255.0;
    let da = bottom.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= f32::EPSILON {
        return Color::TRANSPARENT;
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Color {
        r: blend(top.r, bottom.r),
        g: blend(top.g, bottom.g),
        b: blend(top.b, bottom.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}

/// Porter-Duff destination-out: the destination keeps its color and loses
/// alpha in proportion to the source coverage.
pub fn destination_out(bottom: Color, coverage: u8) -> Color {
    let sa = coverage as f32 / 255.0;
    let out_a = (bottom.a as f32 / 255.0) * (1.0 - sa);
    if out_a <= f32::EPSILON {
        return Color::TRANSPARENT;
    }
    Color {
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ..bottom
    }
}

/// Composites a pixel whose alpha was reduced back over the surface
/// background, so an erased pixel reads exactly like one never drawn on.
pub fn refill_background(pixel: Color, background: Color) -> Color {
    source_over(background, pixel)
}

pub fn composite_pixel(dst: &mut [u8], mode: BlendMode, color: Color, background: Color) {
    let bottom = Color::from_rgba_slice(dst);
    let out = match mode {
        BlendMode::Paint => source_over(bottom, color),
        BlendMode::Erase => refill_background(destination_out(bottom, 255), background),
    };
    dst.copy_from_slice(&out.to_rgba_array());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_transparent_source_blends_over_opaque_pixel() {
        let out = source_over(Color::rgba(100, 100, 100, 255), Color::rgba(200, 0, 0, 128));
        assert_eq!(out, Color::rgba(150, 50, 50, 255));
    }

    #[test]
    fn opaque_paint_replaces_destination() {
        let out = source_over(Color::BLACK, Color::rgb(10, 20, 30));
        assert_eq!(out, Color::rgb(10, 20, 30));
    }

    #[test]
    fn full_coverage_destination_out_is_fully_transparent() {
        assert_eq!(
            destination_out(Color::rgb(255, 0, 0), 255),
            Color::TRANSPARENT
        );
        assert_eq!(destination_out(Color::rgb(255, 0, 0), 0), Color::rgb(255, 0, 0));
    }

    #[test]
    fn erase_restores_background_exactly() {
        let background = Color::rgb(12, 34, 56);
        let mut px = Color::rgb(250, 250, 250).to_rgba_array();
        composite_pixel(&mut px, BlendMode::Erase, Color::WHITE, background);
        assert_eq!(Color::from_rgba_slice(&px), background);
    }

    #[test]
    fn erase_ignores_stroke_color() {
        let background = Color::BLACK;
        let mut a = Color::rgb(1, 2, 3).to_rgba_array();
        let mut b = Color::rgb(1, 2, 3).to_rgba_array();
        composite_pixel(&mut a, BlendMode::Erase, Color::WHITE, background);
        composite_pixel(&mut b, BlendMode::Erase, Color::rgb(9, 9, 9), background);
        assert_eq!(a, b);
    }
}
