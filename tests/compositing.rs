use math_canvas::canvas::locate::{locate, marked_bounds};
use math_canvas::canvas::{BlendMode, Color, Point, StrokeSegment, StrokeStyle, Surface};

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
fn vertical_stroke_bounds_match_half_width() {
    let mut surface = Surface::new(100, 100, Color::BLACK);
    surface.commit_segment(&segment((10.0, 10.0), (10.0, 50.0), 4.0, BlendMode::Paint));

    let bounds = marked_bounds(&surface).expect("marked pixels");
    assert!((8..=10).contains(&bounds.min_x), "{bounds:?}");
    assert!((10..=12).contains(&bounds.max_x), "{bounds:?}");
    assert!((8..=10).contains(&bounds.min_y), "{bounds:?}");
    assert!((50..=52).contains(&bounds.max_y), "{bounds:?}");
    assert_eq!(locate(&surface, Point::new(10.0, 200.0)), Point::new(10.0, 30.0));
}

#[test]
fn erase_over_paint_restores_untouched_pixels() {
    let fresh = Surface::new(64, 48, Color::BLACK);
    let mut surface = Surface::new(64, 48, Color::BLACK);

    let colors = [
        Color::WHITE,
        Color::rgb(255, 0, 0),
        Color::rgba(0, 255, 0, 128),
    ];
    for (i, color) in colors.into_iter().enumerate() {
        let mut seg = segment((10.0, 20.0), (50.0, 20.0 + i as f32), 6.0, BlendMode::Paint);
        seg.style.color = color;
        surface.commit_segment(&seg);
    }
    surface.commit_segment(&segment((10.0, 21.0), (50.0, 21.0), 16.0, BlendMode::Erase));

    assert_eq!(surface.read_pixels(), fresh.read_pixels());
    assert!(marked_bounds(&surface).is_none());
}

#[test]
fn single_marked_pixel_is_its_own_anchor() {
    let mut surface = Surface::new(40, 40, Color::BLACK);
    surface.commit_segment(&segment((17.0, 23.0), (17.0, 23.0), 1.0, BlendMode::Paint));

    assert_eq!(locate(&surface, Point::new(10.0, 200.0)), Point::new(17.0, 23.0));
}

#[test]
fn blank_surface_locates_to_fallback() {
    let surface = Surface::new(40, 40, Color::BLACK);
    let anchor = locate(&surface, Point::new(10.0, 200.0));
    assert_eq!(anchor, Point::new(10.0, 200.0));
    assert!(anchor.x.is_finite() && anchor.y.is_finite());
}

#[test]
fn extreme_widths_and_coordinates_stay_on_the_surface() {
    let mut surface = Surface::new(50, 50, Color::BLACK);

    let dirty = surface
        .commit_segment(&segment((10.0, 10.0), (20.0, 20.0), f32::MAX, BlendMode::Paint))
        .expect("dirty rect");
    assert_eq!((dirty.x, dirty.y, dirty.width, dirty.height), (0, 0, 50, 50));
    assert!(surface.read_pixels().chunks_exact(4).all(|px| px == [255, 255, 255, 255]));

    surface.commit_segment(&segment((10.0, 10.0), (20.0, 20.0), f32::MAX, BlendMode::Erase));
    assert!(surface.is_blank());

    let dirty = surface
        .commit_segment(&segment((10.0, 25.0), (3.0e9, 25.0), 4.0, BlendMode::Paint))
        .expect("dirty rect");
    assert_eq!(dirty.x + dirty.width, 50);
    let bounds = marked_bounds(&surface).expect("marked pixels");
    assert_eq!((bounds.min_y, bounds.max_y, bounds.max_x), (23, 27, 49));

    assert!(surface
        .commit_segment(&segment((-3.0e9, -3.0e9), (-2.0e9, -1.0e9), 0.0, BlendMode::Paint))
        .is_none());
    assert!(surface
        .commit_segment(&segment((f32::MIN, 0.0), (f32::MAX, 0.0), f32::MAX, BlendMode::Erase))
        .is_some());
}
