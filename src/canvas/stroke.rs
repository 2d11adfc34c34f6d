use crate::canvas::model::{Point, StrokeSegment, ToolState};
use crate::canvas::raster::DirtyRect;
use crate::canvas::surface::Surface;

/// Raw pointer sample as delivered by a mouse or touch event, in device
/// (client) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Mouse { client: Point },
    Touch { touches: Vec<Point>, changed: Vec<Point> },
}

impl PointerInput {
    pub fn mouse(x: f32, y: f32) -> Self {
        Self::Mouse {
            client: Point::new(x, y),
        }
    }

    pub fn touch(x: f32, y: f32) -> Self {
        Self::Touch {
            touches: vec![Point::new(x, y)],
            changed: Vec::new(),
        }
    }

    /// The first active touch wins; a touch that just ended only shows up in
    /// `changed`.
    pub fn client_position(&self) -> Option<Point> {
        match self {
            Self::Mouse { client } => Some(*client),
            Self::Touch { touches, changed } => {
                touches.first().or_else(|| changed.first()).copied()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokePhase {
    #[default]
    Idle,
    Drawing,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrokeEngine {
    phase: StrokePhase,
    last: Option<Point>,
    surface_offset: Point,
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> StrokePhase {
        self.phase
    }

    pub fn last_position(&self) -> Option<Point> {
        self.last
    }

    /// On-screen position of the surface's top-left corner.
    pub fn set_surface_offset(&mut self, offset: Point) {
        self.surface_offset = offset;
    }

    pub fn to_surface_coords(&self, input: &PointerInput) -> Option<Point> {
        let client = input.client_position()?;
        Some(client.offset_by(-self.surface_offset.x, -self.surface_offset.y))
    }

    pub fn handle_pointer_down(&mut self, input: &PointerInput) {
        let Some(point) = self.to_surface_coords(input) else {
            return;
        };
        self.phase = StrokePhase::Drawing;
        self.last = Some(point);
    }

    /// Commits the segment from the last recorded position to `input`.
    pub fn handle_pointer_move(
        &mut self,
        input: &PointerInput,
        surface: &mut Surface,
        tool: &ToolState,
    ) -> Option<DirtyRect> {
        if self.phase != StrokePhase::Drawing {
            return None;
        }
        let point = self.to_surface_coords(input)?;
        let start = self.last.replace(point)?;
        surface.commit_segment(&StrokeSegment {
            start,
            end: point,
            style: tool.stroke_style(),
        })
    }

    pub fn handle_pointer_up(&mut self) {
        self.finish();
    }

    pub fn handle_pointer_leave(&mut self) {
        self.finish();
    }

    /// Drops the in-progress path, e.g. when the surface is resized mid-stroke.
    pub fn cancel(&mut self) {
        if self.phase == StrokePhase::Drawing {
            tracing::debug!("discarding in-progress stroke");
        }
        self.finish();
    }

    fn finish(&mut self) {
        self.phase = StrokePhase::Idle;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::model::{BlendMode, Color};

    fn surface() -> Surface {
        Surface::new(50, 50, Color::BLACK)
    }

    #[test]
    fn move_without_down_commits_nothing() {
        let mut engine = StrokeEngine::new();
        let mut surface = surface();
        let dirty =
            engine.handle_pointer_move(&PointerInput::mouse(10.0, 10.0), &mut surface, &ToolState::default());
        assert!(dirty.is_none());
        assert!(surface.is_blank());
    }

    #[test]
    fn down_move_up_draws_and_returns_to_idle() {
        let mut engine = StrokeEngine::new();
        let mut surface = surface();
        let tool = ToolState::default();

        engine.handle_pointer_down(&PointerInput::mouse(10.0, 10.0));
        assert_eq!(engine.phase(), StrokePhase::Drawing);
        engine.handle_pointer_move(&PointerInput::mouse(20.0, 10.0), &mut surface, &tool);
        engine.handle_pointer_move(&PointerInput::mouse(20.0, 30.0), &mut surface, &tool);
        assert_eq!(engine.last_position(), Some(Point::new(20.0, 30.0)));
        engine.handle_pointer_up();

        assert_eq!(engine.phase(), StrokePhase::Idle);
        assert_eq!(surface.pixel(15, 10), Color::WHITE);
        assert_eq!(surface.pixel(20, 25), Color::WHITE);

        let before = surface.clone();
        engine.handle_pointer_move(&PointerInput::mouse(40.0, 40.0), &mut surface, &tool);
        assert_eq!(surface, before);
    }

    #[test]
    fn leave_ends_the_stroke() {
        let mut engine = StrokeEngine::new();
        engine.handle_pointer_down(&PointerInput::mouse(1.0, 1.0));
        engine.handle_pointer_leave();
        assert_eq!(engine.phase(), StrokePhase::Idle);
        assert_eq!(engine.last_position(), None);
    }

    #[test]
    fn offset_is_subtracted_from_client_coordinates() {
        let mut engine = StrokeEngine::new();
        engine.set_surface_offset(Point::new(100.0, 40.0));
        assert_eq!(
            engine.to_surface_coords(&PointerInput::mouse(110.0, 45.0)),
            Some(Point::new(10.0, 5.0))
        );
        assert_eq!(
            engine.to_surface_coords(&PointerInput::touch(110.0, 45.0)),
            Some(Point::new(10.0, 5.0))
        );
    }

    #[test]
    fn touch_falls_back_to_changed_touches() {
        let ended = PointerInput::Touch {
            touches: Vec::new(),
            changed: vec![Point::new(3.0, 4.0)],
        };
        assert_eq!(ended.client_position(), Some(Point::new(3.0, 4.0)));
        let empty = PointerInput::Touch {
            touches: Vec::new(),
            changed: Vec::new(),
        };
        assert_eq!(empty.client_position(), None);

        let mut engine = StrokeEngine::new();
        engine.handle_pointer_down(&empty);
        assert_eq!(engine.phase(), StrokePhase::Idle);
    }

    #[test]
    fn erase_mode_stroke_restores_background() {
        let mut engine = StrokeEngine::new();
        let mut surface = surface();
        let mut tool = ToolState::default();

        engine.handle_pointer_down(&PointerInput::mouse(5.0, 25.0));
        engine.handle_pointer_move(&PointerInput::mouse(45.0, 25.0), &mut surface, &tool);
        engine.handle_pointer_up();

        tool.select_mode(BlendMode::Erase);
        tool.width = 8.0;
        engine.handle_pointer_down(&PointerInput::touch(5.0, 25.0));
        engine.handle_pointer_move(&PointerInput::touch(45.0, 25.0), &mut surface, &tool);
        engine.handle_pointer_up();

        assert!(surface.is_blank());
    }

    #[test]
    fn cancel_discards_tracked_position() {
        let mut engine = StrokeEngine::new();
        engine.handle_pointer_down(&PointerInput::mouse(1.0, 1.0));
        engine.cancel();
        assert_eq!(engine.phase(), StrokePhase::Idle);
        assert_eq!(engine.last_position(), None);
    }
}
