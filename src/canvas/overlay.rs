use crate::canvas::model::Point;

/// Fixed-pitch metrics used to size text that was not typeset.
pub const PLAIN_GLYPH_WIDTH: f32 = 14.0;
pub const PLAIN_LINE_HEIGHT: f32 = 28.0;

/// How an annotation is currently shown.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnnotationDisplay {
    /// Not yet handed to the typesetter.
    #[default]
    Pending,
    Rendered { text: String, width: f32, height: f32 },
    /// Typesetting is unavailable; the markup is shown verbatim.
    Raw,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub markup: String,
    pub anchor: Point,
    pub display: AnnotationDisplay,
}

impl Annotation {
    pub fn new(markup: impl Into<String>, anchor: Point) -> Self {
        Self {
            markup: markup.into(),
            anchor,
            display: AnnotationDisplay::Pending,
        }
    }

    /// Text to put on screen right now.
    pub fn display_text(&self) -> &str {
        match &self.display {
            AnnotationDisplay::Rendered { text, .. } => text,
            AnnotationDisplay::Pending | AnnotationDisplay::Raw => &self.markup,
        }
    }

    /// On-screen size, once known. Raw markup is measured as plain text so it
    /// can still be picked up and dragged.
    pub fn extent(&self) -> Option<(f32, f32)> {
        match &self.display {
            AnnotationDisplay::Pending => None,
            AnnotationDisplay::Rendered { width, height, .. } => Some((*width, *height)),
            AnnotationDisplay::Raw => Some((
                self.markup.chars().count() as f32 * PLAIN_GLYPH_WIDTH,
                PLAIN_LINE_HEIGHT,
            )),
        }
    }

    fn contains(&self, point: Point) -> bool {
        let Some((width, height)) = self.extent() else {
            return false;
        };
        point.x >= self.anchor.x
            && point.y >= self.anchor.y
            && point.x <= self.anchor.x + width
            && point.y <= self.anchor.y + height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    index: usize,
    grab_offset: Point,
}

/// Ordered result annotations. Later entries are drawn on top.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayModel {
    annotations: Vec<Annotation>,
    drag: Option<DragState>,
}

impl OverlayModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_annotation(&mut self, markup: impl Into<String>, anchor: Point) -> usize {
        self.annotations.push(Annotation::new(markup, anchor));
        self.annotations.len() - 1
    }

    /// Moves one annotation; returns its previous anchor, or `None` for an
    /// unknown index.
    pub fn move_annotation(&mut self, index: usize, position: Point) -> Option<Point> {
        let Some(annotation) = self.annotations.get_mut(index) else {
            tracing::warn!(index, "move requested for unknown annotation");
            return None;
        };
        Some(std::mem::replace(&mut annotation.anchor, position))
    }

    pub fn clear(&mut self) {
        self.annotations.clear();
        self.drag = None;
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.annotations.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Annotation> {
        self.annotations.iter_mut()
    }

    /// Top-most laid-out annotation under `point`.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.annotations.iter().rposition(|a| a.contains(point))
    }

    pub fn begin_drag(&mut self, index: usize, pointer: Point) -> bool {
        let Some(annotation) = self.annotations.get(index) else {
            return false;
        };
        self.drag = Some(DragState {
            index,
            grab_offset: Point::new(pointer.x - annotation.anchor.x, pointer.y - annotation.anchor.y),
        });
        true
    }

    pub fn begin_drag_at(&mut self, pointer: Point) -> Option<usize> {
        let index = self.hit_test(pointer)?;
        self.begin_drag(index, pointer).then_some(index)
    }

    pub fn drag_to(&mut self, pointer: Point) -> Option<Point> {
        let drag = self.drag?;
        let position = pointer.offset_by(-drag.grab_offset.x, -drag.grab_offset.y);
        self.move_annotation(drag.index, position)?;
        Some(position)
    }

    pub fn end_drag(&mut self) -> Option<usize> {
        self.drag.take().map(|d| d.index)
    }

    pub fn dragging(&self) -> Option<usize> {
        self.drag.map(|d| d.index)
    }
}
