use crate::canvas::bindings::SymbolBindings;
use crate::canvas::locate::locate;
use crate::canvas::messages::{SubmissionEvent, SubmitOutcome};
use crate::canvas::model::{BlendMode, Color, Point, ToolState};
use crate::canvas::overlay::OverlayModel;
use crate::canvas::raster::DirtyRect;
use crate::canvas::recognizer::Recognizer;
use crate::canvas::settings::CanvasSettings;
use crate::canvas::stroke::{PointerInput, StrokeEngine};
use crate::canvas::submit::{apply_response, SubmissionCoordinator};
use crate::canvas::surface::Surface;
use crate::canvas::typeset::{TypesetQueue, Typesetter};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// One editing session: the surface, the current tool, accumulated variable
/// bindings and the result overlay.
///
/// Input adapters call the `pointer_*` methods, forward viewport resizes to
/// [`EditorSession::handle_resize`] and pump [`EditorSession::pump`] from
/// their event loop.
pub struct EditorSession {
    settings: CanvasSettings,
    surface: Option<Surface>,
    strokes: StrokeEngine,
    tool: ToolState,
    bindings: SymbolBindings,
    overlay: OverlayModel,
    submissions: SubmissionCoordinator,
    typesetter: TypesetQueue,
    last_anchor: Option<Point>,
    dirty: Option<DirtyRect>,
}

impl EditorSession {
    pub fn new(
        mut settings: CanvasSettings,
        recognizer: Arc<dyn Recognizer>,
        typesetter: Box<dyn Typesetter>,
    ) -> Self {
        settings.sanitize();
        Self {
            tool: settings.initial_tool(),
            settings,
            surface: None,
            strokes: StrokeEngine::new(),
            bindings: SymbolBindings::new(),
            overlay: OverlayModel::new(),
            submissions: SubmissionCoordinator::new(recognizer),
            typesetter: TypesetQueue::new(typesetter),
            last_anchor: None,
            dirty: None,
        }
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Viewport resize: (re)creates the surface at the new size. Any stroke
    /// in progress is dropped along with the drawing.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.strokes.cancel();
        match self.surface.as_mut() {
            Some(surface) => surface.initialize(width, height),
            None => {
                tracing::debug!(width, height, "create canvas surface");
                self.surface = Some(Surface::new(width, height, self.settings.background_color));
            }
        }
        self.dirty = Some(DirtyRect::full(width, height));
    }

    pub fn set_surface_offset(&mut self, offset: Point) {
        self.strokes.set_surface_offset(offset);
    }

    pub fn pointer_down(&mut self, input: &PointerInput) {
        if self.surface.is_none() {
            return;
        }
        self.strokes.handle_pointer_down(input);
    }

    pub fn pointer_move(&mut self, input: &PointerInput) -> Option<DirtyRect> {
        let surface = self.surface.as_mut()?;
        let dirty = self.strokes.handle_pointer_move(input, surface, &self.tool)?;
        self.dirty = Some(self.dirty.map_or(dirty, |d| d.union(dirty)));
        Some(dirty)
    }

    pub fn pointer_up(&mut self) {
        self.strokes.handle_pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.strokes.handle_pointer_leave();
    }

    /// Region of the surface changed since the last call.
    pub fn take_dirty(&mut self) -> Option<DirtyRect> {
        self.dirty.take()
    }

    pub fn tool(&self) -> &ToolState {
        &self.tool
    }

    pub fn select_mode(&mut self, mode: BlendMode) {
        tracing::debug!(?mode, "select tool mode");
        self.tool.select_mode(mode);
    }

    pub fn select_color(&mut self, color: Color) {
        self.tool.select_color(color);
    }

    /// Picks a color from the configured palette. Returns `false` for an
    /// unknown slot, leaving the tool unchanged.
    pub fn select_quick_color(&mut self, slot: usize) -> bool {
        let Some(color) = self.settings.quick_color(slot) else {
            tracing::warn!(slot, "no quick color in that slot");
            return false;
        };
        self.tool.select_color(color);
        true
    }

    pub fn select_width(&mut self, width: f32) {
        self.tool.select_width(width, self.settings.width_limits());
    }

    /// Clears the drawing, every variable binding and every annotation.
    pub fn reset(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
            self.dirty = Some(DirtyRect::full(surface.width(), surface.height()));
        }
        self.bindings.clear();
        self.overlay.clear();
        self.last_anchor = None;
    }

    pub fn bindings(&self) -> &SymbolBindings {
        &self.bindings
    }

    pub fn overlay(&self) -> &OverlayModel {
        &self.overlay
    }

    pub fn move_annotation(&mut self, index: usize, position: Point) -> Option<Point> {
        self.overlay.move_annotation(index, position)
    }

    pub fn begin_annotation_drag(&mut self, pointer: Point) -> Option<usize> {
        self.overlay.begin_drag_at(pointer)
    }

    pub fn drag_annotation(&mut self, pointer: Point) -> Option<Point> {
        self.overlay.drag_to(pointer)
    }

    pub fn end_annotation_drag(&mut self) -> Option<usize> {
        self.overlay.end_drag()
    }

    pub fn is_submitting(&self) -> bool {
        self.submissions.is_in_flight()
    }

    /// Anchor used when the surface is empty at submit time.
    pub fn fallback_anchor(&self) -> Point {
        self.last_anchor.unwrap_or(self.settings.fallback_anchor)
    }

    /// Exports the surface and sends it with the current bindings. The
    /// result anchor is computed now, from the strokes committed so far.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        if self.submissions.is_in_flight() {
            return Ok(SubmitOutcome::AlreadyInFlight);
        }
        let Some(surface) = self.surface.as_ref() else {
            tracing::debug!("submit requested before the surface exists");
            return Ok(SubmitOutcome::NoSurface);
        };

        let image = surface.export_image().context("export surface for submission")?;
        let anchor = locate(surface, self.fallback_anchor());
        self.submissions.submit(image, &self.bindings, anchor)
    }

    /// Applies a finished submission, if any, without blocking.
    pub fn pump(&mut self) -> Option<SubmissionEvent> {
        let event = self.submissions.poll()?;
        self.apply_event(&event);
        Some(event)
    }

    pub fn wait_for_submission(&mut self, timeout: Duration) -> Option<SubmissionEvent> {
        let event = self.submissions.wait(timeout)?;
        self.apply_event(&event);
        Some(event)
    }

    /// Typesets annotations that have not been rendered yet.
    pub fn refresh_typesetting(&mut self) -> usize {
        self.typesetter.refresh(&mut self.overlay)
    }

    fn apply_event(&mut self, event: &SubmissionEvent) {
        let SubmissionEvent::Succeeded {
            anchor, response, ..
        } = event
        else {
            return;
        };

        let added = apply_response(response, *anchor, &mut self.bindings, &mut self.overlay);
        self.last_anchor = Some(*anchor);
        if added > 0 && self.settings.clear_surface_on_result {
            if let Some(surface) = self.surface.as_mut() {
                surface.clear();
                self.dirty = Some(DirtyRect::full(surface.width(), surface.height()));
            }
        }
        self.refresh_typesetting();
    }
}
