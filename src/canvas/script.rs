//! JSON pointer-event scripts, replayed onto an [`EditorSession`] by the
//! headless driver.

use crate::canvas::messages::{SubmissionEvent, SubmitOutcome};
use crate::canvas::model::{BlendMode, Color, Point};
use crate::canvas::session::EditorSession;
use crate::canvas::stroke::PointerInput;
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StrokeScript {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub offset: Point,
    pub events: Vec<ScriptEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptEvent {
    Down {
        x: f32,
        y: f32,
        #[serde(default)]
        touch: bool,
    },
    Move {
        x: f32,
        y: f32,
        #[serde(default)]
        touch: bool,
    },
    Up,
    Leave,
    Resize {
        width: u32,
        height: u32,
    },
    Mode {
        mode: BlendMode,
    },
    Color {
        color: String,
    },
    /// Palette color by index into the configured quick colors.
    Swatch {
        slot: usize,
    },
    Width {
        width: f32,
    },
    Submit,
    Reset,
}

fn pointer(x: f32, y: f32, touch: bool) -> PointerInput {
    if touch {
        PointerInput::touch(x, y)
    } else {
        PointerInput::mouse(x, y)
    }
}

pub fn load_script(path: &Path) -> Result<StrokeScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read stroke script {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("deserialize stroke script {}", path.display()))
}

/// Plays `script` into `session`. Each `submit` event waits up to
/// `submit_timeout` for its result; finished submissions are returned in
/// order.
pub fn replay(
    session: &mut EditorSession,
    script: &StrokeScript,
    submit_timeout: Duration,
) -> Result<Vec<SubmissionEvent>> {
    session.handle_resize(script.width, script.height);
    session.set_surface_offset(script.offset);

    let mut finished = Vec::new();
    for (index, event) in script.events.iter().enumerate() {
        match event {
            ScriptEvent::Down { x, y, touch } => session.pointer_down(&pointer(*x, *y, *touch)),
            ScriptEvent::Move { x, y, touch } => {
                session.pointer_move(&pointer(*x, *y, *touch));
            }
            ScriptEvent::Up => session.pointer_up(),
            ScriptEvent::Leave => session.pointer_leave(),
            ScriptEvent::Resize { width, height } => session.handle_resize(*width, *height),
            ScriptEvent::Mode { mode } => session.select_mode(*mode),
            ScriptEvent::Color { color } => {
                let parsed = Color::from_hex(color)
                    .ok_or_else(|| anyhow!("event {index}: invalid color {color:?}"))?;
                session.select_color(parsed);
            }
            ScriptEvent::Swatch { slot } => {
                if !session.select_quick_color(*slot) {
                    bail!("event {index}: no quick color in slot {slot}");
                }
            }
            ScriptEvent::Width { width } => session.select_width(*width),
            ScriptEvent::Reset => session.reset(),
            ScriptEvent::Submit => {
                let outcome = session
                    .submit()
                    .with_context(|| format!("event {index}: submit"))?;
                if !matches!(outcome, SubmitOutcome::Started { .. }) {
                    tracing::warn!(index, ?outcome, "submit event did not start a submission");
                    continue;
                }
                match session.wait_for_submission(submit_timeout) {
                    Some(done) => finished.push(done),
                    None => tracing::warn!(index, "submission still running after timeout"),
                }
            }
        }
    }
    Ok(finished)
}
