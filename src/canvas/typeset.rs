use crate::canvas::overlay::{
    AnnotationDisplay, OverlayModel, PLAIN_GLYPH_WIDTH, PLAIN_LINE_HEIGHT,
};
use anyhow::Result;

/// Inline math delimiters understood by the typesetter.
pub const INLINE_DELIMITERS: [(&str, &str); 2] = [("$", "$"), ("\\(", "\\)")];

const SIZE_COMMAND: &str = "\\LARGE{";

/// Markup shown for one recognized item.
pub fn renderable_form(expr: &str, result: &str) -> String {
    format!("\\(\\LARGE{{{expr} = {result}}}\\)")
}

/// Strips the inline delimiters and size command from `markup`, leaving the
/// bare expression.
pub fn strip_markup(markup: &str) -> &str {
    let mut body = markup.trim();
    for (open, close) in INLINE_DELIMITERS {
        if let Some(inner) = body
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            body = inner.trim();
            break;
        }
    }
    body.strip_prefix(SIZE_COMMAND)
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(body)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMarkup {
    pub text: String,
    pub width: f32,
    pub height: f32,
}

pub trait Typesetter: Send {
    /// Prepares the engine. Called once before the first `typeset`.
    fn load(&mut self) -> Result<()> {
        Ok(())
    }

    fn typeset(&self, markup: &str) -> Result<RenderedMarkup>;
}

/// Renders markup as plain text with a fixed-pitch size estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlainTextTypesetter {
    pub glyph_width: f32,
    pub line_height: f32,
}

impl Default for PlainTextTypesetter {
    fn default() -> Self {
        Self {
            glyph_width: PLAIN_GLYPH_WIDTH,
            line_height: PLAIN_LINE_HEIGHT,
        }
    }
}

impl Typesetter for PlainTextTypesetter {
    fn typeset(&self, markup: &str) -> Result<RenderedMarkup> {
        let text = strip_markup(markup).to_string();
        Ok(RenderedMarkup {
            width: text.chars().count() as f32 * self.glyph_width,
            height: self.line_height,
            text,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Unloaded,
    Ready,
    Failed,
}

/// Feeds newly added annotations to a [`Typesetter`], loading it lazily.
/// When the engine cannot be loaded every annotation falls back to its raw
/// markup.
pub struct TypesetQueue {
    engine: Box<dyn Typesetter>,
    status: EngineStatus,
}

impl TypesetQueue {
    pub fn new(engine: Box<dyn Typesetter>) -> Self {
        Self {
            engine,
            status: EngineStatus::Unloaded,
        }
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// Typesets every pending annotation and returns how many changed.
    /// Already rendered annotations are left untouched.
    pub fn refresh(&mut self, overlay: &mut OverlayModel) -> usize {
        if overlay
            .iter()
            .all(|a| a.display != AnnotationDisplay::Pending)
        {
            return 0;
        }

        if self.status == EngineStatus::Unloaded {
            self.status = match self.engine.load() {
                Ok(()) => EngineStatus::Ready,
                Err(err) => {
                    tracing::warn!(?err, "typesetter failed to load; showing raw markup");
                    EngineStatus::Failed
                }
            };
        }

        let mut updated = 0;
        for annotation in overlay.iter_mut() {
            if annotation.display != AnnotationDisplay::Pending {
                continue;
            }
            annotation.display = match self.status {
                EngineStatus::Ready => match self.engine.typeset(&annotation.markup) {
                    Ok(rendered) => AnnotationDisplay::Rendered {
                        text: rendered.text,
                        width: rendered.width,
                        height: rendered.height,
                    },
                    Err(err) => {
                        tracing::warn!(?err, markup = %annotation.markup, "typesetting failed");
                        AnnotationDisplay::Raw
                    }
                },
                EngineStatus::Unloaded | EngineStatus::Failed => AnnotationDisplay::Raw,
            };
            updated += 1;
        }
        updated
    }
}
