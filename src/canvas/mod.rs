pub mod bindings;
pub mod composite;
pub mod export;
pub mod locate;
pub mod messages;
pub mod model;
pub mod overlay;
pub mod raster;
pub mod recognizer;
pub mod script;
pub mod session;
pub mod settings;
pub mod settings_store;
pub mod state;
pub mod stroke;
pub mod submit;
pub mod surface;
pub mod typeset;

pub use bindings::SymbolBindings;
pub use messages::{SubmissionEvent, SubmitOutcome};
pub use model::{BlendMode, Color, Point, StrokeSegment, StrokeStyle, ToolState};
pub use overlay::{Annotation, AnnotationDisplay, OverlayModel};
pub use recognizer::{HttpRecognizer, RecognitionRequest, RecognitionResponse, Recognizer, ResultItem};
pub use session::EditorSession;
pub use settings::CanvasSettings;
pub use stroke::{PointerInput, StrokeEngine, StrokePhase};
pub use surface::Surface;
pub use typeset::{PlainTextTypesetter, Typesetter};
