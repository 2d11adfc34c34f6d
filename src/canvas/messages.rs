use crate::canvas::model::Point;
use crate::canvas::recognizer::RecognitionResponse;

/// Worker thread to event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerToMain {
    Completed {
        id: u64,
        response: RecognitionResponse,
    },
    Failed {
        id: u64,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started { id: u64 },
    /// A submission is already running; nothing was sent.
    AlreadyInFlight,
    /// No surface exists yet; nothing was sent.
    NoSurface,
}

/// Final result of one submission, delivered once the worker reports back.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionEvent {
    Succeeded {
        id: u64,
        anchor: Point,
        response: RecognitionResponse,
    },
    Failed {
        id: u64,
        error: String,
    },
}

impl SubmissionEvent {
    pub fn id(&self) -> u64 {
        match self {
            Self::Succeeded { id, .. } | Self::Failed { id, .. } => *id,
        }
    }
}
