use crate::canvas::bindings::SymbolBindings;
use crate::canvas::messages::{SubmissionEvent, SubmitOutcome, WorkerToMain};
use crate::canvas::model::Point;
use crate::canvas::overlay::OverlayModel;
use crate::canvas::recognizer::{RecognitionRequest, RecognitionResponse, Recognizer};
use crate::canvas::state::{can_transition, SubmissionState};
use crate::canvas::typeset::renderable_form;
use anyhow::{Context, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

struct PendingSubmission {
    id: u64,
    anchor: Point,
    started: Instant,
    worker_rx: Receiver<WorkerToMain>,
    worker: Option<JoinHandle<()>>,
}

/// Runs at most one recognition request at a time on a worker thread.
///
/// The caller's event loop pumps [`SubmissionCoordinator::poll`]; every
/// started submission yields exactly one [`SubmissionEvent`] and the
/// coordinator is back in [`SubmissionState::Idle`] once it has been
/// delivered, even if the recognizer panicked.
pub struct SubmissionCoordinator {
    state: SubmissionState,
    recognizer: Arc<dyn Recognizer>,
    pending: Option<PendingSubmission>,
    next_id: u64,
}

impl SubmissionCoordinator {
    pub fn new(recognizer: Arc<dyn Recognizer>) -> Self {
        Self {
            state: SubmissionState::Idle,
            recognizer,
            pending: None,
            next_id: 1,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.is_in_flight()
    }

    /// Sends `image` and a snapshot of `bindings` to the recognizer. `anchor`
    /// is where the results of this submission will be placed.
    pub fn submit(
        &mut self,
        image: String,
        bindings: &SymbolBindings,
        anchor: Point,
    ) -> Result<SubmitOutcome> {
        if self.state.is_in_flight() {
            tracing::debug!("submission already in flight; ignoring request");
            return Ok(SubmitOutcome::AlreadyInFlight);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.transition(SubmissionState::InFlight);

        let request = RecognitionRequest {
            image,
            variables: bindings.clone(),
        };
        let recognizer = Arc::clone(&self.recognizer);
        let (worker_tx, worker_rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name(format!("recognize-{id}"))
            .spawn(move || {
                let message = match panic::catch_unwind(AssertUnwindSafe(|| {
                    recognizer.recognize(&request)
                })) {
                    Ok(Ok(response)) => WorkerToMain::Completed { id, response },
                    Ok(Err(err)) => WorkerToMain::Failed {
                        id,
                        error: format!("{err:#}"),
                    },
                    Err(payload) => WorkerToMain::Failed {
                        id,
                        error: panic_message(payload.as_ref()),
                    },
                };
                let _ = worker_tx.send(message);
            });

        let worker = match spawned.context("spawn recognition worker") {
            Ok(worker) => worker,
            Err(err) => {
                self.transition(SubmissionState::Idle);
                return Err(err);
            }
        };

        tracing::info!(id, ?anchor, variables = bindings.len(), "submission started");
        self.pending = Some(PendingSubmission {
            id,
            anchor,
            started: Instant::now(),
            worker_rx,
            worker: Some(worker),
        });
        Ok(SubmitOutcome::Started { id })
    }

    /// Non-blocking check for a finished submission.
    pub fn poll(&mut self) -> Option<SubmissionEvent> {
        let received = match self.pending.as_ref()?.worker_rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => None,
        };
        let pending = self.pending.take()?;
        Some(self.finish(pending, received))
    }

    /// Blocks up to `timeout` for the in-flight submission to finish.
    pub fn wait(&mut self, timeout: Duration) -> Option<SubmissionEvent> {
        let received = match self.pending.as_ref()?.worker_rx.recv_timeout(timeout) {
            Ok(message) => Some(message),
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => None,
        };
        let pending = self.pending.take()?;
        Some(self.finish(pending, received))
    }

    /// `received` is `None` when the worker hung up without a message.
    fn finish(
        &mut self,
        mut pending: PendingSubmission,
        received: Option<WorkerToMain>,
    ) -> SubmissionEvent {
        if let Some(worker) = pending.worker.take() {
            if worker.join().is_err() {
                tracing::error!(id = pending.id, "recognition worker panicked while joining");
            }
        }
        self.transition(SubmissionState::Idle);

        let elapsed_ms = pending.started.elapsed().as_millis() as u64;
        match received {
            Some(WorkerToMain::Completed { response, .. }) => {
                tracing::info!(
                    id = pending.id,
                    items = response.items.len(),
                    elapsed_ms,
                    "submission completed"
                );
                SubmissionEvent::Succeeded {
                    id: pending.id,
                    anchor: pending.anchor,
                    response,
                }
            }
            Some(WorkerToMain::Failed { error, .. }) => {
                tracing::error!(id = pending.id, error = %error, elapsed_ms, "submission failed");
                SubmissionEvent::Failed {
                    id: pending.id,
                    error,
                }
            }
            None => {
                tracing::error!(id = pending.id, "recognition worker exited without reporting");
                SubmissionEvent::Failed {
                    id: pending.id,
                    error: "recognition worker exited without reporting".to_string(),
                }
            }
        }
    }

    fn transition(&mut self, to: SubmissionState) {
        if !can_transition(self.state, to) {
            tracing::warn!(from = ?self.state, ?to, "unexpected submission state transition");
        }
        self.state = to;
    }
}

/// Merges assignments into `bindings` (last write wins) and appends one
/// annotation per item at the shared `anchor`. Returns the number of
/// annotations added.
pub fn apply_response(
    response: &RecognitionResponse,
    anchor: Point,
    bindings: &mut SymbolBindings,
    overlay: &mut OverlayModel,
) -> usize {
    for item in response.items.iter().filter(|item| item.is_assignment) {
        bindings.bind(item.expr.clone(), item.result.clone());
    }
    for item in &response.items {
        overlay.add_annotation(renderable_form(&item.expr, &item.result), anchor);
    }
    response.items.len()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
