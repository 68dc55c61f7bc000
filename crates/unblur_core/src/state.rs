use bytes::Bytes;
use unblur_logging::{unblur_debug, unblur_info};

use crate::view_model::{AppViewModel, OutcomeView, StagedView};
use crate::{EnhancementJob, Failure, HandleRegistry, ObjectHandle, StagedImage};

/// Monotonic counter distinguishing the current attempt from superseded ones.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Staged,
    Processing,
    Completed,
    Failed,
}

/// Result of one settled enhancement attempt, as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhancementOutcome {
    Success(Bytes),
    Failure(Failure),
}

/// Enhanced image bytes held behind a result handle.
#[derive(Debug, PartialEq, Eq)]
pub struct ResultImage {
    handle: ObjectHandle,
}

impl ResultImage {
    pub fn handle(&self) -> &ObjectHandle {
        &self.handle
    }

    pub fn bytes(&self) -> &Bytes {
        self.handle.bytes()
    }
}

// One variant per stage keeps a staged image present exactly when it must be,
// and an outcome present only once the attempt settled.
#[derive(Debug, Default)]
enum Session {
    #[default]
    Idle,
    Staged {
        image: StagedImage,
    },
    Processing {
        image: StagedImage,
        generation: Generation,
    },
    Completed {
        image: StagedImage,
        result: ResultImage,
    },
    Failed {
        image: StagedImage,
        failure: Failure,
    },
}

#[derive(Debug, Default)]
pub struct AppState {
    session: Session,
    registry: HandleRegistry,
    generation: Generation,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry the upload surface must allocate previews from.
    pub fn registry(&self) -> HandleRegistry {
        self.registry.clone()
    }

    pub fn stage(&self) -> Stage {
        match self.session {
            Session::Idle => Stage::Idle,
            Session::Staged { .. } => Stage::Staged,
            Session::Processing { .. } => Stage::Processing,
            Session::Completed { .. } => Stage::Completed,
            Session::Failed { .. } => Stage::Failed,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn staged(&self) -> Option<&StagedImage> {
        match &self.session {
            Session::Idle => None,
            Session::Staged { image }
            | Session::Processing { image, .. }
            | Session::Completed { image, .. }
            | Session::Failed { image, .. } => Some(image),
        }
    }

    pub fn result(&self) -> Option<&ResultImage> {
        match &self.session {
            Session::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match &self.session {
            Session::Failed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// Generation of the request currently in flight, if any.
    pub fn in_flight(&self) -> Option<Generation> {
        match self.session {
            Session::Processing { generation, .. } => Some(generation),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn view(&self) -> AppViewModel {
        let staged = self.staged().map(|image| StagedView {
            name: image.name().to_string(),
            media_type: image.media_type().to_string(),
            byte_len: image.byte_len(),
            preview: image.preview().id(),
        });
        let outcome = match &self.session {
            Session::Completed { result, .. } => Some(OutcomeView::Success {
                byte_len: result.handle.byte_len(),
                result: result.handle.id(),
            }),
            Session::Failed { failure, .. } => Some(OutcomeView::Failure {
                kind: failure.kind,
                message: failure.user_message(),
            }),
            _ => None,
        };
        let stage = self.stage();
        AppViewModel {
            stage,
            staged,
            outcome,
            notice: self.notice.clone(),
            can_enhance: stage == Stage::Staged,
            can_download: stage == Stage::Completed,
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Replaces whatever the session held with a freshly staged image.
    pub(crate) fn stage_image(&mut self, image: StagedImage) {
        // Release the previous preview and result before the new image lands.
        self.session = Session::Idle;
        self.generation += 1;
        unblur_info!(
            "Staged {} ({}, {} bytes, {:?})",
            image.name(),
            image.media_type(),
            image.byte_len(),
            image.origin()
        );
        self.session = Session::Staged { image };
        self.notice = None;
        self.mark_dirty();
    }

    /// Moves `Staged` to `Processing` and returns the job to submit.
    /// Returns `None` from any other stage.
    pub(crate) fn begin_processing(&mut self) -> Option<EnhancementJob> {
        let image = match std::mem::take(&mut self.session) {
            Session::Staged { image } => image,
            other => {
                self.session = other;
                return None;
            }
        };
        self.generation += 1;
        let generation = self.generation;
        let job = EnhancementJob {
            generation,
            file_name: image.name().to_string(),
            media_type: image.media_type().to_string(),
            bytes: image.bytes().clone(),
        };
        self.session = Session::Processing { image, generation };
        self.notice = None;
        self.mark_dirty();
        Some(job)
    }

    /// Applies a settlement if it belongs to the attempt in flight.
    /// Returns `false` for stale settlements, which leave the state untouched.
    pub(crate) fn settle(&mut self, generation: Generation, outcome: EnhancementOutcome) -> bool {
        if self.in_flight() != Some(generation) {
            unblur_debug!(
                "Discarding settlement for generation {} (in flight: {:?})",
                generation,
                self.in_flight()
            );
            return false;
        }
        let image = match std::mem::take(&mut self.session) {
            Session::Processing { image, .. } => image,
            other => {
                self.session = other;
                return false;
            }
        };
        self.session = match outcome {
            EnhancementOutcome::Success(bytes) => {
                unblur_info!("Enhancement of {} completed ({} bytes)", image.name(), bytes.len());
                let handle = self.registry.allocate(bytes);
                Session::Completed {
                    image,
                    result: ResultImage { handle },
                }
            }
            EnhancementOutcome::Failure(failure) => {
                unblur_info!(
                    "Enhancement of {} failed: {} ({})",
                    image.name(),
                    failure.kind,
                    failure.message
                );
                Session::Failed { image, failure }
            }
        };
        self.mark_dirty();
        true
    }

    pub(crate) fn reset(&mut self) {
        let was_idle = matches!(self.session, Session::Idle);
        self.session = Session::Idle;
        if !was_idle {
            self.generation += 1;
        }
        if !was_idle || self.notice.is_some() {
            self.notice = None;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_notice(&mut self, notice: String) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.mark_dirty();
        }
    }
}
