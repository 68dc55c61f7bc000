use crate::{EnhancementOutcome, Generation, StagedImage, ValidationError};

#[derive(Debug)]
pub enum Msg {
    /// Upload surface accepted a file.
    FileAccepted(StagedImage),
    /// Upload surface rejected a file during validation.
    FileRejected(ValidationError),
    /// User clicked Enhance.
    EnhanceRequested,
    /// An enhancement request settled. Ignored unless `generation` is the one in flight.
    EnhancementSettled {
        generation: Generation,
        outcome: EnhancementOutcome,
    },
    /// User clicked Upload New Image.
    ResetClicked,
    /// User clicked Download on a completed result.
    DownloadRequested,
    /// User dismissed the transient notice.
    NoticeDismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
