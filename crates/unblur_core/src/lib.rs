//! Unblur core: file validation, upload capture and the pure session state machine.
mod effect;
mod error;
mod handle;
mod msg;
mod state;
mod update;
mod upload;
mod validate;
mod view_model;

pub use effect::{Effect, EnhancementJob};
pub use error::{ErrorKind, Failure, ValidationError};
pub use handle::{HandleId, HandleRegistry, ObjectHandle};
pub use msg::Msg;
pub use state::{AppState, EnhancementOutcome, Generation, ResultImage, Stage};
pub use update::update;
pub use upload::UploadSurface;
pub use validate::{
    validate, CandidateFile, FileOrigin, StagedImage, ACCEPTED_MEDIA_TYPES, MAX_UPLOAD_BYTES,
};
pub use view_model::{AppViewModel, OutcomeView, StagedView};
