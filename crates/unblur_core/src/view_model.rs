use crate::{ErrorKind, HandleId, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub stage: Stage,
    pub staged: Option<StagedView>,
    pub outcome: Option<OutcomeView>,
    /// Transient message from the last rejected file.
    pub notice: Option<String>,
    pub can_enhance: bool,
    pub can_download: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedView {
    pub name: String,
    pub media_type: String,
    pub byte_len: u64,
    pub preview: HandleId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeView {
    Success { byte_len: u64, result: HandleId },
    Failure { kind: ErrorKind, message: String },
}
