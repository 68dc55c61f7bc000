use bytes::Bytes;

use crate::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitEnhancement(EnhancementJob),
    SaveResult { source_name: String, bytes: Bytes },
}

/// Everything the engine needs to issue one enhancement request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementJob {
    pub generation: Generation,
    pub file_name: String,
    pub media_type: String,
    pub bytes: Bytes,
}
