use bytes::Bytes;

use crate::{HandleRegistry, ObjectHandle, ValidationError};

/// Largest upload accepted locally; the service enforces the same limit.
pub const MAX_UPLOAD_BYTES: u64 = 15 * 1024 * 1024;

/// Media types offered by the picker filter. Validation itself only
/// requires an `image/` prefix.
pub const ACCEPTED_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileOrigin {
    DragDrop,
    #[default]
    Picker,
}

/// A file the user just handed over, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    /// Declared by the source; never sniffed from content.
    pub media_type: String,
    pub bytes: Bytes,
    pub origin: FileOrigin,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
            origin: FileOrigin::default(),
        }
    }

    pub fn with_origin(mut self, origin: FileOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// A validated file held locally, with its preview handle.
#[derive(Debug, PartialEq, Eq)]
pub struct StagedImage {
    name: String,
    media_type: String,
    origin: FileOrigin,
    preview: ObjectHandle,
}

impl StagedImage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn origin(&self) -> FileOrigin {
        self.origin
    }

    pub fn preview(&self) -> &ObjectHandle {
        &self.preview
    }

    pub fn bytes(&self) -> &Bytes {
        self.preview.bytes()
    }

    pub fn byte_len(&self) -> u64 {
        self.preview.byte_len()
    }
}

/// Accepts or rejects a candidate file. The first failing rule wins:
/// the declared type must start with `image/`, then the size must not exceed
/// [`MAX_UPLOAD_BYTES`]. On success a preview handle is allocated from `registry`.
pub fn validate(
    file: CandidateFile,
    registry: &HandleRegistry,
) -> Result<StagedImage, ValidationError> {
    if !is_image_type(&file.media_type) {
        return Err(ValidationError::NotAnImage {
            media_type: file.media_type,
        });
    }

    let byte_len = file.byte_len();
    if byte_len > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            byte_len,
            max_bytes: MAX_UPLOAD_BYTES,
        });
    }

    let preview = registry.allocate(file.bytes);
    Ok(StagedImage {
        name: file.name,
        media_type: file.media_type,
        origin: file.origin,
        preview,
    })
}

/// Browsers report media types in lowercase; the prefix match is exact.
fn is_image_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}
