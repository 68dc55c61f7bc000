use std::fmt;

use bytes::Bytes;

pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Settled {
        generation: Generation,
        result: Result<EnhancedImage, RequestError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancedImage {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ModelUnavailable,
    PayloadTooLarge,
    UnsupportedFormat,
    ServerError { status: u16 },
    /// Request went out but no response came back.
    Unreachable,
    /// Request could not be built, so nothing was sent.
    ClientFault,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::ModelUnavailable => write!(f, "model unavailable"),
            FailureKind::PayloadTooLarge => write!(f, "payload too large"),
            FailureKind::UnsupportedFormat => write!(f, "unsupported format"),
            FailureKind::ServerError { status } => write!(f, "server error {status}"),
            FailureKind::Unreachable => write!(f, "unreachable"),
            FailureKind::ClientFault => write!(f, "client fault"),
        }
    }
}
