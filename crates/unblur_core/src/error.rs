use std::fmt;

use thiserror::Error;

/// Classified reason a file was rejected or an enhancement attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotAnImage,
    TooLarge,
    ModelUnavailable,
    PayloadTooLarge,
    UnsupportedFormat,
    ServerError,
    Unreachable,
    ClientFault,
}

impl ErrorKind {
    /// True for kinds raised by local validation, before any request exists.
    pub fn is_validation(self) -> bool {
        matches!(self, ErrorKind::NotAnImage | ErrorKind::TooLarge)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotAnImage => write!(f, "not an image"),
            ErrorKind::TooLarge => write!(f, "too large"),
            ErrorKind::ModelUnavailable => write!(f, "model unavailable"),
            ErrorKind::PayloadTooLarge => write!(f, "payload too large"),
            ErrorKind::UnsupportedFormat => write!(f, "unsupported format"),
            ErrorKind::ServerError => write!(f, "server error"),
            ErrorKind::Unreachable => write!(f, "unreachable"),
            ErrorKind::ClientFault => write!(f, "client fault"),
        }
    }
}

/// A failed enhancement attempt: the kind plus the detail reported for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::ModelUnavailable => {
                "The AI model is not loaded. Please check the server logs.".to_string()
            }
            ErrorKind::PayloadTooLarge => {
                "Image file is too large. Maximum size is 15 MB.".to_string()
            }
            ErrorKind::UnsupportedFormat => {
                "Unsupported file format. Please use JPEG or PNG.".to_string()
            }
            ErrorKind::ServerError => format!("Server error: {}", self.message),
            ErrorKind::Unreachable => {
                "Cannot connect to the server. Please check if the backend is running."
                    .to_string()
            }
            ErrorKind::ClientFault => "An unexpected error occurred.".to_string(),
            ErrorKind::NotAnImage | ErrorKind::TooLarge => self.message.clone(),
        }
    }
}

/// Local rejection of a candidate file. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("declared media type {media_type:?} is not an image")]
    NotAnImage { media_type: String },
    #[error("file is {byte_len} bytes, limit is {max_bytes}")]
    TooLarge { byte_len: u64, max_bytes: u64 },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::NotAnImage { .. } => ErrorKind::NotAnImage,
            ValidationError::TooLarge { .. } => ErrorKind::TooLarge,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ValidationError::NotAnImage { .. } => "Please upload an image file.".to_string(),
            ValidationError::TooLarge { .. } => {
                "File is too large. Maximum size is 15 MB.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, Failure, ValidationError};

    #[test]
    fn server_error_message_carries_status_text() {
        let failure = Failure::new(ErrorKind::ServerError, "Internal Server Error");
        assert_eq!(failure.user_message(), "Server error: Internal Server Error");
    }

    #[test]
    fn request_kinds_use_fixed_messages() {
        let failure = Failure::new(ErrorKind::ModelUnavailable, "model not loaded");
        assert!(failure.user_message().contains("not loaded"));
        let failure = Failure::new(ErrorKind::Unreachable, "cannot connect");
        assert!(failure.user_message().starts_with("Cannot connect"));
    }

    #[test]
    fn validation_kinds_are_flagged() {
        let err = ValidationError::TooLarge {
            byte_len: 20,
            max_bytes: 10,
        };
        assert_eq!(err.kind(), ErrorKind::TooLarge);
        assert!(err.kind().is_validation());
        assert!(!ErrorKind::ServerError.is_validation());
    }
}
