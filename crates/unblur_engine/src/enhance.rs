use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use unblur_logging::{unblur_debug, unblur_warn};

use crate::{EnhanceSettings, EnhancedImage, FailureKind, RequestError};

/// Multipart field the service reads the upload from.
const UPLOAD_FIELD: &str = "file";

/// The staged file as it goes over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhanceRequest {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

/// Service liveness as reported by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub model_loaded: bool,
    #[serde(default)]
    pub device: Option<String>,
}

#[async_trait::async_trait]
pub trait Enhancer: Send + Sync {
    /// Issues exactly one request. Never retries.
    async fn enhance(&self, request: EnhanceRequest) -> Result<EnhancedImage, RequestError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestEnhancer {
    settings: EnhanceSettings,
}

impl ReqwestEnhancer {
    pub fn new(settings: EnhanceSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EnhanceSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, RequestError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| RequestError::new(FailureKind::ClientFault, err.to_string()))
    }

    pub async fn health(&self) -> Result<HealthReport, RequestError> {
        let url = self
            .settings
            .health_url()
            .map_err(|err| RequestError::new(FailureKind::ClientFault, err.to_string()))?;
        let client = self.build_client()?;
        let response = client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body).map_err(|err| {
            RequestError::new(
                FailureKind::ServerError {
                    status: status.as_u16(),
                },
                format!("invalid health payload: {err}"),
            )
        })
    }
}

#[async_trait::async_trait]
impl Enhancer for ReqwestEnhancer {
    async fn enhance(&self, request: EnhanceRequest) -> Result<EnhancedImage, RequestError> {
        let url = self
            .settings
            .endpoint_url()
            .map_err(|err| RequestError::new(FailureKind::ClientFault, err.to_string()))?;
        let client = self.build_client()?;

        let byte_len = request.bytes.len();
        let part = Part::bytes(request.bytes.to_vec())
            .file_name(request.file_name)
            .mime_str(&request.media_type)
            .map_err(|err| RequestError::new(FailureKind::ClientFault, err.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        unblur_debug!("POST {} ({} bytes)", url, byte_len);
        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let err = classify_status(status);
            unblur_warn!("Enhancement rejected: {}", err);
            return Err(err);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(EnhancedImage {
            bytes,
            content_type,
        })
    }
}

pub(crate) fn classify_status(status: StatusCode) -> RequestError {
    match status {
        StatusCode::SERVICE_UNAVAILABLE => {
            RequestError::new(FailureKind::ModelUnavailable, "model not loaded")
        }
        StatusCode::PAYLOAD_TOO_LARGE => {
            RequestError::new(FailureKind::PayloadTooLarge, "exceeds 15 MB")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => {
            RequestError::new(FailureKind::UnsupportedFormat, "use JPEG or PNG")
        }
        other => RequestError::new(
            FailureKind::ServerError {
                status: other.as_u16(),
            },
            other.canonical_reason().unwrap_or("Unknown Status"),
        ),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_builder() {
        return RequestError::new(FailureKind::ClientFault, err.to_string());
    }
    RequestError::new(FailureKind::Unreachable, format!("cannot connect: {err}"))
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::classify_status;
    use crate::FailureKind;

    #[test]
    fn known_statuses_get_dedicated_kinds() {
        assert_eq!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE).kind,
            FailureKind::ModelUnavailable
        );
        assert_eq!(
            classify_status(StatusCode::PAYLOAD_TOO_LARGE).kind,
            FailureKind::PayloadTooLarge
        );
        assert_eq!(
            classify_status(StatusCode::UNSUPPORTED_MEDIA_TYPE).kind,
            FailureKind::UnsupportedFormat
        );
    }

    #[test]
    fn other_statuses_carry_status_text() {
        let err = classify_status(StatusCode::INSUFFICIENT_STORAGE);
        assert_eq!(err.kind, FailureKind::ServerError { status: 507 });
        assert_eq!(err.message, "Insufficient Storage");

        let err = classify_status(StatusCode::BAD_REQUEST);
        assert_eq!(err.kind, FailureKind::ServerError { status: 400 });
        assert_eq!(err.message, "Bad Request");
    }
}
