use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Used when neither the command line nor the environment names a service.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable consulted for the service base URL.
pub const API_URL_ENV: &str = "UNBLUR_API_URL";

const QUALITY_HINT_RANGE: (u8, u8) = (5, 30);
const JPEG_QUALITY_RANGE: (u8, u8) = (1, 100);

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid service url {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported url scheme {0:?}; expected http or https")]
    UnsupportedScheme(String),
}

/// Encoding the service returns the restored image in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// JPEG output with the quality clamped to 1..=100.
    pub fn jpeg(quality: u8) -> Self {
        OutputFormat::Jpeg {
            quality: quality.clamp(JPEG_QUALITY_RANGE.0, JPEG_QUALITY_RANGE.1),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg { .. } => "jpg",
        }
    }

    fn endpoint(self) -> &'static str {
        match self {
            OutputFormat::Png => "restore",
            OutputFormat::Jpeg { .. } => "restore-jpeg",
        }
    }
}

/// Service configuration, resolved once at startup and handed to the enhancer.
#[derive(Debug, Clone)]
pub struct EnhanceSettings {
    base_url: Url,
    pub output: OutputFormat,
    /// Estimated input quality used for conditioning, 5..=30.
    pub quality_hint: Option<u8>,
    pub connect_timeout: Option<Duration>,
    /// `None` lets a request stay pending until the transport gives up.
    pub request_timeout: Option<Duration>,
}

impl EnhanceSettings {
    pub fn new(base_url: &str) -> Result<Self, SettingsError> {
        let mut url = Url::parse(base_url.trim()).map_err(|source| SettingsError::InvalidUrl {
            value: base_url.to_string(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SettingsError::UnsupportedScheme(url.scheme().to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            output: OutputFormat::default(),
            quality_hint: None,
            connect_timeout: None,
            request_timeout: None,
        })
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn with_quality_hint(mut self, quality: u8) -> Self {
        self.quality_hint = Some(quality.clamp(QUALITY_HINT_RANGE.0, QUALITY_HINT_RANGE.1));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Upload endpoint including the query parameters for the output format.
    pub fn endpoint_url(&self) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join(self.output.endpoint())?;
        {
            let mut query = url.query_pairs_mut();
            match self.output {
                OutputFormat::Png => {
                    if let Some(hint) = self.quality_hint {
                        query.append_pair("quality", &hint.to_string());
                    }
                }
                OutputFormat::Jpeg { quality } => {
                    query.append_pair("quality_output", &quality.to_string());
                    if let Some(hint) = self.quality_hint {
                        query.append_pair("quality_input", &hint.to_string());
                    }
                }
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    pub fn health_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join("health")
    }
}

#[cfg(test)]
mod tests {
    use super::{EnhanceSettings, OutputFormat, SettingsError};

    #[test]
    fn png_endpoint_without_hint_has_no_query() {
        let settings = EnhanceSettings::new("http://localhost:8000").unwrap();
        assert_eq!(
            settings.endpoint_url().unwrap().as_str(),
            "http://localhost:8000/restore"
        );
        assert_eq!(
            settings.health_url().unwrap().as_str(),
            "http://localhost:8000/health"
        );
    }

    #[test]
    fn base_path_is_kept() {
        let settings = EnhanceSettings::new("https://example.com/api").unwrap();
        assert_eq!(
            settings.endpoint_url().unwrap().as_str(),
            "https://example.com/api/restore"
        );
    }

    #[test]
    fn quality_hint_is_clamped_and_sent() {
        let settings = EnhanceSettings::new("http://h").unwrap().with_quality_hint(99);
        assert_eq!(settings.quality_hint, Some(30));
        assert_eq!(
            settings.endpoint_url().unwrap().as_str(),
            "http://h/restore?quality=30"
        );
    }

    #[test]
    fn jpeg_output_uses_its_own_endpoint() {
        let settings = EnhanceSettings::new("http://h")
            .unwrap()
            .with_output(OutputFormat::jpeg(0))
            .with_quality_hint(1);
        assert_eq!(settings.output, OutputFormat::Jpeg { quality: 1 });
        assert_eq!(
            settings.endpoint_url().unwrap().as_str(),
            "http://h/restore-jpeg?quality_output=1&quality_input=5"
        );
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(matches!(
            EnhanceSettings::new("not a url"),
            Err(SettingsError::InvalidUrl { .. })
        ));
        assert!(matches!(
            EnhanceSettings::new("ftp://files.example.com"),
            Err(SettingsError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
    }
}
