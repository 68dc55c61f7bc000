//! Unblur engine: the enhancement request and its background executor.
mod engine;
mod enhance;
mod filename;
mod persist;
mod settings;
mod types;

pub use engine::{EngineError, EngineHandle};
pub use enhance::{EnhanceRequest, Enhancer, HealthReport, ReqwestEnhancer};
pub use filename::result_filename;
pub use persist::{ResultWriter, SaveError};
pub use settings::{EnhanceSettings, OutputFormat, SettingsError, API_URL_ENV, DEFAULT_API_URL};
pub use types::{EngineEvent, EnhancedImage, FailureKind, Generation, RequestError};
