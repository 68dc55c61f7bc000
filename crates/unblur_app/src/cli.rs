use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use unblur_engine::{EnhanceSettings, OutputFormat, SettingsError, API_URL_ENV, DEFAULT_API_URL};

use crate::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "unblur", about = "Restore blurry images with a remote enhancement service")]
pub struct Cli {
    /// Images to enhance, processed one after another.
    pub inputs: Vec<PathBuf>,

    /// Base URL of the enhancement service.
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory restored images are written to.
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Ask for JPEG output at this quality (1-100) instead of PNG.
    #[arg(long, value_name = "QUALITY")]
    pub jpeg: Option<u8>,

    /// Estimated quality of the input (5-30), used by the model for conditioning.
    #[arg(long, value_name = "QUALITY")]
    pub quality_hint: Option<u8>,

    /// Give up connecting after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Give up on a request after this many seconds. No limit by default.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Query the service health endpoint and exit.
    #[arg(long)]
    pub check: bool,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn settings(&self) -> Result<EnhanceSettings, SettingsError> {
        let mut settings = EnhanceSettings::new(&self.api_url)?;
        if let Some(quality) = self.jpeg {
            settings = settings.with_output(OutputFormat::jpeg(quality));
        }
        if let Some(hint) = self.quality_hint {
            settings = settings.with_quality_hint(hint);
        }
        settings.connect_timeout = self.connect_timeout.map(Duration::from_secs);
        settings.request_timeout = self.timeout.map(Duration::from_secs);
        Ok(settings)
    }
}
