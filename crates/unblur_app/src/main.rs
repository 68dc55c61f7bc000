mod app;
mod cli;
mod effects;
mod logging;
mod media;

use anyhow::{bail, Context, Result};
use clap::Parser;
use unblur_engine::ReqwestEnhancer;
use unblur_logging::unblur_info;

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.level());

    let settings = cli.settings().context("invalid service configuration")?;
    unblur_info!("Using enhancement service at {}", settings.base_url());

    if cli.check {
        let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
        let report = runtime
            .block_on(ReqwestEnhancer::new(settings).health())
            .map_err(|err| anyhow::anyhow!("health check failed: {err}"))?;
        println!(
            "status: {} (model loaded: {}, device: {})",
            report.status,
            report.model_loaded,
            report.device.as_deref().unwrap_or("unknown")
        );
        if !report.model_loaded {
            bail!("model is not loaded");
        }
        return Ok(());
    }

    if cli.inputs.is_empty() {
        bail!("no input images given");
    }

    let summary = app::run(&cli.inputs, &cli.output, settings)?;
    for path in &summary.saved {
        println!("saved {}", path.display());
    }
    println!(
        "{} enhanced, {} rejected, {} failed, {} not saved",
        summary.enhanced, summary.rejected, summary.failed, summary.unsaved
    );
    if summary.shortfall() > 0 {
        bail!(
            "{} of {} inputs were not enhanced and saved",
            summary.shortfall(),
            cli.inputs.len()
        );
    }
    Ok(())
}
