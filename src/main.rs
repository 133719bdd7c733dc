use anyhow::{Context, Result};
use clap::Parser;
use satfetch::config::{FailurePolicy, Settings, SETTINGS_FILE};
use satfetch::download_plan::default_output_dir;
use satfetch::provider::WeatherCn;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Downloads the latest satellite images published by weather.com.cn
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Settings file (defaults to satfetch.toml next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not verify the provider's TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Keep downloading after a failed image instead of stopping
    #[arg(long)]
    keep_going: bool,

    /// Only write the download plan, do not fetch any images
    #[arg(long)]
    dry_run: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let output_dir = default_output_dir()?;
    let settings_path = match args.config {
        Some(path) => path,
        None => output_dir
            .parent()
            .map(|dir| dir.join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE)),
    };

    let mut settings = Settings::read_or_default(&settings_path)?;
    if args.insecure {
        settings.insecure = true;
    }
    if args.keep_going {
        settings.failure_policy = FailurePolicy::Continue;
    }
    info!(name: "config.loaded", settings = ?settings, "settings loaded");

    let provider = WeatherCn::from_settings(&settings)?;

    if args.dry_run {
        let plan = satfetch::plan(&provider, &settings, &output_dir).await?;
        let plan_path = output_dir.join("download_plan.json");
        plan.write(&plan_path)?;
        info!(name: "plan.written", path = %plan_path.display(), tasks = plan.tasks().len(), "download plan written");
        return Ok(());
    }

    let report = satfetch::run(&provider, &settings, &output_dir)
        .await
        .context("satellite image download failed")?;
    info!(name: "run.completed", images = report.written.len(), dir = %output_dir.display(), "done");

    Ok(())
}
