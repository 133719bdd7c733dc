#![allow(async_fn_in_trait)]
pub mod config;
pub mod download_plan;
pub mod error;
pub mod jsonp;
pub mod provider;
pub mod radar;
pub mod satellite;

use config::Settings;
use download_plan::{DownloadPlan, DownloadReport};
use error::Result;
use provider::Provider;
use std::path::Path;

/// Fetches the radar list and builds the download plan for it.
pub async fn plan(
    provider: &impl Provider,
    settings: &Settings,
    output_dir: &Path,
) -> Result<DownloadPlan> {
    let list = satellite::fetch_radar_list(provider).await?;
    Ok(DownloadPlan::from_radars(
        &list.radars,
        output_dir,
        &settings.image_size,
    ))
}

/// One complete run: metadata request, then every image in list order.
pub async fn run(
    provider: &impl Provider,
    settings: &Settings,
    output_dir: &Path,
) -> Result<DownloadReport> {
    let plan = plan(provider, settings, output_dir).await?;
    plan.execute(provider, settings.failure_policy)
        .await?
        .ensure_complete()
}
