use crate::config::FailurePolicy;
use crate::error::{Result, SatError};
use crate::provider::Provider;
use crate::radar::RadarDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

pub const OUTPUT_SUBDIR: &str = "weather";

/// `<directory of the executable>/weather`
pub fn default_output_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| SatError::filesystem(OUTPUT_SUBDIR, e))?;
    let program_dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(program_dir.join(OUTPUT_SUBDIR))
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    #[serde(flatten)]
    radar: RadarDescriptor,
    image_size: String,
    output: PathBuf,
}

impl DownloadTask {
    pub fn new(radar: &RadarDescriptor, output_dir: &Path, image_size: &str) -> Self {
        DownloadTask {
            radar: radar.clone(),
            image_size: image_size.to_string(),
            output: output_dir.join(radar.file_name()),
        }
    }

    pub fn ft(&self) -> &str {
        &self.radar.ft
    }

    /// Fails for a malformed descriptor; checked when the task runs so the
    /// failure policy applies to it like to any other download error.
    pub fn url(&self) -> Result<Url> {
        self.radar.validate()?;
        self.radar.image_url(&self.image_size)
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct DownloadPlan {
    tasks: Vec<DownloadTask>,
}

/// Outcome of [`DownloadPlan::execute`].
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(String, SatError)>,
}

impl DownloadReport {
    pub fn attempted(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    pub fn ensure_complete(self) -> Result<Self> {
        match self.failed.first() {
            None => Ok(self),
            Some((_, first)) => Err(SatError::BatchIncomplete {
                failed: self.failed.len(),
                total: self.attempted(),
                first_kind: first.kind(),
            }),
        }
    }
}

impl DownloadPlan {
    pub fn new(tasks: Vec<DownloadTask>) -> Self {
        Self { tasks }
    }

    /// One task per descriptor, in list order. Descriptors with an empty or
    /// missing `ft` are skipped, so a list of N descriptors yields N tasks
    /// only when every `ft` is present. Malformed descriptors still get a
    /// task and fail when it runs.
    pub fn from_radars(radars: &[RadarDescriptor], output_dir: &Path, image_size: &str) -> Self {
        let mut tasks: Vec<DownloadTask> = vec![];
        for radar in radars {
            if radar.ft.is_empty() {
                warn!(name: "plan.descriptor.skipped", code = %radar.code, "descriptor without ft");
                continue;
            }
            tasks.push(DownloadTask::new(radar, output_dir, image_size));
        }
        Self::new(tasks)
    }

    pub fn tasks(&self) -> &[DownloadTask] {
        &self.tasks
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SatError::filesystem(path, e))?;
        let plan: Self = serde_json::from_str(&content)?;
        Ok(plan)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SatError::filesystem(parent, e))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| SatError::filesystem(path, e))?;
        Ok(())
    }

    /// Downloads the tasks one after the other. With [`FailurePolicy::FailFast`]
    /// the first error is returned and the remaining tasks are not attempted;
    /// files written up to that point stay on disk.
    pub async fn execute(
        &self,
        provider: &impl Provider,
        policy: FailurePolicy,
    ) -> Result<DownloadReport> {
        let mut report = DownloadReport::default();
        for task in self.tasks.iter() {
            match try_download(provider, task).await {
                Ok(path) => report.written.push(path),
                Err(e) if policy == FailurePolicy::Continue => {
                    warn!(name: "download.failed", ft = %task.ft(), error = %e, "download failed, continuing");
                    report.failed.push((task.ft().to_string(), e));
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            name: "download.completed",
            written = report.written.len(),
            failed = report.failed.len(),
            "download plan executed"
        );
        Ok(report)
    }
}

pub async fn try_download(provider: &impl Provider, task: &DownloadTask) -> Result<PathBuf> {
    println!("{}", task.ft());
    let url = task.url()?;

    // Make parent directories as necessary, never touching existing contents
    let dst = task.output.as_path();
    if let Some(parent_dir) = dst.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir).map_err(|e| SatError::filesystem(parent_dir, e))?;
            info!(name: "download.dir.created", path = %parent_dir.display(), "created output directory");
        }
    }

    let bytes = provider.get_bytes(&url).await?;

    // <ft>.jpg.partial, renamed over <ft>.jpg once complete
    let mut partial = dst.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);
    if let Err(e) = fs::write(&partial, &bytes).and_then(|_| fs::rename(&partial, dst)) {
        let _ = fs::remove_file(&partial);
        return Err(SatError::filesystem(dst, e));
    }

    debug!(name: "download.written", path = %dst.display(), bytes = bytes.len(), "image written");
    Ok(dst.to_path_buf())
}
