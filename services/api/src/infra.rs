use metrics_exporter_prometheus::PrometheusHandle;
use school_ratings::config::AppConfig;
use school_ratings::datasets::DatasetBundle;
use school_ratings::error::AppError;
use school_ratings::{InMemoryDirectory, SchoolService};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type DirectoryService = SchoolService<InMemoryDirectory>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the CSV exports and indexes them into the in-memory directory.
/// `data_dir` overrides the configured dataset directory.
pub(crate) fn load_service(
    config: &AppConfig,
    data_dir: Option<PathBuf>,
) -> Result<Arc<DirectoryService>, AppError> {
    let dir = data_dir.unwrap_or_else(|| config.data.dataset_dir.clone());
    let directory = InMemoryDirectory::new(DatasetBundle::from_dir(&dir)?);
    info!(dir = %dir.display(), schools = directory.len(), "school directory indexed");

    Ok(Arc::new(SchoolService::from_config(
        Arc::new(directory),
        &config.refresh,
    )))
}
