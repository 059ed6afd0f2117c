//! Loading the source tables from CSV exports.

mod parser;

use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::sources::{AttainmentRow, AttendanceRow, CensusRow, OfstedInspectionRow, RegistryRow};

pub const REGISTRY_FILE: &str = "schools.csv";
pub const OFSTED_FILE: &str = "ofsted.csv";
pub const CENSUS_FILE: &str = "census.csv";
pub const ATTENDANCE_FILE: &str = "attendance.csv";
pub const ATTAINMENT_FILE: &str = "attainment.csv";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV data in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Raw rows of every source table, in file order.
#[derive(Debug, Clone, Default)]
pub struct DatasetBundle {
    pub registry: Vec<RegistryRow>,
    pub ofsted: Vec<OfstedInspectionRow>,
    pub census: Vec<CensusRow>,
    pub attendance: Vec<AttendanceRow>,
    pub attainment: Vec<AttainmentRow>,
}

impl DatasetBundle {
    /// Loads the exports from `dir`. The registry file is required; a missing
    /// metric file leaves that metric absent for every school.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        let registry = load_required(&dir.join(REGISTRY_FILE))?;
        let bundle = Self {
            registry,
            ofsted: load_optional(&dir.join(OFSTED_FILE))?,
            census: load_optional(&dir.join(CENSUS_FILE))?,
            attendance: load_optional(&dir.join(ATTENDANCE_FILE))?,
            attainment: load_optional(&dir.join(ATTAINMENT_FILE))?,
        };

        info!(
            dir = %dir.display(),
            schools = bundle.registry.len(),
            inspections = bundle.ofsted.len(),
            census = bundle.census.len(),
            attendance = bundle.attendance.len(),
            attainment = bundle.attainment.len(),
            "school datasets loaded"
        );

        Ok(bundle)
    }

    /// Parses one export held in memory.
    pub fn rows_from_reader<T, R>(reader: R) -> Result<Vec<T>, csv::Error>
    where
        T: DeserializeOwned,
        R: Read,
    {
        parser::parse_rows(reader)
    }
}

fn load_required<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parser::parse_rows(file).map_err(|source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn load_optional<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    if !path.exists() {
        info!(path = %path.display(), "dataset file missing, metric will be absent");
        return Ok(Vec::new());
    }
    load_required(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_registry_is_an_io_error() {
        let error = DatasetBundle::from_dir("./does-not-exist").expect_err("expected io error");
        match error {
            DatasetError::Io { path, .. } => assert!(path.ends_with(REGISTRY_FILE)),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn optional_files_may_be_absent() {
        let dir = std::env::temp_dir().join(format!("school-ratings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        std::fs::write(
            dir.join(REGISTRY_FILE),
            "urn,name,country\n100001,Hill Top Primary,England\n",
        )
        .expect("write registry");

        let bundle = DatasetBundle::from_dir(&dir).expect("bundle loads");
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(bundle.registry.len(), 1);
        assert!(bundle.ofsted.is_empty());
        assert!(bundle.attainment.is_empty());
    }
}
