//! Request-facing operations over a school directory, shared by the HTTP
//! routes and the command line.

mod router;

pub use router::rating_router;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::config::RefreshConfig;
use crate::directory::{SchoolDirectory, SchoolRecord};
use crate::geography::{aggregate_geography, GeoSummary};
use crate::ranking::{rank_schools, RankCandidate, RankedSchool};
use crate::ratings::{rate_school, Rating, SchoolMetrics, Urn};
use crate::refresh::{RatingStore, RefreshDriver, RefreshError, RefreshReport};
use crate::sources::{LookupError, SchoolSource};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("school {0} not found")]
    SchoolNotFound(Urn),
    #[error("no schools found in area '{0}'")]
    AreaNotFound(String),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

/// Fair ranking of one area, possibly cut to the first `limit` entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaRanking {
    pub area: String,
    pub total_schools: usize,
    pub schools: Vec<RankedSchool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaSummary {
    pub area: String,
    #[serde(flatten)]
    pub summary: GeoSummary,
}

pub struct SchoolService<D> {
    directory: Arc<D>,
    driver: Arc<RefreshDriver<D, D>>,
}

impl<D> SchoolService<D>
where
    D: SchoolDirectory + SchoolSource + RatingStore + 'static,
{
    pub fn new(directory: Arc<D>, staleness: Duration) -> Self {
        let driver = RefreshDriver::new(Arc::clone(&directory), Arc::clone(&directory), staleness);
        Self {
            directory,
            driver: Arc::new(driver),
        }
    }

    pub fn from_config(directory: Arc<D>, config: &RefreshConfig) -> Self {
        Self::new(directory, config.staleness_window())
    }

    pub fn directory(&self) -> &Arc<D> {
        &self.directory
    }

    /// The refresh driver, for scheduling the background loop.
    pub fn driver(&self) -> Arc<RefreshDriver<D, D>> {
        Arc::clone(&self.driver)
    }

    pub fn school(&self, urn: &Urn) -> Result<SchoolRecord, ServiceError> {
        self.directory
            .school(urn)?
            .ok_or_else(|| ServiceError::SchoolNotFound(urn.clone()))
    }

    /// Rates caller-supplied metrics without touching stored ratings.
    pub fn compute(&self, metrics: &SchoolMetrics) -> Rating {
        rate_school(metrics)
    }

    pub fn rank(&self, candidates: Vec<RankCandidate>, limit: Option<usize>) -> Vec<RankedSchool> {
        let mut ranked = rank_schools(candidates);
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        ranked
    }

    pub fn area_rankings(
        &self,
        area: &str,
        limit: Option<usize>,
    ) -> Result<AreaRanking, ServiceError> {
        let schools = self.schools_in(area)?;
        let total_schools = schools.len();
        let candidates = schools.iter().map(SchoolRecord::rank_candidate).collect();

        Ok(AreaRanking {
            area: area.trim().to_string(),
            total_schools,
            schools: self.rank(candidates, limit),
        })
    }

    pub fn area_summary(&self, area: &str) -> Result<AreaSummary, ServiceError> {
        let schools = self.schools_in(area)?;
        Ok(AreaSummary {
            area: area.trim().to_string(),
            summary: aggregate_geography(&schools),
        })
    }

    /// Runs one refresh pass now. Blocks until the pass finishes.
    pub fn refresh(&self, now: DateTime<Utc>) -> Result<RefreshReport, ServiceError> {
        Ok(self.driver.run_once(now)?)
    }

    fn schools_in(&self, area: &str) -> Result<Vec<SchoolRecord>, ServiceError> {
        let schools = self.directory.schools_in_area(area)?;
        if schools.is_empty() {
            return Err(ServiceError::AreaNotFound(area.trim().to_string()));
        }
        Ok(schools)
    }
}
