//! Periodic recomputation of missing and stale ratings.
//!
//! The driver is the only writer of rating fields. A global job lock rejects
//! overlapping runs, and each school is recomputed whole, so no finer-grained
//! locking is needed.

mod store;

pub use store::{RatingStatus, RatingStore, StoreError};

use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::{Arc, Mutex, TryLockError};
use tracing::{error, info, warn};

use crate::config::RefreshConfig;
use crate::directory::StoredRating;
use crate::ratings::{normalize, rate_school, Urn};
use crate::sources::{SchoolSource, SourceRows};

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("a rating refresh is already running")]
    AlreadyRunning,
    #[error("could not list ratings: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshFailure {
    pub urn: Urn,
    pub reason: String,
}

/// Outcome counts for one refresh run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub started_at: DateTime<Utc>,
    pub considered: usize,
    pub rated: usize,
    pub insufficient_data: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RefreshFailure>,
}

enum SchoolOutcome {
    Rated,
    InsufficientData,
    Skipped,
    Failed(String),
}

pub struct RefreshDriver<S, T> {
    source: Arc<S>,
    store: Arc<T>,
    staleness: Duration,
    running: Mutex<()>,
}

impl<S, T> RefreshDriver<S, T>
where
    S: SchoolSource + 'static,
    T: RatingStore + 'static,
{
    pub fn new(source: Arc<S>, store: Arc<T>, staleness: Duration) -> Self {
        Self {
            source,
            store,
            staleness,
            running: Mutex::new(()),
        }
    }

    pub fn from_config(source: Arc<S>, store: Arc<T>, config: &RefreshConfig) -> Self {
        Self::new(source, store, config.staleness_window())
    }

    pub fn staleness(&self) -> Duration {
        self.staleness
    }

    /// Schools with no rating or one older than the staleness window.
    pub fn select_due(&self, now: DateTime<Utc>) -> Result<Vec<Urn>, RefreshError> {
        let statuses = self.store.rating_status()?;
        Ok(statuses
            .into_iter()
            .filter(|status| match status.rated_at {
                Some(rated_at) => now - rated_at > self.staleness,
                None => true,
            })
            .map(|status| status.urn)
            .collect())
    }

    /// Recomputes every due school.
    ///
    /// Fails only when another run holds the job lock or the store cannot list
    /// ratings. Per-school failures are collected in the report.
    pub fn run_once(&self, now: DateTime<Utc>) -> Result<RefreshReport, RefreshError> {
        let _guard = match self.running.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(RefreshError::AlreadyRunning),
        };

        let due = self.select_due(now)?;
        let outcomes: Vec<(Urn, SchoolOutcome)> = due
            .into_par_iter()
            .map(|urn| {
                let outcome = self.refresh_school(&urn, now);
                (urn, outcome)
            })
            .collect();

        let mut report = RefreshReport {
            started_at: now,
            considered: outcomes.len(),
            rated: 0,
            insufficient_data: 0,
            skipped: 0,
            failures: Vec::new(),
        };
        for (urn, outcome) in outcomes {
            match outcome {
                SchoolOutcome::Rated => report.rated += 1,
                SchoolOutcome::InsufficientData => report.insufficient_data += 1,
                SchoolOutcome::Skipped => report.skipped += 1,
                SchoolOutcome::Failed(reason) => {
                    warn!(%urn, %reason, "rating refresh failed for school");
                    report.failures.push(RefreshFailure { urn, reason });
                }
            }
        }

        info!(
            considered = report.considered,
            rated = report.rated,
            insufficient = report.insufficient_data,
            skipped = report.skipped,
            failed = report.failures.len(),
            "rating refresh finished"
        );

        Ok(report)
    }

    fn refresh_school(&self, urn: &Urn, now: DateTime<Utc>) -> SchoolOutcome {
        let rows = match SourceRows::gather(self.source.as_ref(), urn) {
            Ok(Some(rows)) => rows,
            Ok(None) => return SchoolOutcome::Skipped,
            Err(err) => return SchoolOutcome::Failed(err.to_string()),
        };

        let rating = rate_school(&normalize(&rows));
        let sufficient = rating.is_sufficient();

        match self
            .store
            .save_rating(urn, StoredRating::from_rating(rating, now))
        {
            Ok(()) if sufficient => SchoolOutcome::Rated,
            Ok(()) => SchoolOutcome::InsufficientData,
            Err(err) => SchoolOutcome::Failed(err.to_string()),
        }
    }
}

/// Runs the driver every `period` on the blocking pool until the runtime
/// shuts down. The first run starts immediately.
pub fn spawn_refresh_loop<S, T>(
    driver: Arc<RefreshDriver<S, T>>,
    period: std::time::Duration,
) -> tokio::task::JoinHandle<()>
where
    S: SchoolSource + 'static,
    T: RatingStore + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let driver = Arc::clone(&driver);
            match tokio::task::spawn_blocking(move || driver.run_once(Utc::now())).await {
                Ok(Ok(_)) => {}
                Ok(Err(RefreshError::AlreadyRunning)) => {
                    warn!("previous rating refresh still running, skipping tick");
                }
                Ok(Err(err)) => error!(error = %err, "rating refresh aborted"),
                Err(err) => error!(error = %err, "rating refresh task panicked"),
            }
        }
    })
}
