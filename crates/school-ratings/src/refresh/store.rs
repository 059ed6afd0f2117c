use chrono::{DateTime, Utc};

use crate::directory::StoredRating;
use crate::ratings::Urn;

/// When a school's rating was last written, if ever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingStatus {
    pub urn: Urn,
    pub rated_at: Option<DateTime<Utc>>,
}

/// Persistence for the rating fields of school records.
pub trait RatingStore: Send + Sync {
    fn rating_status(&self) -> Result<Vec<RatingStatus>, StoreError>;
    fn save_rating(&self, urn: &Urn, rating: StoredRating) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("school {0} not found")]
    NotFound(Urn),
    #[error("rating store unavailable: {0}")]
    Unavailable(String),
}
