use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ranking::RankCandidate;
use crate::ratings::{normalizer, Jurisdiction, Rating, RatingComponent, SchoolMetrics, Urn};
use crate::sources::RegistryRow;

/// Registry facts shown on a profile and used for phase and area matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolProfile {
    pub urn: Urn,
    pub name: String,
    pub jurisdiction: Jurisdiction,
    pub phase: Option<String>,
    pub school_type: Option<String>,
    pub type_group: Option<String>,
    pub local_authority: Option<String>,
    pub town: Option<String>,
    pub postcode: Option<String>,
}

impl SchoolProfile {
    pub fn from_registry(row: &RegistryRow) -> Self {
        let is_scotland = row
            .is_scotland
            .as_deref()
            .map(normalizer::parse_flag)
            .unwrap_or(false);

        Self {
            urn: Urn::new(row.urn.as_str()),
            name: row.name.trim().to_string(),
            jurisdiction: Jurisdiction::resolve(row.country.as_deref(), is_scotland),
            phase: row.phase.clone(),
            school_type: row.school_type.clone(),
            type_group: row.type_group.clone(),
            local_authority: row.local_authority.clone(),
            town: row.town.clone(),
            postcode: row.postcode.clone(),
        }
    }

    /// Case-insensitive match on local authority or town.
    pub fn in_area(&self, area: &str) -> bool {
        let area = area.trim();
        !area.is_empty()
            && [self.local_authority.as_deref(), self.town.as_deref()]
                .into_iter()
                .flatten()
                .any(|value| value.trim().eq_ignore_ascii_case(area))
    }
}

/// Rating fields persisted on the school record. Always replaced whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRating {
    pub overall_rating: Option<f64>,
    pub rating_components: Vec<RatingComponent>,
    pub rating_data_completeness: u8,
    #[serde(default)]
    pub rating_percentile: Option<f64>,
    pub rated_at: DateTime<Utc>,
}

impl StoredRating {
    pub fn from_rating(rating: Rating, rated_at: DateTime<Utc>) -> Self {
        Self {
            overall_rating: rating.overall,
            rating_components: rating.components,
            rating_data_completeness: rating.completeness,
            rating_percentile: rating.percentile,
            rated_at,
        }
    }

    pub fn to_rating(&self) -> Rating {
        Rating {
            overall: self.overall_rating,
            components: self.rating_components.clone(),
            completeness: self.rating_data_completeness,
            percentile: self.rating_percentile,
        }
    }

    /// True once the rating is older than `window`.
    pub fn is_stale(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.rated_at > window
    }
}

/// A school as read by profile, ranking and area callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolRecord {
    pub profile: SchoolProfile,
    pub metrics: SchoolMetrics,
    pub rating: Option<StoredRating>,
}

impl SchoolRecord {
    pub fn rank_candidate(&self) -> RankCandidate {
        RankCandidate {
            urn: self.profile.urn.clone(),
            name: self.profile.name.clone(),
            jurisdiction: self.profile.jurisdiction,
            overall_rating: self
                .rating
                .as_ref()
                .and_then(|rating| rating.overall_rating),
            completeness: self
                .rating
                .as_ref()
                .map(|rating| rating.rating_data_completeness)
                .unwrap_or(0),
            ofsted_band: self.metrics.ofsted_band,
        }
    }
}
