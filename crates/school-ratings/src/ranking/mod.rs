//! Fair ordering of a school population for leaderboards and "top N" lists.
//!
//! Schools are first bucketed by how much real data backs their rating and
//! only then ordered within each bucket. The concatenated order is the
//! contract: a fully-reported school always outranks a partially-reported
//! one, whatever their scores.

mod tier;

pub use tier::{RankTier, PARTIAL_TIER_MIN_COMPLETENESS};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::ratings::lenient;
use crate::ratings::{Jurisdiction, OfstedBand, Urn};

/// Summary row for one school in a population being ranked.
///
/// Malformed ratings, bands or completeness figures read as no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankCandidate {
    pub urn: Urn,
    pub name: String,
    pub jurisdiction: Jurisdiction,
    #[serde(default, deserialize_with = "lenient::number")]
    pub overall_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::completeness")]
    pub completeness: u8,
    #[serde(default, deserialize_with = "lenient::band")]
    pub ofsted_band: Option<OfstedBand>,
}

impl RankCandidate {
    pub fn tier(&self) -> RankTier {
        RankTier::classify(self)
    }

    fn rating(&self) -> Option<f64> {
        self.overall_rating.filter(|rating| rating.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSchool {
    /// 1-based position in the full ranking.
    pub position: usize,
    pub tier: RankTier,
    pub tier_label: &'static str,
    #[serde(flatten)]
    pub school: RankCandidate,
}

/// Orders a population by tier, then by the tier's own criterion.
///
/// Ties keep input order, so ranking the same input twice yields the same
/// sequence.
pub fn rank_schools(candidates: Vec<RankCandidate>) -> Vec<RankedSchool> {
    let mut complete = Vec::new();
    let mut partial = Vec::new();
    let mut ofsted_only = Vec::new();
    let mut unrated = Vec::new();

    for candidate in candidates {
        match candidate.tier() {
            RankTier::Complete => complete.push(candidate),
            RankTier::Partial => partial.push(candidate),
            RankTier::OfstedOnly => ofsted_only.push(candidate),
            RankTier::Unrated => unrated.push(candidate),
        }
    }

    complete.sort_by(by_rating_desc);
    partial.sort_by(by_rating_desc);
    ofsted_only.sort_by_key(|candidate| candidate.ofsted_band);
    unrated.sort_by_cached_key(|candidate| candidate.name.trim().to_lowercase());

    [
        (RankTier::Complete, complete),
        (RankTier::Partial, partial),
        (RankTier::OfstedOnly, ofsted_only),
        (RankTier::Unrated, unrated),
    ]
    .into_iter()
    .flat_map(|(tier, schools)| schools.into_iter().map(move |school| (tier, school)))
    .enumerate()
    .map(|(index, (tier, school))| RankedSchool {
        position: index + 1,
        tier,
        tier_label: tier.label(),
        school,
    })
    .collect()
}

/// First `limit` entries of [`rank_schools`].
pub fn top_n(candidates: Vec<RankCandidate>, limit: usize) -> Vec<RankedSchool> {
    let mut ranked = rank_schools(candidates);
    ranked.truncate(limit);
    ranked
}

fn by_rating_desc(left: &RankCandidate, right: &RankCandidate) -> Ordering {
    match (left.rating(), right.rating()) {
        (Some(left), Some(right)) => right.total_cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
