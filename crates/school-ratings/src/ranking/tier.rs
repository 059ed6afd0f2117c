use serde::{Deserialize, Serialize};

use super::RankCandidate;
use crate::ratings::Jurisdiction;

/// Lowest completeness that still counts as partially rated.
pub const PARTIAL_TIER_MIN_COMPLETENESS: u8 = 40;

const COMPLETE_TIER_MIN_COMPLETENESS: u8 = 100;

/// Fairness bucket deciding where a school may appear in a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankTier {
    Complete,
    Partial,
    OfstedOnly,
    Unrated,
}

impl RankTier {
    pub const fn ordered() -> [Self; 4] {
        [Self::Complete, Self::Partial, Self::OfstedOnly, Self::Unrated]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Complete => "Complete data",
            Self::Partial => "Partial data",
            Self::OfstedOnly => "Ofsted only",
            Self::Unrated => "Unrated",
        }
    }

    /// Buckets by completeness alone. Below the partial threshold an English
    /// school with an inspection grade is Ofsted-only and anything else is
    /// unrated.
    pub fn classify(candidate: &RankCandidate) -> Self {
        if candidate.completeness >= COMPLETE_TIER_MIN_COMPLETENESS {
            return Self::Complete;
        }
        if candidate.completeness >= PARTIAL_TIER_MIN_COMPLETENESS {
            return Self::Partial;
        }

        if candidate.jurisdiction == Jurisdiction::England && candidate.ofsted_band.is_some() {
            Self::OfstedOnly
        } else {
            Self::Unrated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratings::{OfstedBand, Urn};

    fn candidate(jurisdiction: Jurisdiction) -> RankCandidate {
        RankCandidate {
            urn: Urn::new("1"),
            name: "Test".to_string(),
            jurisdiction,
            overall_rating: None,
            completeness: 0,
            ofsted_band: None,
        }
    }

    #[test]
    fn classifies_by_completeness_when_rated() {
        let mut school = candidate(Jurisdiction::England);
        school.overall_rating = Some(6.0);
        school.completeness = 100;
        assert_eq!(school.tier(), RankTier::Complete);
        school.completeness = 55;
        assert_eq!(school.tier(), RankTier::Partial);
    }

    #[test]
    fn ofsted_only_is_reserved_for_england() {
        let mut english = candidate(Jurisdiction::England);
        english.ofsted_band = Some(OfstedBand::GOOD);
        english.completeness = 30;
        assert_eq!(english.tier(), RankTier::OfstedOnly);

        let mut scottish = candidate(Jurisdiction::Scotland);
        scottish.ofsted_band = Some(OfstedBand::GOOD);
        assert_eq!(scottish.tier(), RankTier::Unrated);
    }

    #[test]
    fn completeness_bands_do_not_need_an_overall_rating() {
        let mut school = candidate(Jurisdiction::England);
        school.ofsted_band = Some(OfstedBand::GOOD);

        let tiers: Vec<(u8, RankTier)> = [39, 40, 45, 99, 100]
            .into_iter()
            .map(|completeness| {
                school.completeness = completeness;
                (completeness, school.tier())
            })
            .collect();

        assert_eq!(
            tiers,
            vec![
                (39, RankTier::OfstedOnly),
                (40, RankTier::Partial),
                (45, RankTier::Partial),
                (99, RankTier::Partial),
                (100, RankTier::Complete),
            ]
        );

        let mut scottish = candidate(Jurisdiction::Scotland);
        scottish.completeness = 40;
        assert_eq!(scottish.tier(), RankTier::Partial);
        scottish.completeness = 39;
        assert_eq!(scottish.tier(), RankTier::Unrated);
    }
}
