use serde::{Deserialize, Serialize};

use super::components::{
    academic_component, attendance_component, ofsted_component, score_label, ComponentKind,
    RatingComponent,
};
use super::domain::{Jurisdiction, SchoolMetrics};
use super::policy::JurisdictionPolicy;

/// Completeness below which no overall rating is published.
pub const MINIMUM_COMPLETENESS: u8 = 50;

const MIN_OVERALL: f64 = 1.0;
const MAX_OVERALL: f64 = 10.0;

/// Composite rating for one school.
///
/// `overall` is absent exactly when `completeness` is below
/// [`MINIMUM_COMPLETENESS`]; the components are exposed either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub overall: Option<f64>,
    pub components: Vec<RatingComponent>,
    pub completeness: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
}

impl Rating {
    pub fn is_sufficient(&self) -> bool {
        self.overall.is_some()
    }

    pub fn component(&self, kind: ComponentKind) -> Option<&RatingComponent> {
        self.components.iter().find(|component| component.name == kind)
    }

    /// Attaches an externally computed percentile. Values outside 0-100 are
    /// dropped.
    pub fn with_percentile(mut self, percentile: f64) -> Self {
        self.percentile = (percentile.is_finite() && (0.0..=100.0).contains(&percentile))
            .then_some(percentile);
        self
    }

    pub fn label(&self) -> &'static str {
        match self.overall {
            Some(overall) => score_label(overall),
            None => "Insufficient data",
        }
    }
}

/// Scores every component the policy lists and blends those present.
///
/// The blend is re-normalised over the weight actually present so a missing
/// component lowers completeness but does not drag the score down. Ofsted is
/// only scored for English schools, whatever the policy lists.
pub fn compute_rating(metrics: &SchoolMetrics, policy: &JurisdictionPolicy) -> Rating {
    let components: Vec<RatingComponent> = policy
        .weights()
        .iter()
        .filter_map(|entry| match entry.kind {
            ComponentKind::Ofsted if metrics.jurisdiction != Jurisdiction::England => None,
            ComponentKind::Ofsted => ofsted_component(metrics, entry.weight),
            ComponentKind::Academic => {
                academic_component(metrics, entry.weight, policy.includes_science())
            }
            ComponentKind::Attendance => attendance_component(metrics, entry.weight),
        })
        .collect();

    let completeness: u8 = components.iter().map(|component| component.weight).sum();

    let overall = if completeness < MINIMUM_COMPLETENESS {
        None
    } else {
        let weighted: f64 = components
            .iter()
            .map(|component| component.score * f64::from(component.weight))
            .sum();
        let blended = weighted / f64::from(completeness);
        Some(round_one_decimal(blended).clamp(MIN_OVERALL, MAX_OVERALL))
    };

    Rating {
        overall,
        components,
        completeness,
        percentile: None,
    }
}

/// Rates a school under the policy of its own jurisdiction.
pub fn rate_school(metrics: &SchoolMetrics) -> Rating {
    compute_rating(
        metrics,
        &JurisdictionPolicy::for_jurisdiction(metrics.jurisdiction),
    )
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
