//! Metric normalisation, component scoring, jurisdiction policy and the
//! aggregation that turns them into a single overall rating.

mod aggregator;
mod components;
pub mod domain;
pub(crate) mod lenient;
pub mod normalizer;
mod policy;

#[cfg(test)]
mod tests;

pub use aggregator::{compute_rating, rate_school, Rating, MINIMUM_COMPLETENESS};
pub(crate) use aggregator::round_one_decimal;
pub use components::{
    ofsted_score, score_label, ComponentDetails, ComponentKind, RatingComponent, SubjectDetail,
};
pub use domain::{
    AcademicMetrics, Comparator, ComparatorScope, Jurisdiction, OfstedBand, SchoolMetrics,
    Subject, SubjectScore, Urn,
};
pub use normalizer::normalize;
pub use policy::{ComponentWeight, JurisdictionPolicy};
