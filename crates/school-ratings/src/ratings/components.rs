use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Comparator, OfstedBand, SchoolMetrics, Subject};
use super::normalizer::is_valid_percentage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Ofsted,
    Academic,
    Attendance,
}

impl ComponentKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ofsted => "Ofsted inspection",
            Self::Academic => "Academic results",
            Self::Attendance => "Attendance",
        }
    }
}

/// One scored input to the overall rating, with the figures behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingComponent {
    pub name: ComponentKind,
    pub weight: u8,
    pub score: f64,
    pub label: String,
    pub details: ComponentDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentDetails {
    Ofsted {
        band: u8,
        grade: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inspection_date: Option<NaiveDate>,
    },
    Academic {
        average_pct: f64,
        subjects: Vec<SubjectDetail>,
    },
    Attendance {
        attendance_rate: f64,
        absence_rate: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comparator: Option<Comparator>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectDetail {
    pub subject: Subject,
    pub school_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<Comparator>,
}

const MAX_SCORE: f64 = 10.0;

/// Banded proxy for an inspection outcome, not a continuous scale.
pub const fn ofsted_score(band: OfstedBand) -> f64 {
    match band.value() {
        1 => 9.0,
        2 => 7.0,
        3 => 5.0,
        _ => 3.0,
    }
}

/// Label for a 0-10 academic or attendance score.
pub fn score_label(score: f64) -> &'static str {
    if score >= 8.0 {
        "Excellent"
    } else if score >= 6.5 {
        "Good"
    } else if score >= 5.0 {
        "Average"
    } else if score >= 3.5 {
        "Below average"
    } else {
        "Poor"
    }
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, MAX_SCORE)
}

pub(crate) fn ofsted_component(metrics: &SchoolMetrics, weight: u8) -> Option<RatingComponent> {
    let band = metrics.ofsted_band?;
    Some(RatingComponent {
        name: ComponentKind::Ofsted,
        weight,
        score: clamp_score(ofsted_score(band)),
        label: band.label().to_string(),
        details: ComponentDetails::Ofsted {
            band: band.value(),
            grade: band.label().to_string(),
            inspection_date: metrics.ofsted_inspection_date,
        },
    })
}

pub(crate) fn academic_component(
    metrics: &SchoolMetrics,
    weight: u8,
    include_science: bool,
) -> Option<RatingComponent> {
    let average_pct = metrics.academic.average_pct(include_science)?;
    let score = clamp_score(average_pct / 10.0);
    let subjects = metrics
        .academic
        .present(include_science)
        .into_iter()
        .map(|(subject, result)| SubjectDetail {
            subject,
            school_pct: result.school_pct,
            comparator: result.comparator,
        })
        .collect();

    Some(RatingComponent {
        name: ComponentKind::Academic,
        weight,
        score,
        label: score_label(score).to_string(),
        details: ComponentDetails::Academic {
            average_pct,
            subjects,
        },
    })
}

pub(crate) fn attendance_component(
    metrics: &SchoolMetrics,
    weight: u8,
) -> Option<RatingComponent> {
    let attendance_rate = metrics.attendance_rate.filter(|rate| is_valid_percentage(*rate))?;
    let score = clamp_score(attendance_rate / 10.0);

    Some(RatingComponent {
        name: ComponentKind::Attendance,
        weight,
        score,
        label: score_label(score).to_string(),
        details: ComponentDetails::Attendance {
            attendance_rate,
            absence_rate: 100.0 - attendance_rate,
            comparator: metrics.attendance_comparator,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratings::domain::{Jurisdiction, SubjectScore, Urn};

    fn metrics() -> SchoolMetrics {
        SchoolMetrics::empty(Urn::new("100001"), Jurisdiction::England)
    }

    #[test]
    fn ofsted_bands_map_to_fixed_steps() {
        let scores: Vec<f64> = OfstedBand::ordered().into_iter().map(ofsted_score).collect();
        assert_eq!(scores, vec![9.0, 7.0, 5.0, 3.0]);
    }

    #[test]
    fn academic_score_is_mean_percentage_over_ten() {
        let mut metrics = metrics();
        metrics.academic.english = Some(SubjectScore::new(70.0));
        metrics.academic.maths = Some(SubjectScore::new(74.0));

        let component = academic_component(&metrics, 45, true).expect("academic present");
        assert!((component.score - 7.2).abs() < 1e-9);
        assert_eq!(component.label, "Good");
        match component.details {
            ComponentDetails::Academic { subjects, .. } => assert_eq!(subjects.len(), 2),
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[test]
    fn missing_inputs_produce_no_component() {
        let metrics = metrics();
        assert!(ofsted_component(&metrics, 30).is_none());
        assert!(academic_component(&metrics, 45, true).is_none());
        assert!(attendance_component(&metrics, 25).is_none());
    }

    #[test]
    fn zero_attendance_is_present_not_absent() {
        let mut metrics = metrics();
        metrics.attendance_rate = Some(0.0);
        let component = attendance_component(&metrics, 25).expect("zero is a value");
        assert_eq!(component.score, 0.0);
        assert_eq!(component.label, "Poor");
    }

    #[test]
    fn out_of_range_attendance_is_treated_as_absent() {
        let mut metrics = metrics();
        metrics.attendance_rate = Some(140.0);
        assert!(attendance_component(&metrics, 25).is_none());
    }
}
