//! Area-level roll-ups for a local authority or town.

mod phase;

pub use phase::Phase;

use serde::Serialize;

use crate::directory::SchoolRecord;
use crate::ratings::{round_one_decimal, Jurisdiction, OfstedBand};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhaseCounts {
    pub primary: usize,
    pub secondary: usize,
    pub sixth_form: usize,
    pub special: usize,
}

impl PhaseCounts {
    fn record(&mut self, phase: Phase) {
        match phase {
            Phase::Primary => self.primary += 1,
            Phase::Secondary => self.secondary += 1,
            Phase::SixthForm => self.sixth_form += 1,
            Phase::Special => self.special += 1,
        }
    }

    pub fn get(&self, phase: Phase) -> usize {
        match phase {
            Phase::Primary => self.primary,
            Phase::Secondary => self.secondary,
            Phase::SixthForm => self.sixth_form,
            Phase::Special => self.special,
        }
    }
}

/// Inspection outcomes across the English schools of an area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OfstedDistribution {
    pub outstanding: usize,
    pub good: usize,
    pub requires_improvement: usize,
    pub inadequate: usize,
    pub not_inspected: usize,
}

impl OfstedDistribution {
    fn record(&mut self, band: Option<OfstedBand>) {
        match band.map(OfstedBand::value) {
            Some(1) => self.outstanding += 1,
            Some(2) => self.good += 1,
            Some(3) => self.requires_improvement += 1,
            Some(_) => self.inadequate += 1,
            None => self.not_inspected += 1,
        }
    }

    pub fn inspected(&self) -> usize {
        self.outstanding + self.good + self.requires_improvement + self.inadequate
    }
}

/// Mean over the schools that report a figure, with how many did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricMean {
    pub mean: Option<f64>,
    pub schools: usize,
}

#[derive(Default)]
struct Accumulator {
    total: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, value: Option<f64>) {
        if let Some(value) = value.filter(|value| value.is_finite()) {
            self.total += value;
            self.count += 1;
        }
    }

    fn finish(self) -> MetricMean {
        MetricMean {
            mean: (self.count > 0).then(|| round_one_decimal(self.total / self.count as f64)),
            schools: self.count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoSummary {
    pub total_schools: usize,
    pub phase_counts: PhaseCounts,
    pub ofsted_distribution: OfstedDistribution,
    pub academic_pct: MetricMean,
    pub attendance_rate: MetricMean,
    pub fsm_pct: MetricMean,
    pub overall_rating: MetricMean,
}

impl GeoSummary {
    pub fn rated_schools(&self) -> usize {
        self.overall_rating.schools
    }
}

/// Rolls a school collection up into counts and simple means.
///
/// Schools missing a figure are left out of that mean's denominator. The
/// Ofsted distribution only counts English schools.
pub fn aggregate_geography(schools: &[SchoolRecord]) -> GeoSummary {
    let mut summary = GeoSummary {
        total_schools: schools.len(),
        ..GeoSummary::default()
    };
    let mut academic = Accumulator::default();
    let mut attendance = Accumulator::default();
    let mut fsm = Accumulator::default();
    let mut overall = Accumulator::default();

    for school in schools {
        for phase in Phase::classify(&school.profile) {
            summary.phase_counts.record(phase);
        }

        let metrics = &school.metrics;
        if metrics.jurisdiction == Jurisdiction::England {
            summary.ofsted_distribution.record(metrics.ofsted_band);
        }

        let include_science = metrics.jurisdiction == Jurisdiction::England;
        academic.add(metrics.academic.average_pct(include_science));
        attendance.add(metrics.attendance_rate);
        fsm.add(metrics.fsm_percentage);
        overall.add(school.rating.as_ref().and_then(|rating| rating.overall_rating));
    }

    summary.academic_pct = academic.finish();
    summary.attendance_rate = attendance.finish();
    summary.fsm_pct = fsm.finish();
    summary.overall_rating = overall.finish();
    summary
}
