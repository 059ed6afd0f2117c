use crate::ratings::domain::{
    AcademicMetrics, Jurisdiction, OfstedBand, SchoolMetrics, SubjectScore, Urn,
};
use crate::sources::{
    AttainmentRow, AttendanceRow, CensusRow, OfstedInspectionRow, RegistryRow, SourceRows,
};

pub(super) fn england_metrics(urn: &str) -> SchoolMetrics {
    SchoolMetrics::empty(Urn::new(urn), Jurisdiction::England)
}

pub(super) fn scotland_metrics(urn: &str) -> SchoolMetrics {
    SchoolMetrics::empty(Urn::new(urn), Jurisdiction::Scotland)
}

pub(super) fn academic(english: f64, maths: f64, science: Option<f64>) -> AcademicMetrics {
    AcademicMetrics {
        english: Some(SubjectScore::new(english)),
        maths: Some(SubjectScore::new(maths)),
        science: science.map(SubjectScore::new),
    }
}

/// England school with every metric present: band 1, 72% academic, 95% attendance.
pub(super) fn school_a() -> SchoolMetrics {
    let mut metrics = england_metrics("100001");
    metrics.ofsted_band = Some(OfstedBand::OUTSTANDING);
    metrics.academic = academic(72.0, 72.0, Some(72.0));
    metrics.attendance_rate = Some(95.0);
    metrics.fsm_percentage = Some(12.5);
    metrics
}

pub(super) fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

pub(super) fn registry(urn: &str, country: Option<&str>) -> RegistryRow {
    RegistryRow {
        urn: urn.to_string(),
        name: format!("School {urn}"),
        country: country.map(str::to_string),
        phase: text("Primary"),
        local_authority: text("Leeds"),
        ..RegistryRow::default()
    }
}

pub(super) fn inspection(urn: &str, band: &str, date: &str) -> OfstedInspectionRow {
    OfstedInspectionRow {
        urn: urn.to_string(),
        overall_effectiveness: text(band),
        inspection_date: text(date),
    }
}

pub(super) fn attendance(urn: &str, year: &str, absence: &str) -> AttendanceRow {
    AttendanceRow {
        urn: urn.to_string(),
        academic_year: text(year),
        overall_absence_rate: text(absence),
        la_absence_rate: text("6.1"),
        national_absence_rate: text("5.9"),
    }
}

pub(super) fn census(urn: &str, year: &str, fsm: &str) -> CensusRow {
    CensusRow {
        urn: urn.to_string(),
        academic_year: text(year),
        fsm_pct: text(fsm),
        ..CensusRow::default()
    }
}

pub(super) fn attainment(
    urn: &str,
    year: &str,
    english: &str,
    maths: &str,
    science: &str,
) -> AttainmentRow {
    AttainmentRow {
        urn: urn.to_string(),
        academic_year: text(year),
        english_pct: text(english),
        english_national_pct: text("74"),
        maths_pct: text(maths),
        maths_la_pct: text("70"),
        maths_national_pct: text("73"),
        science_pct: text(science),
        ..AttainmentRow::default()
    }
}

pub(super) fn rows(registry: RegistryRow) -> SourceRows {
    SourceRows {
        registry,
        ..SourceRows::default()
    }
}
