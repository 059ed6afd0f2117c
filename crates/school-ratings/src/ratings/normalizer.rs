use chrono::{DateTime, NaiveDate};

use super::domain::{
    AcademicMetrics, Comparator, ComparatorScope, Jurisdiction, OfstedBand, SchoolMetrics,
    SubjectScore, Urn,
};
use crate::sources::{AttainmentRow, AttendanceRow, CensusRow, OfstedInspectionRow, SourceRows};

/// Builds canonical metrics from every source row held for one school.
///
/// A metric is present only when its latest source row exists and the field
/// parses to an in-range number. Science and Ofsted are dropped outside
/// England.
pub fn normalize(rows: &SourceRows) -> SchoolMetrics {
    let registry = &rows.registry;
    let is_scotland = registry
        .is_scotland
        .as_deref()
        .map(parse_flag)
        .unwrap_or(false);
    let jurisdiction = Jurisdiction::resolve(registry.country.as_deref(), is_scotland);

    let mut metrics = SchoolMetrics::empty(Urn::new(registry.urn.as_str()), jurisdiction);

    let inspection = if jurisdiction == Jurisdiction::England {
        latest_inspection(&rows.ofsted)
    } else {
        None
    };
    if let Some(inspection) = inspection {
        metrics.ofsted_band = inspection
            .overall_effectiveness
            .as_deref()
            .and_then(parse_band);
        if metrics.ofsted_band.is_some() {
            metrics.ofsted_inspection_date =
                inspection.inspection_date.as_deref().and_then(parse_date);
        }
    }

    if let Some(attainment) = latest_by_year(&rows.attainment, |row: &AttainmentRow| {
        row.academic_year.as_deref()
    }) {
        metrics.academic = academic_from(attainment, jurisdiction);
    }

    if let Some(attendance) = latest_by_year(&rows.attendance, |row: &AttendanceRow| {
        row.academic_year.as_deref()
    }) {
        metrics.attendance_rate = attendance
            .overall_absence_rate
            .as_deref()
            .and_then(parse_percentage)
            .map(|absence| 100.0 - absence);
        metrics.attendance_comparator = comparator(
            attendance.la_absence_rate.as_deref(),
            attendance.national_absence_rate.as_deref(),
        )
        .map(|absence| Comparator {
            value: 100.0 - absence.value,
            scope: absence.scope,
        });
    }

    if let Some(census) = latest_by_year(&rows.census, |row: &CensusRow| row.academic_year.as_deref())
    {
        metrics.fsm_percentage = census.fsm_pct.as_deref().and_then(parse_percentage);
    }

    metrics
}

fn academic_from(row: &AttainmentRow, jurisdiction: Jurisdiction) -> AcademicMetrics {
    let subject = |school: &Option<String>, la: &Option<String>, national: &Option<String>| {
        school
            .as_deref()
            .and_then(parse_percentage)
            .map(|school_pct| SubjectScore {
                school_pct,
                comparator: comparator(la.as_deref(), national.as_deref()),
            })
    };

    let science = if jurisdiction == Jurisdiction::England {
        subject(
            &row.science_pct,
            &row.science_la_pct,
            &row.science_national_pct,
        )
    } else {
        None
    };

    AcademicMetrics {
        english: subject(
            &row.english_pct,
            &row.english_la_pct,
            &row.english_national_pct,
        ),
        maths: subject(&row.maths_pct, &row.maths_la_pct, &row.maths_national_pct),
        science,
    }
}

/// Local-authority average when it parses, otherwise the national figure.
fn comparator(local_authority: Option<&str>, national: Option<&str>) -> Option<Comparator> {
    local_authority
        .and_then(parse_percentage)
        .map(|value| Comparator {
            value,
            scope: ComparatorScope::LocalAuthority,
        })
        .or_else(|| {
            national.and_then(parse_percentage).map(|value| Comparator {
                value,
                scope: ComparatorScope::National,
            })
        })
}

fn latest_inspection(rows: &[OfstedInspectionRow]) -> Option<&OfstedInspectionRow> {
    latest(rows, |row| row.inspection_date.as_deref().and_then(parse_date))
}

fn latest_by_year<'a, T, F>(rows: &'a [T], year: F) -> Option<&'a T>
where
    F: Fn(&T) -> Option<&str>,
{
    latest(rows, |row| year(row).and_then(parse_academic_year))
}

/// Picks the row with the greatest key. Undated rows rank below dated ones and
/// ties keep the first row seen.
pub(crate) fn latest<T, K, F>(rows: &[T], key: F) -> Option<&T>
where
    K: Ord,
    F: Fn(&T) -> Option<K>,
{
    let mut best: Option<(&T, Option<K>)> = None;
    for row in rows {
        let candidate = key(row);
        let newer = match &best {
            Some((_, current)) => candidate > *current,
            None => true,
        };
        if newer {
            best = Some((row, candidate));
        }
    }
    best.map(|(row, _)| row)
}

pub(crate) fn is_valid_percentage(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

/// Parses `72`, `72.5` or `72.5%`. Anything non-numeric or outside 0-100 is
/// absent.
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_end_matches('%').trim();
    let value = trimmed.parse::<f64>().ok()?;
    is_valid_percentage(value).then_some(value)
}

/// Accepts the numeric grade or its published wording.
pub fn parse_band(raw: &str) -> Option<OfstedBand> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.fract() != 0.0 || !(1.0..=4.0).contains(&value) {
            return None;
        }
        return OfstedBand::new(value as u8);
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "outstanding" => Some(OfstedBand::OUTSTANDING),
        "good" => Some(OfstedBand::GOOD),
        "requires improvement" | "satisfactory" => Some(OfstedBand::REQUIRES_IMPROVEMENT),
        "inadequate" | "serious weaknesses" | "special measures" => Some(OfstedBand::INADEQUATE),
        _ => None,
    }
}

pub(crate) fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "t" | "1" | "yes" | "y"
    )
}

/// Start year of an academic year written as `2023/24`, `2023-24`, `202324`
/// or `2023`.
pub(crate) fn parse_academic_year(raw: &str) -> Option<u16> {
    let trimmed = raw.trim();
    let start = trimmed
        .split(['/', '-'])
        .next()
        .filter(|part| !part.is_empty() && part.is_ascii())?;
    let digits = if start.len() == 6 { &start[..4] } else { start };
    if digits.len() != 4 {
        return None;
    }
    digits.parse().ok()
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_reject_garbage_and_out_of_range() {
        assert_eq!(parse_percentage(" 72.5% "), Some(72.5));
        assert_eq!(parse_percentage("0"), Some(0.0));
        assert_eq!(parse_percentage("SUPP"), None);
        assert_eq!(parse_percentage("104"), None);
        assert_eq!(parse_percentage("-3"), None);
        assert_eq!(parse_percentage("NaN"), None);
    }

    #[test]
    fn bands_accept_numbers_and_grade_words() {
        assert_eq!(parse_band("1"), Some(OfstedBand::OUTSTANDING));
        assert_eq!(parse_band("2.0"), Some(OfstedBand::GOOD));
        assert_eq!(
            parse_band("Requires Improvement"),
            Some(OfstedBand::REQUIRES_IMPROVEMENT)
        );
        assert_eq!(parse_band("2.5"), None);
        assert_eq!(parse_band("9"), None);
        assert_eq!(parse_band("Not judged"), None);
    }

    #[test]
    fn academic_years_parse_in_common_layouts() {
        assert_eq!(parse_academic_year("2023/24"), Some(2023));
        assert_eq!(parse_academic_year("2022-23"), Some(2022));
        assert_eq!(parse_academic_year("202324"), Some(2023));
        assert_eq!(parse_academic_year("2021"), Some(2021));
        assert_eq!(parse_academic_year("last year"), None);
    }

    #[test]
    fn latest_keeps_first_row_on_ties_and_prefers_dated_rows() {
        let rows = [(None, "undated"), (Some(2022), "a"), (Some(2023), "b"), (Some(2023), "c")];
        let picked = latest(&rows, |row| row.0).expect("row picked");
        assert_eq!(picked.1, "b");

        let undated = [(None::<u16>, "first"), (None, "second")];
        assert_eq!(latest(&undated, |row| row.0).expect("row").1, "first");

        let empty: [(Option<u16>, &str); 0] = [];
        assert!(latest(&empty, |row| row.0).is_none());
    }
}
