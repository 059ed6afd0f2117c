use super::common::*;
use crate::ratings::domain::{ComparatorScope, Jurisdiction, OfstedBand};
use crate::ratings::{normalize, rate_school, ComponentKind};

#[test]
fn normalizer_picks_the_latest_row_from_each_source() {
    let mut rows = rows(registry("100010", Some("England")));
    rows.ofsted = vec![
        inspection("100010", "3", "2016-03-01"),
        inspection("100010", "Good", "2022-11-15"),
    ];
    rows.attendance = vec![
        attendance("100010", "2021/22", "8.0"),
        attendance("100010", "2022/23", "5.0"),
    ];
    rows.census = vec![census("100010", "2023/24", "18.2%")];
    rows.attainment = vec![
        attainment("100010", "2022-23", "70", "74", "66"),
        attainment("100010", "2018-19", "10", "10", "10"),
    ];

    let metrics = normalize(&rows);

    assert_eq!(metrics.jurisdiction, Jurisdiction::England);
    assert_eq!(metrics.ofsted_band, Some(OfstedBand::GOOD));
    assert_eq!(
        metrics.ofsted_inspection_date.map(|date| date.to_string()),
        Some("2022-11-15".to_string())
    );
    assert_eq!(metrics.attendance_rate, Some(95.0));
    assert_eq!(metrics.fsm_percentage, Some(18.2));

    let english = metrics.academic.english.expect("english present");
    assert_eq!(english.school_pct, 70.0);
    let comparator = english.comparator.expect("national comparator");
    assert_eq!(comparator.scope, ComparatorScope::National);
    let maths = metrics.academic.maths.expect("maths present");
    assert_eq!(
        maths.comparator.map(|c| c.scope),
        Some(ComparatorScope::LocalAuthority)
    );
    assert_eq!(metrics.academic.science.map(|s| s.school_pct), Some(66.0));

    let attendance_comparator = metrics.attendance_comparator.expect("comparator present");
    assert_eq!(attendance_comparator.scope, ComparatorScope::LocalAuthority);
    assert!((attendance_comparator.value - 93.9).abs() < 1e-9);
}

#[test]
fn malformed_fields_are_absent_not_zero() {
    let mut rows = rows(registry("100011", Some("England")));
    rows.ofsted = vec![inspection("100011", "Not judged", "2023-01-10")];
    rows.attendance = vec![attendance("100011", "2022/23", "n/a")];
    rows.attainment = vec![attainment("100011", "2022/23", "SUPP", "x", "")];

    let metrics = normalize(&rows);

    assert!(metrics.ofsted_band.is_none());
    assert!(metrics.ofsted_inspection_date.is_none());
    assert!(metrics.attendance_rate.is_none());
    assert!(metrics.academic.english.is_none());
    assert!(metrics.academic.maths.is_none());
    assert!(metrics.academic.science.is_none());
    assert!(metrics.fsm_percentage.is_none());

    let rating = rate_school(&metrics);
    assert_eq!(rating.completeness, 0);
}

#[test]
fn scottish_rows_drop_science_and_never_rate_ofsted() {
    let mut registry = registry("5012347", Some("England"));
    registry.is_scotland = text("true");
    let mut rows = rows(registry);
    rows.ofsted = vec![inspection("5012347", "1", "2021-05-05")];
    rows.attainment = vec![attainment("5012347", "2023", "80", "60", "99")];
    rows.attendance = vec![attendance("5012347", "2023", "6")];

    let metrics = normalize(&rows);
    assert_eq!(metrics.jurisdiction, Jurisdiction::Scotland);
    assert!(metrics.academic.science.is_none());
    assert!(metrics.ofsted_band.is_none());

    let rating = rate_school(&metrics);
    assert!(rating.component(ComponentKind::Ofsted).is_none());
    assert_eq!(rating.completeness, 100);
}

#[test]
fn registry_without_country_falls_back_to_england() {
    let mut rows = rows(registry("100012", None));
    rows.ofsted = vec![inspection("100012", "2", "2020-02-02")];

    let metrics = normalize(&rows);

    assert_eq!(metrics.jurisdiction, Jurisdiction::FALLBACK);
    assert_eq!(metrics.ofsted_band, Some(OfstedBand::GOOD));
}
