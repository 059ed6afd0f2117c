use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::lenient;

/// Unique Reference Number identifying a school.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn(pub String);

impl Urn {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// UK nation whose rules decide which metrics feed a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    England,
    Scotland,
    Other,
}

impl Jurisdiction {
    /// Policy applied when the registry gives no usable country.
    pub const FALLBACK: Self = Self::England;

    /// Resolves the registry's country text, honoring the legacy Scotland flag.
    ///
    /// Wales and Northern Ireland map to [`Jurisdiction::Other`]. A missing or
    /// unrecognised country resolves to [`Jurisdiction::FALLBACK`].
    pub fn resolve(country: Option<&str>, is_scotland: bool) -> Self {
        if is_scotland {
            return Self::Scotland;
        }

        let Some(country) = country.map(str::trim).filter(|value| !value.is_empty()) else {
            tracing::debug!("no country on registry row, using fallback jurisdiction");
            return Self::FALLBACK;
        };

        match country.to_ascii_lowercase().as_str() {
            "england" | "eng" | "e92000001" => Self::England,
            "scotland" | "sco" | "s92000003" => Self::Scotland,
            "wales" | "cymru" | "northern ireland" | "ni" => Self::Other,
            other => {
                tracing::debug!(country = other, "unrecognised country, using fallback jurisdiction");
                Self::FALLBACK
            }
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::England => "England",
            Self::Scotland => "Scotland",
            Self::Other => "Other UK",
        }
    }
}

/// Ofsted overall-effectiveness grade, 1 (Outstanding) to 4 (Inadequate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub struct OfstedBand(u8);

impl OfstedBand {
    pub const OUTSTANDING: Self = Self(1);
    pub const GOOD: Self = Self(2);
    pub const REQUIRES_IMPROVEMENT: Self = Self(3);
    pub const INADEQUATE: Self = Self(4);

    pub const fn new(value: u8) -> Option<Self> {
        match value {
            1..=4 => Some(Self(value)),
            _ => None,
        }
    }

    pub const fn ordered() -> [Self; 4] {
        [
            Self::OUTSTANDING,
            Self::GOOD,
            Self::REQUIRES_IMPROVEMENT,
            Self::INADEQUATE,
        ]
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "Outstanding",
            2 => "Good",
            3 => "Requires improvement",
            _ => "Inadequate",
        }
    }
}

impl From<OfstedBand> for u8 {
    fn from(value: OfstedBand) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for OfstedBand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::new(value).ok_or_else(|| {
            serde::de::Error::custom(format!("ofsted band must be 1-4, got {value}"))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    English,
    Maths,
    Science,
}

impl Subject {
    pub const fn ordered() -> [Self; 3] {
        [Self::English, Self::Maths, Self::Science]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Maths => "Maths",
            Self::Science => "Science",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparatorScope {
    LocalAuthority,
    National,
}

impl ComparatorScope {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LocalAuthority => "local authority average",
            Self::National => "national average",
        }
    }
}

/// Reference figure shown next to a school's own value. Never scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparator {
    pub value: f64,
    pub scope: ComparatorScope,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub school_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<Comparator>,
}

impl SubjectScore {
    pub fn new(school_pct: f64) -> Self {
        Self {
            school_pct,
            comparator: None,
        }
    }

    pub fn with_comparator(mut self, value: f64, scope: ComparatorScope) -> Self {
        self.comparator = Some(Comparator { value, scope });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcademicMetrics {
    #[serde(default, deserialize_with = "lenient::subject")]
    pub english: Option<SubjectScore>,
    #[serde(default, deserialize_with = "lenient::subject")]
    pub maths: Option<SubjectScore>,
    #[serde(default, deserialize_with = "lenient::subject")]
    pub science: Option<SubjectScore>,
}

impl AcademicMetrics {
    pub fn get(&self, subject: Subject) -> Option<&SubjectScore> {
        match subject {
            Subject::English => self.english.as_ref(),
            Subject::Maths => self.maths.as_ref(),
            Subject::Science => self.science.as_ref(),
        }
    }

    /// Present subjects in display order, skipping science unless asked for.
    pub fn present(&self, include_science: bool) -> Vec<(Subject, SubjectScore)> {
        Subject::ordered()
            .into_iter()
            .filter(|subject| include_science || *subject != Subject::Science)
            .filter_map(|subject| self.get(subject).map(|score| (subject, *score)))
            .filter(|(_, score)| super::normalizer::is_valid_percentage(score.school_pct))
            .collect()
    }

    /// Simple mean of the present subject percentages.
    pub fn average_pct(&self, include_science: bool) -> Option<f64> {
        let present = self.present(include_science);
        if present.is_empty() {
            return None;
        }
        let total: f64 = present.iter().map(|(_, score)| score.school_pct).sum();
        Some(total / present.len() as f64)
    }
}

/// Canonical per-school metrics with explicit absence for every source field.
///
/// Deserializing never fails on a malformed metric; the metric is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolMetrics {
    pub urn: Urn,
    pub jurisdiction: Jurisdiction,
    #[serde(default, deserialize_with = "lenient::band")]
    pub ofsted_band: Option<OfstedBand>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub ofsted_inspection_date: Option<NaiveDate>,
    #[serde(default)]
    pub academic: AcademicMetrics,
    #[serde(default, deserialize_with = "lenient::percentage")]
    pub attendance_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::comparator")]
    pub attendance_comparator: Option<Comparator>,
    #[serde(default, deserialize_with = "lenient::percentage")]
    pub fsm_percentage: Option<f64>,
}

impl SchoolMetrics {
    /// Metrics with every optional field absent.
    pub fn empty(urn: Urn, jurisdiction: Jurisdiction) -> Self {
        Self {
            urn,
            jurisdiction,
            ofsted_band: None,
            ofsted_inspection_date: None,
            academic: AcademicMetrics::default(),
            attendance_rate: None,
            attendance_comparator: None,
            fsm_percentage: None,
        }
    }
}
