//! Raw source rows and the read-only lookups that supply them.
//!
//! Every numeric column is kept as text here. Parsing and range checks happen
//! in the metric normalizer so that malformed upstream values become absent
//! metrics instead of load failures.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::ratings::Urn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryRow {
    pub urn: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub is_scotland: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phase: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub school_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub type_group: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub local_authority: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub town: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub postcode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfstedInspectionRow {
    pub urn: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub overall_effectiveness: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub inspection_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CensusRow {
    pub urn: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub number_on_roll: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub fsm_pct: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub eal_pct: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sen_pct: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRow {
    pub urn: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub overall_absence_rate: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub la_absence_rate: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub national_absence_rate: Option<String>,
}

/// National-curriculum test results, one row per school and academic year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttainmentRow {
    pub urn: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub english_pct: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub english_la_pct: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub english_national_pct: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub maths_pct: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub maths_la_pct: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub maths_national_pct: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub science_pct: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub science_la_pct: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub science_national_pct: Option<String>,
}

/// Read-only lookups keyed by URN. History lookups return every row held for
/// the school in store order; the normalizer picks the latest.
pub trait SchoolSource: Send + Sync {
    fn registry(&self, urn: &Urn) -> Result<Option<RegistryRow>, LookupError>;
    fn ofsted_inspections(&self, urn: &Urn) -> Result<Vec<OfstedInspectionRow>, LookupError>;
    fn census(&self, urn: &Urn) -> Result<Vec<CensusRow>, LookupError>;
    fn attendance(&self, urn: &Urn) -> Result<Vec<AttendanceRow>, LookupError>;
    fn attainment(&self, urn: &Urn) -> Result<Vec<AttainmentRow>, LookupError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Every source row held for one school.
#[derive(Debug, Clone, Default)]
pub struct SourceRows {
    pub registry: RegistryRow,
    pub ofsted: Vec<OfstedInspectionRow>,
    pub census: Vec<CensusRow>,
    pub attendance: Vec<AttendanceRow>,
    pub attainment: Vec<AttainmentRow>,
}

impl SourceRows {
    /// Collects the rows for `urn`, returning `None` when the registry does
    /// not know the school.
    ///
    /// Only a registry failure is an error. A failing metric lookup leaves
    /// that metric absent.
    pub fn gather<S>(source: &S, urn: &Urn) -> Result<Option<Self>, LookupError>
    where
        S: SchoolSource + ?Sized,
    {
        let Some(registry) = source.registry(urn)? else {
            return Ok(None);
        };

        Ok(Some(Self {
            registry,
            ofsted: or_absent(urn, "ofsted", source.ofsted_inspections(urn)),
            census: or_absent(urn, "census", source.census(urn)),
            attendance: or_absent(urn, "attendance", source.attendance(urn)),
            attainment: or_absent(urn, "attainment", source.attainment(urn)),
        }))
    }
}

fn or_absent<T>(urn: &Urn, dataset: &'static str, result: Result<Vec<T>, LookupError>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        warn!(%urn, dataset, error = %err, "lookup failed, treating metric as absent");
        Vec::new()
    })
}

pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
