use std::collections::HashMap;
use std::sync::RwLock;

use super::record::{SchoolProfile, SchoolRecord, StoredRating};
use super::{LocationSearch, SchoolDirectory};
use crate::datasets::DatasetBundle;
use crate::ratings::{normalize, Urn};
use crate::refresh::{RatingStatus, RatingStore, StoreError};
use crate::sources::{
    AttainmentRow, AttendanceRow, CensusRow, LookupError, OfstedInspectionRow, RegistryRow,
    SchoolSource, SourceRows,
};

/// Source tables indexed by URN plus the rating fields written by refreshes.
pub struct InMemoryDirectory {
    registry: Vec<RegistryRow>,
    index: HashMap<Urn, usize>,
    ofsted: HashMap<Urn, Vec<OfstedInspectionRow>>,
    census: HashMap<Urn, Vec<CensusRow>>,
    attendance: HashMap<Urn, Vec<AttendanceRow>>,
    attainment: HashMap<Urn, Vec<AttainmentRow>>,
    ratings: RwLock<HashMap<Urn, StoredRating>>,
}

impl InMemoryDirectory {
    /// Indexes a bundle. A URN listed twice in the registry keeps its first row.
    pub fn new(bundle: DatasetBundle) -> Self {
        let mut registry = Vec::with_capacity(bundle.registry.len());
        let mut index = HashMap::new();
        for row in bundle.registry {
            let urn = Urn::new(row.urn.as_str());
            if urn.as_str().is_empty() || index.contains_key(&urn) {
                continue;
            }
            index.insert(urn, registry.len());
            registry.push(row);
        }

        Self {
            registry,
            index,
            ofsted: group_by_urn(bundle.ofsted, |row| &row.urn),
            census: group_by_urn(bundle.census, |row| &row.urn),
            attendance: group_by_urn(bundle.attendance, |row| &row.urn),
            attainment: group_by_urn(bundle.attainment, |row| &row.urn),
            ratings: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Full record for one school with its last committed rating, if any.
    pub fn record(&self, urn: &Urn) -> Result<Option<SchoolRecord>, LookupError> {
        match self.index.get(urn) {
            Some(position) => self.build_record(&self.registry[*position]).map(Some),
            None => Ok(None),
        }
    }

    fn build_record(&self, row: &RegistryRow) -> Result<SchoolRecord, LookupError> {
        let profile = SchoolProfile::from_registry(row);
        let rows = SourceRows {
            registry: row.clone(),
            ofsted: rows_for(&self.ofsted, &profile.urn),
            census: rows_for(&self.census, &profile.urn),
            attendance: rows_for(&self.attendance, &profile.urn),
            attainment: rows_for(&self.attainment, &profile.urn),
        };
        let metrics = normalize(&rows);
        let rating = self
            .ratings
            .read()
            .map_err(|_| LookupError::Unavailable("rating lock poisoned".to_string()))?
            .get(&profile.urn)
            .cloned();

        Ok(SchoolRecord {
            profile,
            metrics,
            rating,
        })
    }
}

fn group_by_urn<T, F>(rows: Vec<T>, urn: F) -> HashMap<Urn, Vec<T>>
where
    F: Fn(&T) -> &String,
{
    let mut grouped: HashMap<Urn, Vec<T>> = HashMap::new();
    for row in rows {
        let key = Urn::new(urn(&row).as_str());
        grouped.entry(key).or_default().push(row);
    }
    grouped
}

fn rows_for<T: Clone>(table: &HashMap<Urn, Vec<T>>, urn: &Urn) -> Vec<T> {
    table.get(urn).cloned().unwrap_or_default()
}

impl SchoolSource for InMemoryDirectory {
    fn registry(&self, urn: &Urn) -> Result<Option<RegistryRow>, LookupError> {
        Ok(self
            .index
            .get(urn)
            .map(|position| self.registry[*position].clone()))
    }

    fn ofsted_inspections(&self, urn: &Urn) -> Result<Vec<OfstedInspectionRow>, LookupError> {
        Ok(rows_for(&self.ofsted, urn))
    }

    fn census(&self, urn: &Urn) -> Result<Vec<CensusRow>, LookupError> {
        Ok(rows_for(&self.census, urn))
    }

    fn attendance(&self, urn: &Urn) -> Result<Vec<AttendanceRow>, LookupError> {
        Ok(rows_for(&self.attendance, urn))
    }

    fn attainment(&self, urn: &Urn) -> Result<Vec<AttainmentRow>, LookupError> {
        Ok(rows_for(&self.attainment, urn))
    }
}

impl RatingStore for InMemoryDirectory {
    fn rating_status(&self) -> Result<Vec<RatingStatus>, StoreError> {
        let ratings = self
            .ratings
            .read()
            .map_err(|_| StoreError::Unavailable("rating lock poisoned".to_string()))?;

        Ok(self
            .registry
            .iter()
            .map(|row| {
                let urn = Urn::new(row.urn.as_str());
                let rated_at = ratings.get(&urn).map(|rating| rating.rated_at);
                RatingStatus { urn, rated_at }
            })
            .collect())
    }

    fn save_rating(&self, urn: &Urn, rating: StoredRating) -> Result<(), StoreError> {
        if !self.index.contains_key(urn) {
            return Err(StoreError::NotFound(urn.clone()));
        }
        let mut ratings = self
            .ratings
            .write()
            .map_err(|_| StoreError::Unavailable("rating lock poisoned".to_string()))?;
        ratings.insert(urn.clone(), rating);
        Ok(())
    }
}

impl LocationSearch for InMemoryDirectory {
    fn schools_in_area(&self, area: &str) -> Result<Vec<SchoolRecord>, LookupError> {
        self.registry
            .iter()
            .filter(|row| SchoolProfile::from_registry(row).in_area(area))
            .map(|row| self.build_record(row))
            .collect()
    }
}

impl SchoolDirectory for InMemoryDirectory {
    fn school(&self, urn: &Urn) -> Result<Option<SchoolRecord>, LookupError> {
        self.record(urn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratings::rate_school;
    use chrono::{TimeZone, Utc};

    fn registry(urn: &str, name: &str, town: &str) -> RegistryRow {
        RegistryRow {
            urn: urn.to_string(),
            name: name.to_string(),
            country: Some("England".to_string()),
            town: Some(town.to_string()),
            ..RegistryRow::default()
        }
    }

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new(DatasetBundle {
            registry: vec![
                registry("1", "Leeds One", "Leeds"),
                registry("2", "York One", "York"),
                registry("1", "Duplicate", "Leeds"),
                registry("3", "Leeds Two", "Leeds"),
            ],
            ofsted: vec![OfstedInspectionRow {
                urn: "1".to_string(),
                overall_effectiveness: Some("1".to_string()),
                inspection_date: Some("2022-01-01".to_string()),
            }],
            ..DatasetBundle::default()
        })
    }

    #[test]
    fn duplicate_registry_rows_keep_the_first() {
        let directory = directory();
        assert_eq!(directory.len(), 3);
        let record = directory
            .record(&Urn::new("1"))
            .expect("lookup ok")
            .expect("school present");
        assert_eq!(record.profile.name, "Leeds One");
        assert!(record.metrics.ofsted_band.is_some());
        assert!(record.rating.is_none());
    }

    #[test]
    fn area_search_keeps_store_order() {
        let directory = directory();
        let schools = directory.schools_in_area("LEEDS").expect("search ok");
        let urns: Vec<&str> = schools.iter().map(|s| s.profile.urn.as_str()).collect();
        assert_eq!(urns, vec!["1", "3"]);
    }

    #[test]
    fn saved_ratings_show_up_in_status_and_records() {
        let directory = directory();
        let urn = Urn::new("3");
        let record = directory.record(&urn).expect("lookup").expect("present");
        let rated_at = Utc.with_ymd_and_hms(2026, 10, 1, 3, 0, 0).unwrap();
        directory
            .save_rating(&urn, StoredRating::from_rating(rate_school(&record.metrics), rated_at))
            .expect("save ok");

        let status = directory.rating_status().expect("status ok");
        assert_eq!(status.len(), 3);
        assert_eq!(
            status.iter().find(|entry| entry.urn == urn).and_then(|e| e.rated_at),
            Some(rated_at)
        );
        assert!(directory
            .record(&urn)
            .expect("lookup")
            .expect("present")
            .rating
            .is_some());

        let missing = directory.save_rating(
            &Urn::new("404"),
            StoredRating::from_rating(rate_school(&record.metrics), rated_at),
        );
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }
}
