//
// metadata.rs
// Oct-Convert-rs
//
// Read-only traversal of a scan's hierarchy, picking the first patient, study and series in insertion order.
//

use crate::models::{Patient, ScanRecord, Series, Study};

/// First patient of the scan, if any.
pub fn first_patient(record: &ScanRecord) -> Option<&Patient> {
    record.patients.values().next()
}

/// First study of a patient together with its id.
pub fn first_study(patient: &Patient) -> Option<(i32, &Study)> {
    patient.studies.iter().next().map(|(id, study)| (*id, study))
}

/// First series of a study together with its id.
pub fn first_series(study: &Study) -> Option<(i32, &Series)> {
    study.series.iter().next().map(|(id, series)| (*id, series))
}

/// Follows the first path through the hierarchy as far as it goes.
#[derive(Debug, Clone, Copy)]
pub struct FirstPath<'a> {
    pub patient: Option<&'a Patient>,
    pub study: Option<(i32, &'a Study)>,
    pub series: Option<(i32, &'a Series)>,
}

pub fn first_path(record: &ScanRecord) -> FirstPath<'_> {
    let patient = first_patient(record);
    let study = patient.and_then(first_study);
    let series = study.and_then(|(_, s)| first_series(s));

    FirstPath {
        patient,
        study,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_has_no_path() {
        let record = ScanRecord::default();
        let path = first_path(&record);
        assert!(path.patient.is_none());
        assert!(path.study.is_none());
        assert!(path.series.is_none());
    }

    #[test]
    fn path_stops_at_missing_level() {
        let mut record = ScanRecord::default();
        record.patient_mut(0).study_mut(4);

        let path = first_path(&record);
        assert!(path.patient.is_some());
        assert_eq!(path.study.map(|(id, _)| id), Some(4));
        assert!(path.series.is_none());
    }

    #[test]
    fn first_means_inserted_first() {
        let mut record = ScanRecord::default();
        let patient = record.patient_mut(7);
        patient.id = "A".into();
        let study = patient.study_mut(12);
        study.series_mut(30);
        study.series_mut(1);
        record.patient_mut(0).id = "B".into();

        let path = first_path(&record);
        assert_eq!(path.patient.map(|p| p.id.as_str()), Some("A"));
        assert_eq!(path.study.map(|(id, _)| id), Some(12));
        assert_eq!(path.series.map(|(id, _)| id), Some(30));
    }
}
