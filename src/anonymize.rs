use crate::models::ScanRecord;

/// Strips patient names and coarsens birthdates to the year, in place.
///
/// Ids (patient, study, series) are left untouched. Running it twice changes nothing further.
pub fn anonymize(record: &mut ScanRecord) {
    for patient in record.patients.values_mut() {
        patient.surname.clear();
        patient.forename.clear();
        patient.title.clear();

        // Year survives; day and month become 1.
        patient.birthdate.coarsen_to_year();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Date, Patient};

    fn patient(birthdate: Date) -> Patient {
        Patient {
            id: "P42".into(),
            surname: "Doe".into(),
            forename: "Jane".into(),
            title: "Dr.".into(),
            sex: "F".into(),
            birthdate,
            ..Default::default()
        }
    }

    #[test]
    fn names_are_cleared_and_birthdate_keeps_year() {
        let mut record = ScanRecord::default();
        record
            .patients
            .insert(0, patient(Date::from_ymd(1980, 5, 17).unwrap()));
        record.patient_mut(0).study_mut(3).series_mut(7);

        anonymize(&mut record);

        let p = &record.patients[&0];
        assert_eq!(p.surname, "");
        assert_eq!(p.forename, "");
        assert_eq!(p.title, "");
        assert_eq!(p.birthdate, Date::from_ymd(1980, 1, 1).unwrap());
        assert_eq!(p.id, "P42");
        assert_eq!(p.sex, "F");
        assert!(p.studies[&3].series.contains_key(&7));
    }

    #[test]
    fn empty_birthdate_stays_empty() {
        let mut record = ScanRecord::default();
        record.patients.insert(0, patient(Date::empty()));

        anonymize(&mut record);

        assert!(record.patients[&0].birthdate.is_empty());
    }

    #[test]
    fn applies_to_every_patient_and_is_idempotent() {
        let mut record = ScanRecord::default();
        record
            .patients
            .insert(0, patient(Date::from_ymd(1975, 12, 31).unwrap()));
        record.patients.insert(1, patient(Date::empty()));

        anonymize(&mut record);
        let once = record.clone();
        anonymize(&mut record);

        assert_eq!(record, once);
        assert!(record.patients.values().all(|p| p.surname.is_empty()));
    }
}
