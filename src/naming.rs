//
// naming.rs
// Oct-Convert-rs
//
// Derives the canonical destination base name from the first patient/study/series of a scan.
//

use std::path::Path;

use crate::metadata::{first_patient, first_series, first_study};
use crate::models::ScanRecord;
use crate::options::Options;

const UNKNOWN_PATIENT: &str = "unknown";

/// Builds `<patientId|unknown>_<studyId>_<seriesId>[_<oldStem>]`, falling back to the
/// source stem when the scan has no patient or the patient has no study.
///
/// Only the first entry at each level (insertion order) takes part in the name.
pub fn derive_base_name(record: &ScanRecord, source: &Path, opt: &Options) -> String {
    let old_stem = source_stem(source);

    let Some(patient) = first_patient(record) else {
        return old_stem;
    };
    let Some((study_id, study)) = first_study(patient) else {
        return old_stem;
    };

    let mut name = if patient.id.is_empty() {
        UNKNOWN_PATIENT.to_string()
    } else {
        sanitize_component(&patient.id)
    };

    let Some((series_id, _)) = first_series(study) else {
        return name;
    };

    name.push_str(&format!("_{}_{}", study_id, series_id));
    if opt.add_old_filename {
        name.push('_');
        name.push_str(&old_stem);
    }

    name
}

fn source_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn sanitize_component(input: &str) -> String {
    // Keep ids verbatim except for separators that would escape the destination directory.
    input
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}
