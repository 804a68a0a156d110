//
// dcm.rs
// Oct-Convert-rs
//
// Loads ophthalmic tomography DICOM files into the scan hierarchy: one patient, study and series, one B-scan per frame.
//

use std::path::Path;

use dicom_core::Tag;
use dicom_dictionary_std::tags;
use dicom_object::{open_file, DefaultDicomObject};
use dicom_pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder, VoiLutOption};

use crate::error::{CodecError, Result};
use crate::models::{BScan, Date, Laterality, Patient, ScanRecord, Study};
use crate::options::ReadOptions;

/// Value written over empty (zero) pixels when `fill_empty_pixel_white` is set.
const WHITE: u8 = u8::MAX;

pub fn read(path: &Path, options: &ReadOptions) -> Result<ScanRecord> {
    let obj = open_file(path).map_err(|e| CodecError::Dicom(e.to_string()))?;

    let (surname, forename, title) = split_person_name(&text(&obj, tags::PATIENT_NAME).unwrap_or_default());
    let mut patient = Patient {
        id: text(&obj, tags::PATIENT_ID).unwrap_or_default(),
        surname,
        forename,
        title,
        sex: text(&obj, tags::PATIENT_SEX).unwrap_or_default(),
        birthdate: date(&obj, tags::PATIENT_BIRTH_DATE),
        ..Default::default()
    };

    let study_id = integer(&obj, tags::STUDY_ID);
    let series_id = integer(&obj, tags::SERIES_NUMBER);

    let study = patient.studies.entry(study_id).or_insert_with(|| Study {
        uid: text(&obj, tags::STUDY_INSTANCE_UID).unwrap_or_default(),
        date: date(&obj, tags::STUDY_DATE),
        ..Default::default()
    });
    let series = study.series_mut(series_id);
    series.uid = text(&obj, tags::SERIES_INSTANCE_UID).unwrap_or_default();
    series.laterality = text(&obj, tags::LATERALITY)
        .or_else(|| text(&obj, tags::IMAGE_LATERALITY))
        .map(|code| Laterality::from_code(&code))
        .unwrap_or_default();
    series.bscans = decode_bscans(&obj, options)?;

    let mut record = ScanRecord::default();
    record.patients.insert(0, patient);
    Ok(record)
}

fn decode_bscans(obj: &DefaultDicomObject, options: &ReadOptions) -> Result<Vec<BScan>> {
    if obj.element(tags::PIXEL_DATA).is_err() {
        return Ok(Vec::new());
    }

    let decoded = obj
        .decode_pixel_data()
        .map_err(|e| CodecError::Dicom(format!("failed to decode pixel data: {}", e)))?;

    // Raw stored values, squeezed into 8 bits.
    let convert_options = ConvertOptions::new()
        .with_modality_lut(ModalityLutOption::None)
        .with_voi_lut(VoiLutOption::Identity)
        .force_8bit();

    let mut bscans = Vec::with_capacity(decoded.number_of_frames() as usize);
    for frame in 0..decoded.number_of_frames() {
        let luma = decoded
            .to_dynamic_image_with_options(frame, &convert_options)
            .map_err(|e| CodecError::Dicom(format!("failed to convert frame {}: {}", frame, e)))?
            .to_luma8();
        let (width, height) = (luma.width(), luma.height());
        let mut pixels = luma.into_raw();

        if options.fill_empty_pixel_white {
            fill_empty_white(&mut pixels);
        }
        bscans.push(BScan::new(width, height, pixels));
    }

    Ok(bscans)
}

pub fn fill_empty_white(pixels: &mut [u8]) {
    for p in pixels.iter_mut().filter(|p| **p == 0) {
        *p = WHITE;
    }
}

fn text(obj: &DefaultDicomObject, tag: Tag) -> Option<String> {
    obj.element(tag)
        .ok()
        .and_then(|e| e.to_str().ok())
        .map(|s| s.trim_end_matches(['\0', ' ']).to_string())
        .filter(|s| !s.is_empty())
}

fn date(obj: &DefaultDicomObject, tag: Tag) -> Date {
    text(obj, tag)
        .map(|s| Date::parse_dicom(&s))
        .unwrap_or_default()
}

/// `StudyID` and `SeriesNumber` as integers; absent or non-numeric values become 0.
fn integer(obj: &DefaultDicomObject, tag: Tag) -> i32 {
    text(obj, tag)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Splits a DICOM person name (`Family^Given^Middle^Prefix^Suffix`) into surname, forename and title.
pub fn split_person_name(name: &str) -> (String, String, String) {
    let mut parts = name.split('^').map(str::trim);
    let surname = parts.next().unwrap_or_default().to_string();
    let forename = parts.next().unwrap_or_default().to_string();
    let title = parts.nth(1).unwrap_or_default().to_string();
    (surname, forename, title)
}
