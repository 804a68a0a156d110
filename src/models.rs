//
// models.rs
// Oct-Convert-rs
//
// Defines the in-memory scan hierarchy (scan -> patient -> study -> series -> B-scan) shared by codecs and the pipeline.
//

use std::fmt;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One loaded scan file. Patients keep insertion order, so "first patient" is well defined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub patients: IndexMap<u32, Patient>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// May be empty; naming then falls back to "unknown".
    pub id: String,
    pub surname: String,
    pub forename: String,
    pub title: String,
    pub sex: String,
    pub birthdate: Date,
    pub studies: IndexMap<i32, Study>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Study {
    pub uid: String,
    pub date: Date,
    pub series: IndexMap<i32, Series>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub uid: String,
    pub laterality: Laterality,
    pub bscans: Vec<BScan>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Laterality {
    Left,
    Right,
    #[default]
    Unknown,
}

impl Laterality {
    /// Maps the DICOM code string (`L`/`R`) to a laterality.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "L" | "OS" => Laterality::Left,
            "R" | "OD" => Laterality::Right,
            _ => Laterality::Unknown,
        }
    }
}

/// Single 2D slice, row-major 8-bit grayscale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BScan {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl BScan {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// `width * height`, saturating instead of overflowing on bogus dimensions.
    pub fn expected_len(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.expected_len()
    }
}

/// Calendar date that may be absent. Empty is distinct from any concrete date.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(Option<NaiveDate>);

impl Date {
    pub fn empty() -> Self {
        Date(None)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|d| Date(Some(d)))
    }

    /// Parses a DICOM `DA` value (`YYYYMMDD`). Blank or malformed input yields an empty date.
    pub fn parse_dicom(value: &str) -> Self {
        Date(NaiveDate::parse_from_str(value.trim(), "%Y%m%d").ok())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<NaiveDate> {
        self.0
    }

    /// Sets day and month to 1, keeping the year. An empty date stays empty.
    pub fn coarsen_to_year(&mut self) {
        if let Some(date) = self.0 {
            self.0 = NaiveDate::from_ymd_opt(date.year(), 1, 1);
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            None => Ok(()),
        }
    }
}

impl ScanRecord {
    /// Returns the patient stored under `key`, inserting an empty one at the end if absent.
    pub fn patient_mut(&mut self, key: u32) -> &mut Patient {
        self.patients.entry(key).or_default()
    }

    pub fn bscan_count(&self) -> usize {
        self.patients
            .values()
            .flat_map(|p| p.studies.values())
            .flat_map(|s| s.series.values())
            .map(|s| s.bscans.len())
            .sum()
    }
}

impl Patient {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn study_mut(&mut self, study_id: i32) -> &mut Study {
        self.studies.entry(study_id).or_default()
    }
}

impl Study {
    pub fn series_mut(&mut self, series_id: i32) -> &mut Series {
        self.series.entry(series_id).or_default()
    }
}
