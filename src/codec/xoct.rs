//
// xoct.rs
// Oct-Convert-rs
//
// xoct container: a versioned JSON envelope around the full scan hierarchy, pixels included.
//

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};
use crate::models::ScanRecord;

pub const VERSION: u32 = 1;

/// Text every pretty-printed xoct file carries near its start; used by the content sniffer.
pub const FORMAT_MARKER: &str = "\"format\": \"xoct\"";

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format: &'static str,
    version: u32,
    scan: &'a ScanRecord,
}

#[derive(Deserialize)]
struct Envelope {
    format: String,
    version: u32,
    scan: ScanRecord,
}

pub fn encode(record: &ScanRecord) -> Result<Vec<u8>> {
    let envelope = EnvelopeRef {
        format: "xoct",
        version: VERSION,
        scan: record,
    };
    Ok(serde_json::to_vec_pretty(&envelope)?)
}

pub fn decode(bytes: &[u8]) -> Result<ScanRecord> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    check_envelope(envelope)
}

pub fn read(path: &Path) -> Result<ScanRecord> {
    decode(&fs::read(path)?)
}

fn check_envelope(envelope: Envelope) -> Result<ScanRecord> {
    if envelope.format != "xoct" {
        return Err(CodecError::Malformed(format!(
            "expected xoct document, found {:?}",
            envelope.format
        )));
    }
    if envelope.version > VERSION {
        return Err(CodecError::Malformed(format!(
            "xoct version {} is newer than supported version {}",
            envelope.version, VERSION
        )));
    }
    check_bscans(&envelope.scan)?;
    Ok(envelope.scan)
}

fn check_bscans(record: &ScanRecord) -> Result<()> {
    let series = record
        .patients
        .values()
        .flat_map(|p| p.studies.values())
        .flat_map(|s| s.series.values());
    for bscan in series.flat_map(|s| s.bscans.iter()) {
        if !bscan.is_consistent() {
            return Err(CodecError::Malformed(format!(
                "B-scan {}x{} holds {} bytes",
                bscan.width,
                bscan.height,
                bscan.pixels.len()
            )));
        }
    }
    Ok(())
}
