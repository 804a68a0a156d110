use crate::error::{CodecError, Result};
use crate::metadata::first_path;
use crate::models::ScanRecord;

/// Raw 8-bit volume of the first series: B-scans back to back, no header.
///
/// The format has no room for metadata, so other series are dropped and the
/// file cannot be read back.
pub fn encode(record: &ScanRecord) -> Result<Vec<u8>> {
    let Some((_, series)) = first_path(record).series else {
        return Err(CodecError::NothingToWrite("scan has no series".into()));
    };
    let Some(first) = series.bscans.first() else {
        return Err(CodecError::NothingToWrite("series has no B-scans".into()));
    };

    // Validate everything before reserving memory; declared sizes are not trusted.
    let (width, height) = (first.width, first.height);
    for (index, bscan) in series.bscans.iter().enumerate() {
        if bscan.width != width || bscan.height != height {
            return Err(CodecError::Malformed(format!(
                "B-scan {} is {}x{}, volume is {}x{}",
                index, bscan.width, bscan.height, width, height
            )));
        }
        if !bscan.is_consistent() {
            return Err(CodecError::Malformed(format!(
                "B-scan {} is {}x{} but holds {} bytes",
                index,
                bscan.width,
                bscan.height,
                bscan.pixels.len()
            )));
        }
    }

    let total = series.bscans.iter().map(|b| b.pixels.len()).sum();
    let mut volume = Vec::with_capacity(total);
    for bscan in &series.bscans {
        volume.extend_from_slice(&bscan.pixels);
    }

    Ok(volume)
}
