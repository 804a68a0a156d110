//
// convert.rs
// Oct-Convert-rs
//
// Converts a single scan file: read, name, resolve destination, refuse conflicts, anonymize, write.
//

use std::path::{Path, PathBuf};

use tracing::info;

use crate::anonymize::anonymize;
use crate::codec::ScanCodec;
use crate::error::ConvertError;
use crate::naming::derive_base_name;
use crate::options::Options;

/// Destination for `source` given its derived base name: `<dir>/<base><ext>`.
pub fn destination_path(source: &Path, base_name: &str, opt: &Options) -> PathBuf {
    let dir = match &opt.output_path {
        Some(dir) => dir.as_path(),
        None => source.parent().unwrap_or_else(|| Path::new("")),
    };
    dir.join(format!("{}{}", base_name, opt.output_format.extension()))
}

/// Converts one file and returns the written destination.
///
/// An existing destination is never touched; the file is skipped with
/// [`ConvertError::DestinationConflict`].
pub fn convert_file<C: ScanCodec>(
    codec: &C,
    path: &Path,
    opt: &Options,
) -> Result<PathBuf, ConvertError> {
    let mut record = codec
        .read(path, &opt.read)
        .map_err(|source| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let base_name = derive_base_name(&record, path, opt);
    let destination = destination_path(path, &base_name, opt);

    if destination.exists() {
        return Err(ConvertError::DestinationConflict(destination));
    }

    info!("target file: {}", destination.display());

    if opt.anonymising {
        anonymize(&mut record);
    }

    codec
        .write(&destination, &record, opt.output_format, &opt.write)
        .map_err(|source| ConvertError::Write {
            path: destination.clone(),
            source,
        })?;

    Ok(destination)
}
