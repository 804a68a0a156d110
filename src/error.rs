use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a scan codec while reading or writing a file.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DICOM error: {0}")]
    Dicom(String),

    #[error("Unsupported scan format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Malformed scan file: {0}")]
    Malformed(String),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Nothing to write: {0}")]
    NothingToWrite(String),
}

/// Per-file conversion failures. None of these abort a batch.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("target file exists: {}", .0.display())]
    DestinationConflict(PathBuf),

    #[error("write file {} not successful: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("cannot walk directory entry: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
