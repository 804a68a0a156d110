//
// codec.rs
// Oct-Convert-rs
//
// Codec boundary: the capability the pipeline needs (read, write, loadability check) and the file-backed implementation.
//

pub mod dcm;
pub mod img;
pub mod octbin;
pub mod xoct;

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{CodecError, Result};
use crate::format::OutputFormat;
use crate::models::ScanRecord;
use crate::options::{ReadOptions, WriteOptions};

/// Reads and writes scans. The conversion pipeline only talks to this trait.
pub trait ScanCodec {
    fn read(&self, path: &Path, options: &ReadOptions) -> Result<ScanRecord>;

    /// Must not overwrite an existing file and must not create parent directories.
    fn write(
        &self,
        path: &Path,
        record: &ScanRecord,
        format: OutputFormat,
        options: &WriteOptions,
    ) -> Result<()>;

    /// Cheap compatibility check, no full parse.
    fn is_loadable(&self, path: &Path) -> bool;
}

/// Formats the file codec can read, recognised by content.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputFormat {
    Dicom,
    Xoct,
    Octbin,
}

const SNIFF_LEN: usize = 132;

impl InputFormat {
    /// Inspects the first bytes of a file.
    pub fn detect(path: &Path) -> Option<Self> {
        let mut head = Vec::with_capacity(SNIFF_LEN);
        let file = File::open(path).ok()?;
        file.take(SNIFF_LEN as u64).read_to_end(&mut head).ok()?;
        Self::from_header(&head)
    }

    pub fn from_header(head: &[u8]) -> Option<Self> {
        if head.starts_with(octbin::MAGIC) {
            return Some(InputFormat::Octbin);
        }
        if head.len() >= SNIFF_LEN && &head[128..SNIFF_LEN] == b"DICM" {
            return Some(InputFormat::Dicom);
        }
        let opens_object = head.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{');
        if opens_object && String::from_utf8_lossy(head).contains(xoct::FORMAT_MARKER) {
            return Some(InputFormat::Xoct);
        }
        None
    }
}

/// File-backed codec: DICOM, xoct and octbin in; xoct, octbin and img out.
#[derive(Debug, Default, Clone, Copy)]
pub struct OctFileCodec;

impl ScanCodec for OctFileCodec {
    fn read(&self, path: &Path, options: &ReadOptions) -> Result<ScanRecord> {
        let format = InputFormat::detect(path)
            .ok_or_else(|| CodecError::UnsupportedFormat(path.to_path_buf()))?;
        debug!("Reading {} as {:?}", path.display(), format);

        match format {
            InputFormat::Dicom => dcm::read(path, options),
            InputFormat::Xoct => xoct::read(path),
            InputFormat::Octbin => octbin::read(path),
        }
    }

    fn write(
        &self,
        path: &Path,
        record: &ScanRecord,
        format: OutputFormat,
        options: &WriteOptions,
    ) -> Result<()> {
        // Encode fully first: a failed encode leaves no file behind.
        let bytes = match format {
            OutputFormat::Xoct => xoct::encode(record)?,
            OutputFormat::Octbin => octbin::encode(record, options)?,
            OutputFormat::Img => img::encode(record)?,
        };

        let mut file = create_new(path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        Ok(())
    }

    fn is_loadable(&self, path: &Path) -> bool {
        InputFormat::detect(path).is_some()
    }
}

/// Opens `path` for writing, failing with `AlreadyExists` instead of truncating.
fn create_new(path: &Path) -> Result<File> {
    Ok(OpenOptions::new().write(true).create_new(true).open(path)?)
}
