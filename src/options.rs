use std::path::PathBuf;

use crate::format::OutputFormat;

/// Run-wide configuration, built once from the CLI and shared read-only by every conversion.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub output_format: OutputFormat,
    pub add_old_filename: bool,
    pub anonymising: bool,
    /// When unset, destinations go next to their source file.
    pub output_path: Option<PathBuf>,
    pub read: ReadOptions,
    pub write: WriteOptions,
}

#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Replace pixels of value 0 (outside the scanned area) with 255.
    pub fill_empty_pixel_white: bool,
}

#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Store octbin B-scans as one contiguous block instead of length-prefixed chunks.
    pub octbin_flat: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { octbin_flat: true }
    }
}
