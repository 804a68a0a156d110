//
// format.rs
// Oct-Convert-rs
//
// Output formats supported by the converter and their fixed file extensions.
//

use std::fmt;
use std::path::Path;

use clap::ValueEnum;

/// Target encodings, each with a distinct extension.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Xoct,
    Octbin,
    Img,
}

impl OutputFormat {
    /// Dot-prefixed extension appended to derived filenames.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xoct => ".xoct",
            OutputFormat::Octbin => ".octbin",
            OutputFormat::Img => ".img",
        }
    }

    /// True when `path` already carries this format's extension (case-sensitive).
    pub fn matches_extension(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| self.extension()[1..] == *ext)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension()[1..])
    }
}
