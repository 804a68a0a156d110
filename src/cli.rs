//
// cli.rs
// Oct-Convert-rs
//
// Defines the CLI surface with Clap, validates it into run Options and dispatches the batch conversion.
//

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::error;

use crate::batch;
use crate::codec::OctFileCodec;
use crate::format::OutputFormat;
use crate::logger;
use crate::options::{Options, ReadOptions, WriteOptions};

#[derive(Parser, Debug)]
#[command(name = "oct-convert", version)]
#[command(about = "Convert all files in octpath to the outputformat", long_about = None)]
pub struct Cli {
    /// One or more OCT scans or directories containing them
    #[arg(required = true, value_name = "OCTPATH")]
    pub octpath: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "outputformat", value_enum, default_value_t = OutputFormat::Xoct)]
    pub outputformat: OutputFormat,

    /// Put files in this folder
    #[arg(long = "outputPath", value_name = "DIR")]
    pub output_path: Option<PathBuf>,

    /// Add old filename at the end
    #[arg(long = "addOldFilename")]
    pub add_old_filename: bool,

    /// Strip patient name and coarsen the birthdate to the year
    #[arg(short = 'a', long = "anonymising")]
    pub anonymising: bool,

    /// Replace empty (zero) pixels of DICOM B-scans with white
    #[arg(long = "fillEmptyPixelWhite")]
    pub fill_empty_pixel_white: bool,

    /// Store octbin B-scans as length-prefixed chunks instead of one flat block
    #[arg(long = "octbinNested")]
    pub octbin_nested: bool,
}

impl Cli {
    /// Validates the parsed arguments into the run-wide options.
    pub fn options(&self) -> Result<Options> {
        if let Some(dir) = &self.output_path {
            if !dir.is_dir() {
                bail!("Output path is not a directory: {}", dir.display());
            }
        }

        Ok(Options {
            output_format: self.outputformat,
            add_old_filename: self.add_old_filename,
            anonymising: self.anonymising,
            output_path: self.output_path.clone(),
            read: ReadOptions {
                fill_empty_pixel_white: self.fill_empty_pixel_white,
            },
            write: WriteOptions {
                octbin_flat: !self.octbin_nested,
            },
        })
    }
}

/// Parses arguments and runs the conversion. Configuration errors exit with 1;
/// per-file failures are logged and do not change the exit code.
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not errors.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logger::init();

    let options = match cli.options() {
        Ok(options) => options,
        Err(e) => {
            error!("ERROR: {:#}", e);
            return ExitCode::from(1);
        }
    };

    batch::convert_paths(&OctFileCodec, &cli.octpath, &options);
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_the_original_tool() {
        let cli = Cli::try_parse_from(["oct-convert", "scan.vol"]).expect("parse");
        let opt = cli.options().expect("options");

        assert_eq!(cli.octpath, vec![PathBuf::from("scan.vol")]);
        assert_eq!(opt.output_format, OutputFormat::Xoct);
        assert!(!opt.add_old_filename);
        assert!(!opt.anonymising);
        assert!(opt.output_path.is_none());
        assert!(!opt.read.fill_empty_pixel_white);
        assert!(opt.write.octbin_flat);
    }

    #[test]
    fn all_flags_are_parsed() {
        let out = tempdir().expect("tmpdir");
        let out_arg = out.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from([
            "oct-convert",
            "a.dcm",
            "dir",
            "-f",
            "octbin",
            "--outputPath",
            out_arg.as_str(),
            "--addOldFilename",
            "-a",
            "--fillEmptyPixelWhite",
            "--octbinNested",
        ])
        .expect("parse");
        let opt = cli.options().expect("options");

        assert_eq!(cli.octpath.len(), 2);
        assert_eq!(opt.output_format, OutputFormat::Octbin);
        assert_eq!(opt.output_path.as_deref(), Some(out.path()));
        assert!(opt.add_old_filename);
        assert!(opt.anonymising);
        assert!(opt.read.fill_empty_pixel_white);
        assert!(!opt.write.octbin_flat);
    }

    #[test]
    fn configuration_errors_are_rejected_up_front() {
        assert!(Cli::try_parse_from(["oct-convert"]).is_err());
        assert!(Cli::try_parse_from(["oct-convert", "a.dcm", "--outputformat", "tiff"]).is_err());

        let cli = Cli::try_parse_from(["oct-convert", "a.dcm", "--outputPath", "/definitely/not/here"])
            .expect("parse");
        assert!(cli.options().is_err());
    }

    #[test]
    fn help_is_not_an_error_exit() {
        let err = Cli::try_parse_from(["oct-convert", "--help"]).unwrap_err();
        assert!(!err.use_stderr());
    }
}
