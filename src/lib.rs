//
// lib.rs
// Oct-Convert-rs
//
// Exposes the conversion pipeline modules and re-exports the CLI entry point for both binary and library consumers.
//

// Leaf-first: model and pure transforms, then codecs, then the pipeline and its CLI.
pub mod anonymize;
pub mod batch;
pub mod cli;
pub mod codec;
pub mod convert;
pub mod error;
pub mod format;
pub mod logger;
pub mod metadata;
pub mod models;
pub mod naming;
pub mod options;

pub use batch::{convert_paths, convert_tree, BatchSummary};
pub use cli::{run as run_cli, Cli};
pub use codec::{OctFileCodec, ScanCodec};
pub use convert::convert_file;
pub use error::{CodecError, ConvertError};
pub use format::OutputFormat;
pub use options::{Options, ReadOptions, WriteOptions};
