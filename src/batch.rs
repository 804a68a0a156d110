use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::codec::ScanCodec;
use crate::convert::convert_file;
use crate::error::ConvertError;
use crate::options::Options;

/// Per-run tally of what happened to each candidate file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub conflicts: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchSummary {
    fn record(&mut self, result: Result<PathBuf, ConvertError>) {
        match result {
            Ok(dest) => {
                info!("converted: {}", dest.display());
                self.converted += 1;
            }
            Err(e @ ConvertError::DestinationConflict(_)) => {
                error!("{}", e);
                self.conflicts += 1;
            }
            Err(e) => {
                error!("{}", e);
                self.failed += 1;
            }
        }
    }

    fn merge(&mut self, other: BatchSummary) {
        self.converted += other.converted;
        self.conflicts += other.conflicts;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

/// Converts every given path: directories are walked, anything else is converted directly.
pub fn convert_paths<C: ScanCodec>(codec: &C, paths: &[PathBuf], opt: &Options) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for path in paths {
        if path.is_dir() {
            summary.merge(convert_tree(codec, path, opt));
        } else {
            summary.record(convert_file(codec, path, opt));
        }
    }

    info!(
        "done: {} converted, {} conflicts, {} failed, {} skipped",
        summary.converted, summary.conflicts, summary.failed, summary.skipped
    );
    summary
}

/// Recursively converts every loadable file under `root` that is not already in the target format.
pub fn convert_tree<C: ScanCodec>(codec: &C, root: &Path, opt: &Options) -> BatchSummary {
    info!("Processing directory: {}", root.display());
    let mut summary = BatchSummary::default();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("{}", ConvertError::Walk(e));
                summary.failed += 1;
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        // Output of this or an earlier run: never fed back in.
        if opt.output_format.matches_extension(path) {
            debug!("skip (target format): {}", path.display());
            summary.skipped += 1;
            continue;
        }
        if !codec.is_loadable(path) {
            debug!("skip (not loadable): {}", path.display());
            summary.skipped += 1;
            continue;
        }

        summary.record(convert_file(codec, path, opt));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::tests::{scan, FakeCodec};
    use crate::format::OutputFormat;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn only_loadable_non_target_files_are_converted() {
        let dir = tempdir().expect("tmpdir");
        let a = dir.path().join("a.xoct");
        let b = dir.path().join("b.raw");
        let notes = dir.path().join("notes.txt");
        fs::write(&a, b"old output").expect("a");
        fs::write(&b, b"scan").expect("b");
        fs::write(&notes, b"text").expect("notes");

        // a.xoct would be loadable too, but carries the target extension.
        let codec = FakeCodec::default()
            .with(&a, scan("OLD", 1, 1))
            .with(&b, scan("P42", 3, 7));

        let summary = convert_tree(&codec, dir.path(), &Options::default());

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.skipped, 2);
        let written = codec.written.borrow();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, dir.path().join("P42_3_7.xoct"));
        assert_eq!(fs::read(&a).unwrap(), b"old output");
    }

    #[test]
    fn rerun_over_converted_tree_is_a_no_op() {
        let dir = tempdir().expect("tmpdir");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("nested");
        let source = nested.join("b.raw");
        fs::write(&source, b"scan").expect("write");
        let codec = FakeCodec::default().with(&source, scan("P42", 3, 7));

        let first = convert_tree(&codec, dir.path(), &Options::default());
        assert_eq!(first.converted, 1);

        // Second pass: the source is still loadable but its destination exists.
        let second = convert_tree(&codec, dir.path(), &Options::default());
        assert_eq!(second.converted, 0);
        assert_eq!(second.conflicts, 1);
        assert_eq!(codec.written.borrow().len(), 1);
    }

    #[test]
    fn output_only_tree_yields_nothing_to_do() {
        let dir = tempdir().expect("tmpdir");
        let out = dir.path().join("P1_1_1.octbin");
        fs::write(&out, b"done").expect("write");
        let codec = FakeCodec::default().with(&out, scan("P1", 1, 1));
        let opt = Options {
            output_format: OutputFormat::Octbin,
            ..Default::default()
        };

        let summary = convert_tree(&codec, dir.path(), &opt);
        assert_eq!(summary.converted + summary.conflicts + summary.failed, 0);
        assert!(codec.written.borrow().is_empty());
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let dir = tempdir().expect("tmpdir");
        let good = dir.path().join("good.raw");
        let missing = dir.path().join("missing.raw");
        fs::write(&good, b"scan").expect("write");
        let codec = FakeCodec::default().with(&good, scan("P1", 1, 1));

        let summary = convert_paths(&codec, &[missing, good, dir.path().join("nope")], &Options::default());

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.failed, 2);
    }

    #[test]
    fn explicit_files_bypass_the_loadability_check() {
        let dir = tempdir().expect("tmpdir");
        let source = dir.path().join("named.xoct");
        fs::write(&source, b"scan").expect("write");
        let codec = FakeCodec::default().with(&source, scan("P5", 2, 2));
        let opt = Options {
            output_format: OutputFormat::Octbin,
            ..Default::default()
        };

        let summary = convert_paths(&codec, &[source], &opt);
        assert_eq!(summary.converted, 1);
        assert!(dir.path().join("P5_2_2.octbin").exists());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_counts_as_failure_and_walk_continues() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tmpdir");
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).expect("locked");
        let good = dir.path().join("good.raw");
        fs::write(&good, b"scan").expect("write");
        let codec = FakeCodec::default().with(&good, scan("P1", 1, 1));

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");
        if fs::read_dir(&locked).is_ok() {
            // Running with privileges that ignore permissions.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("restore");
            return;
        }

        let summary = convert_tree(&codec, dir.path(), &Options::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("restore");

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.converted, 1);
    }
}
