//! Document discovery: expand command-line targets into markdown files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Error;
use crate::validator::is_markdown;

/// Targets checked when none are given on the command line.
pub const DEFAULT_TARGETS: [&str; 2] = ["README.md", "docs"];

/// Expand `targets` into a sorted, deduplicated list of absolute document paths.
///
/// A target that is a file with a `.md` extension (any case) is taken as-is.
/// A directory is searched recursively for files ending in exactly `.md`,
/// including symlinks to files. Anything else is ignored with a warning.
///
/// # Errors
///
/// Returns `Error::Io` if a discovered path cannot be canonicalized.
pub fn collect_markdown_files(targets: &[PathBuf]) -> Result<Vec<PathBuf>, Error> {
    let mut found = BTreeSet::new();

    for target in targets {
        if target.is_file() && is_markdown(target) {
            found.insert(std::fs::canonicalize(target)?);
            continue;
        }
        if target.is_dir() {
            collect_from_directory(target, &mut found)?;
            continue;
        }
        tracing::warn!(target = %target.display(), "not a markdown file or directory, skipping");
    }

    return Ok(found.into_iter().collect());
}

/// Walk `dir` and add every `*.md` file to `found`. Symlinked files are
/// followed; symlinked directories are not descended into. Entries that
/// cannot be read are skipped with a warning.
///
/// # Errors
///
/// Returns `Error::Io` on canonicalization failure.
fn collect_from_directory(dir: &Path, found: &mut BTreeSet<PathBuf>) -> Result<(), Error> {
    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable entry, skipping");
                continue;
            },
        };
        if entry.path().extension().is_none_or(|ext| return ext != "md") {
            continue;
        }
        let is_file = if entry.path_is_symlink() {
            entry.path().is_file()
        } else {
            entry.file_type().is_file()
        };
        if !is_file {
            continue;
        }
        tracing::debug!(document = %entry.path().display(), "discovered");
        found.insert(std::fs::canonicalize(entry.path())?);
    }
    return Ok(());
}
