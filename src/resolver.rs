//! Path resolution for local references, relative to the referencing document.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::error::Error;

/// Read a document into memory, attaching its path to any failure.
/// Line endings are normalized: `\r\n` and lone `\r` both become `\n`.
///
/// # Errors
///
/// Returns `Error::Read` if the file is missing, unreadable, or not UTF-8.
pub fn read_document(path: &Path) -> Result<String, Error> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        return Error::Read { path: path.to_path_buf(), source };
    })?;
    if !content.contains('\r') {
        return Ok(content);
    }
    return Ok(content.replace("\r\n", "\n").replace('\r', "\n"));
}

/// Percent-decode link text. Invalid UTF-8 sequences decode to U+FFFD.
pub fn percent_decode(text: &str) -> String {
    return percent_decode_str(text).decode_utf8_lossy().into_owned();
}

/// Resolve the path part of a reference found in `document`.
///
/// An empty path part names `document` itself. Otherwise the decoded path is
/// joined onto the document's directory and resolved with
/// [`canonicalize_lenient`], so a missing target still yields a path the
/// caller can report and test for existence.
pub fn resolve_target(document: &Path, path_part: &str) -> PathBuf {
    if path_part.is_empty() {
        return document.to_path_buf();
    }

    let decoded = percent_decode(path_part);
    let base = document.parent().unwrap_or_else(|| return Path::new(""));
    return canonicalize_lenient(&base.join(decoded));
}

/// Resolve `path` one component at a time. Every prefix that exists is
/// canonicalized (symlinks followed) before the next component is applied,
/// so `link/..` leaves the link's target, not the link. Components past the
/// first missing one are applied lexically. `..` at the root stays at the root.
pub fn canonicalize_lenient(path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                if resolved.file_name().is_some() {
                    resolved.pop();
                } else if !resolved.has_root() {
                    resolved.push(component);
                }
            },
            Component::Normal(name) => {
                let candidate = resolved.join(name);
                resolved = std::fs::canonicalize(&candidate).unwrap_or(candidate);
            },
            Component::RootDir | Component::Prefix(_) => resolved.push(component),
        }
    }
    return resolved;
}
