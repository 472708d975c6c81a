/// Core domain types for extracted references and validation findings.
use std::fmt;
use std::path::PathBuf;

/// Which markdown construct a reference was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `![alt](target)`
    Image,
    /// `[label](target)` not preceded by `!`.
    Link,
}

/// A raw, not-yet-validated target pulled out of document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Construct the target was found in.
    pub kind: ReferenceKind,
    /// Target text between the parentheses, untouched.
    pub raw: String,
}

/// A cleaned target split at the first `#`.
/// `path` is empty for same-document fragment links such as `#usage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Trimmed text after the first `#`, if any.
    pub fragment: Option<String>,
    /// Text before the first `#`, still percent-encoded.
    pub path: String,
}

/// A broken reference found while validating one document.
/// The `Display` output is the line printed in the failure report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// The fragment does not name any heading in the target document.
    MissingAnchor {
        /// Document containing the reference.
        document: PathBuf,
        /// Fragment as written, without the leading `#`.
        fragment: String,
        /// Resolved markdown document that was searched.
        target: PathBuf,
    },
    /// The referenced file does not exist.
    MissingPath {
        /// Document containing the reference.
        document: PathBuf,
        /// Cleaned reference as written, fragment included.
        reference: String,
    },
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Problem::MissingAnchor { document, fragment, target } => write!(
                f,
                "{}: missing anchor '#{fragment}' in '{}'",
                document.display(),
                target.display()
            ),
            Problem::MissingPath { document, reference } => {
                write!(f, "{}: missing path '{reference}'", document.display())
            },
        };
    }
}
