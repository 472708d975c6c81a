/// Crate-level error types for mdlinkcheck diagnostics.
use std::path::PathBuf;

/// Fatal errors that abort a run. Broken links are not errors; they are
/// collected as [`crate::types::Problem`] values and reported together.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The working directory could not be determined.
    #[error("cannot determine working directory: {0}")]
    CurrentDir(
        /// The wrapped I/O error.
        std::io::Error,
    ),

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// A built-in pattern failed to compile.
    #[error("pattern: {0}")]
    Pattern(
        /// The wrapped regex error.
        #[from]
        regex::Error,
    ),

    /// A document exists but its content could not be read as UTF-8 text.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Document that failed to read.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// TOML deserialization of `.mdlinkcheck.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
