//! Optional `.mdlinkcheck.toml`: narrows which discovered documents are checked.

use std::path::{Path, PathBuf};

use crate::error::Error;

/// Name of the optional project configuration file.
pub const CONFIG_FILE: &str = ".mdlinkcheck.toml";

/// Document selection rules. Each entry is a path relative to the working
/// directory and matches whole components, so `docs` covers `docs/a.md`
/// but not `docs-old/a.md`.
#[derive(Debug, Default)]
pub struct Config {
    /// Subtrees never checked, even when included.
    exclude: Vec<PathBuf>,
    /// Subtrees checked; empty means the whole tree.
    include: Vec<PathBuf>,
}

/// On-disk shape of `.mdlinkcheck.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    /// Subtrees to skip.
    #[serde(default)]
    exclude: Vec<PathBuf>,
    /// Subtrees to check.
    #[serde(default)]
    include: Vec<PathBuf>,
}

impl Config {
    /// Read `.mdlinkcheck.toml` from `root`. No file means no filtering.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file exists but cannot be read,
    /// or `Error::TomlDe` if it does not parse.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        return match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(config = %path.display(), "loaded");
                Self::parse(&content)
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::Io(e)),
        };
    }

    /// Parse config from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let ConfigFile { exclude, include } = toml::from_str(content)?;
        return Ok(Self { exclude, include });
    }

    /// Keep the documents this config selects, preserving order.
    /// Documents are matched by their path under `root`; a document outside
    /// `root` is matched by its absolute path.
    pub fn select_documents(&self, root: &Path, documents: Vec<PathBuf>) -> Vec<PathBuf> {
        if self.include.is_empty() && self.exclude.is_empty() {
            return documents;
        }

        let root = std::fs::canonicalize(root).unwrap_or_else(|_| return root.to_path_buf());
        return documents
            .into_iter()
            .filter(|document| {
                let relative = document.strip_prefix(&root).unwrap_or(document);
                let selected = self.selects(relative);
                if !selected {
                    tracing::debug!(document = %document.display(), "excluded by config");
                }
                return selected;
            })
            .collect();
    }

    /// Whether `relative` lies in an included subtree and in no excluded one.
    fn selects(&self, relative: &Path) -> bool {
        let under = |subtree: &PathBuf| return relative.starts_with(subtree);
        let included = self.include.is_empty() || self.include.iter().any(under);
        return included && !self.exclude.iter().any(under);
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    fn selected(config: &Config, names: &[&str]) -> Vec<PathBuf> {
        let documents = names.iter().map(|n| return Path::new("/repo").join(n)).collect();
        return config.select_documents(Path::new("/repo"), documents);
    }

    #[test]
    fn missing_file_selects_everything() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(selected(&config, &["README.md", "docs/a.md"]).len(), 2);
    }

    #[test]
    fn include_then_exclude() {
        let config = Config::parse("include = [\"docs/\"]\nexclude = [\"docs/archive/\"]\n").unwrap();
        let kept = selected(&config, &["README.md", "docs/archive/old.md", "docs/guide.md"]);
        assert_eq!(kept, vec![PathBuf::from("/repo/docs/guide.md")]);
    }

    #[test]
    fn prefixes_match_whole_components() {
        let config = Config::parse("exclude = [\"docs\"]").unwrap();
        let kept = selected(&config, &["docs/a.md", "docs-old/b.md"]);
        assert_eq!(kept, vec![PathBuf::from("/repo/docs-old/b.md")]);
    }

    #[test]
    fn documents_outside_root_use_absolute_paths() {
        let config = Config::parse("exclude = [\"/elsewhere\"]").unwrap();
        let documents = vec![PathBuf::from("/elsewhere/x.md"), PathBuf::from("/repo/y.md")];
        let kept = config.select_documents(Path::new("/repo"), documents);
        assert_eq!(kept, vec![PathBuf::from("/repo/y.md")]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "include = docs").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))), "bad toml must not fall back");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("exlude = [\"x\"]").is_err(), "typo in key name");
    }
}
