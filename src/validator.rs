//! Per-document validation of local links, images, and heading fragments.

use std::path::Path;

use crate::anchors::AnchorCache;
use crate::error::Error;
use crate::resolver;
use crate::scanner::{self, Extractor};
use crate::types::{Problem, Target};

/// Validates documents against the filesystem and a shared anchor cache.
pub struct Validator {
    /// Anchor sets of every markdown document seen so far.
    anchors: AnchorCache,
    /// Link and image patterns.
    extractor: Extractor,
}

impl Validator {
    /// Build a validator around an already constructed (and possibly
    /// pre-populated) anchor cache.
    pub const fn new(extractor: Extractor, anchors: AnchorCache) -> Self {
        return Self { anchors, extractor };
    }

    /// Check every reference in `document` and return the problems in
    /// occurrence order (links first, then images). `document` must be absolute.
    ///
    /// # Errors
    ///
    /// Returns `Error::Read` if `document`, or a markdown document one of its
    /// fragments points into, cannot be read.
    pub fn validate_document(&mut self, document: &Path) -> Result<Vec<Problem>, Error> {
        let content = scanner::strip_fenced_code_blocks(&resolver::read_document(document)?);
        let mut problems = Vec::new();

        for reference in self.extractor.extract(&content) {
            let cleaned = scanner::clean_link_target(&reference.raw);
            if cleaned.is_empty() || scanner::is_external_link(&cleaned) {
                tracing::trace!(document = %document.display(), target = %cleaned, "skipped");
                continue;
            }

            tracing::trace!(document = %document.display(), kind = ?reference.kind, target = %cleaned, "checking");
            if let Some(problem) = self.check_reference(document, &cleaned)? {
                problems.push(problem);
            }
        }

        return Ok(problems);
    }

    /// Check one cleaned local reference.
    ///
    /// # Errors
    ///
    /// Returns `Error::Read` if the fragment's target document cannot be read.
    fn check_reference(&mut self, document: &Path, cleaned: &str) -> Result<Option<Problem>, Error> {
        let Target { path, fragment } = scanner::split_fragment(cleaned);
        let target = resolver::resolve_target(document, &path);

        if !path.is_empty() && !target.exists() {
            return Ok(Some(Problem::MissingPath {
                document: document.to_path_buf(),
                reference: cleaned.to_string(),
            }));
        }

        let Some(fragment) = fragment.filter(|f| return !f.is_empty()) else {
            return Ok(None);
        };
        if !is_markdown(&target) {
            return Ok(None);
        }

        let key = resolver::percent_decode(&fragment).trim().to_lowercase();
        if self.anchors.anchors_for(&target)?.contains(&key) {
            return Ok(None);
        }

        return Ok(Some(Problem::MissingAnchor { document: document.to_path_buf(), fragment, target }));
    }
}

/// Whether `path` has a `.md` extension, ignoring case.
pub fn is_markdown(path: &Path) -> bool {
    return path
        .extension()
        .is_some_and(|ext| return ext.eq_ignore_ascii_case("md"));
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::anchors::AnchorBuilder;

    struct Tree {
        _dir: tempfile::TempDir,
        root: PathBuf,
    }

    impl Tree {
        fn new(files: &[(&str, &str)]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = std::fs::canonicalize(dir.path()).unwrap();
            for (name, content) in files {
                let path = root.join(name);
                std::fs::create_dir_all(path.parent().unwrap()).unwrap();
                std::fs::write(path, content).unwrap();
            }
            return Self { _dir: dir, root };
        }

        fn validate(&self, name: &str) -> Vec<Problem> {
            let cache = AnchorCache::new(AnchorBuilder::new().unwrap());
            let mut validator = Validator::new(Extractor::new().unwrap(), cache);
            return validator.validate_document(&self.root.join(name)).unwrap();
        }
    }

    #[test]
    fn valid_links_produce_no_problems() {
        let tree = Tree::new(&[
            ("README.md", "# Top\n[guide](docs/guide.md#getting-started) [self](#top) ![logo](img/logo.png)\n"),
            ("docs/guide.md", "# Getting Started\n"),
            ("img/logo.png", "png"),
        ]);
        assert!(tree.validate("README.md").is_empty(), "all references resolve");
    }

    #[test]
    fn external_link_is_never_checked() {
        let tree = Tree::new(&[("a.md", "[x](http://example.com/page#frag) [m](MAILTO:me@example.com)\n")]);
        assert!(tree.validate("a.md").is_empty(), "external references are skipped");
    }

    #[test]
    fn missing_path_skips_fragment_check() {
        let tree = Tree::new(&[("a.md", "[x](missing.md#section)\n")]);
        let problems = tree.validate("a.md");
        assert_eq!(problems, vec![Problem::MissingPath {
            document: tree.root.join("a.md"),
            reference: "missing.md#section".to_string(),
        }]);
    }

    #[test]
    fn missing_anchor_names_resolved_target() {
        let tree = Tree::new(&[("a.md", "[x](sub/../other.md#nope)\n"), ("other.md", "# Yes\n")]);
        let problems = tree.validate("a.md");
        assert_eq!(problems, vec![Problem::MissingAnchor {
            document: tree.root.join("a.md"),
            fragment: "nope".to_string(),
            target: tree.root.join("other.md"),
        }]);
    }

    #[test]
    fn duplicate_heading_suffixes_resolve() {
        let tree = Tree::new(&[("a.md", "# Intro\n# Intro\n[one](#intro) [two](#intro-1) [three](#intro-2)\n")]);
        let problems = tree.validate("a.md");
        assert_eq!(problems.len(), 1);
        assert!(problems[0].to_string().contains("'#intro-2'"), "only the third is missing");
    }

    #[test]
    fn fragment_is_decoded_and_case_folded() {
        let tree = Tree::new(&[("a.md", "# Hello World\n[x](#Hello-World) [y](#hello%2Dworld)\n")]);
        assert!(tree.validate("a.md").is_empty(), "decoded, lowercased fragments match");
    }

    #[test]
    fn fragment_into_non_markdown_is_not_checked() {
        let tree = Tree::new(&[("a.md", "[x](main.rs#L10) [y](b.MD#top)\n"), ("main.rs", "fn main() {}\n"), ("b.MD", "# Top\n")]);
        assert!(tree.validate("a.md").is_empty(), "only markdown targets are anchor-checked");
    }

    #[test]
    fn carriage_return_only_document_resolves_its_headings() {
        let tree = Tree::new(&[("cr.md", "# One\r# Two\r[second](#two)\r")]);
        assert!(tree.validate("cr.md").is_empty(), "each CR ends a line");
    }

    #[test]
    fn links_in_fenced_code_are_ignored() {
        let tree = Tree::new(&[("a.md", "```\n[x](missing.md)\n```\n")]);
        assert!(tree.validate("a.md").is_empty(), "fenced references are not extracted");
    }

    #[test]
    fn titles_and_angle_brackets_are_cleaned() {
        let tree = Tree::new(&[
            ("a.md", "[x](<my doc.md>) [y](my%20doc.md \"Other\")\n"),
            ("my doc.md", "\n"),
        ]);
        assert!(tree.validate("a.md").is_empty(), "cleaned targets resolve");
    }

    #[test]
    fn empty_fragment_is_not_checked() {
        let tree = Tree::new(&[("a.md", "[x](b.md#)\n"), ("b.md", "no headings\n")]);
        assert!(tree.validate("a.md").is_empty(), "bare '#' is accepted");
    }

    #[test]
    fn problems_keep_occurrence_order() {
        let tree = Tree::new(&[("a.md", "![i](gone.png) [l1](one.md) [l2](two.md)\n")]);
        let rendered: Vec<String> = tree.validate("a.md").iter().map(ToString::to_string).collect();
        assert_eq!(rendered.len(), 3);
        assert!(rendered[0].ends_with("'one.md'"), "links first");
        assert!(rendered[1].ends_with("'two.md'"), "in source order");
        assert!(rendered[2].ends_with("'gone.png'"), "images last");
    }
}
