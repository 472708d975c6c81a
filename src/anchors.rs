//! Heading anchors: slug derivation, per-document anchor sets, and the
//! process-wide anchor cache.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::Error;
use crate::resolver;
use crate::scanner::FENCE;

/// Valid fragment identifiers exposed by one document.
pub type AnchorSet = HashSet<String>;

/// Derives anchor sets from ATX headings (`#` through `######`).
pub struct AnchorBuilder {
    /// Characters dropped from a slug: anything outside the letter and
    /// number categories, whitespace, and `-`. Combining marks go too.
    disallowed: Regex,
    /// Matches a heading line and captures its text without trailing whitespace.
    heading: Regex,
}

impl AnchorBuilder {
    /// Compile the heading and slug patterns.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pattern` if a pattern fails to compile.
    pub fn new() -> Result<Self, Error> {
        return Ok(Self {
            disallowed: Regex::new(r"[^\p{L}\p{N}\s-]")?,
            heading: Regex::new(r"^(#{1,6})\s+(.+?)\s*$")?,
        });
    }

    /// Collect the anchors for every heading outside fenced code.
    ///
    /// Repeated slugs get a numeric suffix: the first `intro` registers
    /// `intro`, the second `intro-1`, the third `intro-2`.
    pub fn build(&self, content: &str) -> AnchorSet {
        let mut anchors = AnchorSet::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut in_fence = false;

        for line in content.lines() {
            if line.trim().starts_with(FENCE) {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }

            let Some(text) = self.heading.captures(line).and_then(|cap| return cap.get(2)) else {
                continue;
            };
            let slug = self.slugify(text.as_str());
            if slug.is_empty() {
                continue;
            }

            let count = seen.entry(slug.clone()).or_insert(0);
            if *count == 0 {
                anchors.insert(slug);
            } else {
                anchors.insert(format!("{slug}-{count}"));
            }
            *count = count.saturating_add(1);
        }

        return anchors;
    }

    /// Convert heading text to its anchor slug.
    ///
    /// Lowercases, drops everything but letters, numbers, whitespace and `-`
    /// (underscores included), turns whitespace runs into `-`, trims edge
    /// hyphens, then collapses hyphen runs.
    pub fn slugify(&self, text: &str) -> String {
        let lowered = text.trim().to_lowercase();
        let kept = self.disallowed.replace_all(&lowered, "");
        return collapse_hyphens(&kept);
    }
}

/// Join whitespace-separated words with `-`, trim edge hyphens, and
/// collapse hyphen runs to one.
fn collapse_hyphens(kept: &str) -> String {
    let hyphenated = kept.split_whitespace().collect::<Vec<_>>().join("-");
    let trimmed = hyphenated.trim_matches('-');

    let mut slug = String::with_capacity(trimmed.len());
    let mut prev_hyphen = false;
    for c in trimmed.chars() {
        if c == '-' {
            if prev_hyphen {
                continue;
            }
            prev_hyphen = true;
        } else {
            prev_hyphen = false;
        }
        slug.push(c);
    }
    return slug;
}

/// Anchor sets keyed by absolute document path.
///
/// Populated monotonically and never invalidated: documents do not change
/// during a run, so rebuilding an entry always yields the same set.
pub struct AnchorCache {
    /// Heading parser used to fill missing entries.
    builder: AnchorBuilder,
    /// Computed anchor sets.
    entries: HashMap<PathBuf, AnchorSet>,
}

impl AnchorCache {
    /// An empty cache.
    pub fn new(builder: AnchorBuilder) -> Self {
        return Self { builder, entries: HashMap::new() };
    }

    /// Anchor set for `path`, reading and parsing the document on first use.
    ///
    /// # Errors
    ///
    /// Returns `Error::Read` if the document cannot be read.
    pub fn anchors_for(&mut self, path: &Path) -> Result<&AnchorSet, Error> {
        if !self.entries.contains_key(path) {
            let anchors = self.build_from_disk(path)?;
            self.entries.insert(path.to_path_buf(), anchors);
        }
        return Ok(self.entries.entry(path.to_path_buf()).or_default());
    }

    /// Build anchor sets for every path up front.
    ///
    /// # Errors
    ///
    /// Returns `Error::Read` for the first document that cannot be read.
    pub fn populate(&mut self, paths: &[PathBuf]) -> Result<(), Error> {
        for path in paths {
            let anchors = self.build_from_disk(path)?;
            tracing::trace!(document = %path.display(), anchors = anchors.len(), "cached anchors");
            self.entries.insert(path.clone(), anchors);
        }
        return Ok(());
    }

    /// Register a document from in-memory content instead of the filesystem.
    #[cfg(test)]
    pub fn insert_content(&mut self, path: &Path, content: &str) {
        let anchors = self.builder.build(content);
        self.entries.insert(path.to_path_buf(), anchors);
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    /// Read `path` and derive its anchors.
    fn build_from_disk(&self, path: &Path) -> Result<AnchorSet, Error> {
        let content = resolver::read_document(path)?;
        return Ok(self.builder.build(&content));
    }
}
