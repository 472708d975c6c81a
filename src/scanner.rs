//! Reference extraction: fenced-code stripping, link/image patterns,
//! target cleanup, and fragment splitting.

use regex::Regex;

use crate::error::Error;
use crate::types::{Reference, ReferenceKind, Target};

/// Scheme prefixes that mark a reference as external. Compared case-insensitively.
const EXTERNAL_PREFIXES: [&str; 5] = ["http://", "https://", "mailto:", "tel:", "data:"];

/// Marker line that opens or closes a fenced code block.
pub const FENCE: &str = "```";

/// Compiled link and image patterns.
///
/// Labels may not contain `]` and targets may not contain `)`.
pub struct Extractor {
    /// `![alt](target)`
    image: Regex,
    /// `[label](target)`; the "not preceded by `!`" rule is applied while scanning.
    link: Regex,
}

impl Extractor {
    /// Compile the built-in patterns.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pattern` if a pattern fails to compile.
    pub fn new() -> Result<Self, Error> {
        return Ok(Self {
            image: Regex::new(r"!\[[^\]]*\]\(([^)]+)\)")?,
            link: Regex::new(r"\[[^\]]*\]\(([^)]+)\)")?,
        });
    }

    /// Extract every link target, then every image target, in source order.
    /// `content` must already have fenced code removed.
    pub fn extract(&self, content: &str) -> Vec<Reference> {
        let mut references = self.extract_links(content);
        references.extend(self.image.captures_iter(content).filter_map(|cap| {
            return cap.get(1).map(|m| {
                return Reference { kind: ReferenceKind::Image, raw: m.as_str().to_string() };
            });
        }));
        return references;
    }

    /// Scan for `[label](target)` matches whose `[` is not preceded by `!`.
    /// A rejected candidate restarts the search one byte later, so a link
    /// nested inside an image label is still found.
    fn extract_links(&self, content: &str) -> Vec<Reference> {
        let mut references = Vec::new();
        let mut start = 0;

        while let Some(cap) = self.link.captures_at(content, start) {
            let Some(whole) = cap.get(0) else {
                break;
            };
            let is_image = content.get(..whole.start()).is_some_and(|before| return before.ends_with('!'));
            if is_image {
                // `[` is one byte wide.
                start = whole.start().saturating_add(1);
                continue;
            }
            if let Some(target) = cap.get(1) {
                references.push(Reference { kind: ReferenceKind::Link, raw: target.as_str().to_string() });
            }
            start = whole.end();
        }

        return references;
    }
}

/// Drop fenced code blocks, fence lines included. An unterminated fence
/// swallows the rest of the document.
pub fn strip_fenced_code_blocks(content: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in content.lines() {
        if line.trim().starts_with(FENCE) {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence {
            kept.push(line);
        }
    }

    return kept.join("\n");
}

/// Strip surrounding whitespace, one pair of `<...>`, and a trailing `"title"`.
pub fn clean_link_target(raw: &str) -> String {
    let mut target = raw.trim();
    if let Some(inner) = target.strip_prefix('<').and_then(|rest| return rest.strip_suffix('>')) {
        target = inner;
    }

    if let Some((candidate, maybe_title)) = target.split_once(" \"")
        && maybe_title.ends_with('"')
    {
        target = candidate;
    }

    return target.to_string();
}

/// Whether a cleaned target uses a scheme that is never checked locally.
pub fn is_external_link(target: &str) -> bool {
    let lowered = target.trim().to_lowercase();
    return EXTERNAL_PREFIXES.iter().any(|prefix| return lowered.starts_with(prefix));
}

/// Split a cleaned target at its first `#`. The fragment is trimmed.
pub fn split_fragment(target: &str) -> Target {
    return match target.split_once('#') {
        Some((path, fragment)) => Target { path: path.to_string(), fragment: Some(fragment.trim().to_string()) },
        None => Target { path: target.to_string(), fragment: None },
    };
}
