//! The `check` run: discover documents, cache anchors, validate, report.

use std::path::PathBuf;
use std::process::ExitCode;

use crate::anchors::{AnchorBuilder, AnchorCache};
use crate::config::Config;
use crate::discovery;
use crate::error::Error;
use crate::scanner::Extractor;
use crate::types::Problem;
use crate::validator::Validator;

/// Validate every document reachable from `targets` and print the report.
///
/// Exit code 0 when nothing was found or nothing is broken, 1 otherwise.
///
/// # Errors
///
/// Returns errors from config loading, discovery, or reading a document.
/// Any of these aborts the run before a report is printed.
pub fn check(targets: &[PathBuf]) -> Result<ExitCode, Error> {
    let root = std::env::current_dir().map_err(Error::CurrentDir)?;
    let config = Config::load(&root)?;

    let discovered = discovery::collect_markdown_files(targets)?;
    let documents = config.select_documents(&root, discovered);
    if documents.is_empty() {
        println!("No markdown files found.");
        return Ok(ExitCode::SUCCESS);
    }

    let mut anchors = AnchorCache::new(AnchorBuilder::new()?);
    anchors.populate(&documents)?;
    tracing::debug!(documents = anchors.len(), "anchor cache populated");

    let mut validator = Validator::new(Extractor::new()?, anchors);
    let mut problems: Vec<Problem> = Vec::new();
    for document in &documents {
        let found = validator.validate_document(document)?;
        tracing::debug!(document = %document.display(), problems = found.len(), "validated");
        problems.extend(found);
    }

    if !problems.is_empty() {
        println!("Markdown link check failed:");
        for problem in &problems {
            println!("- {problem}");
        }
        return Ok(ExitCode::FAILURE);
    }

    let total = documents.len();
    println!("Markdown link check passed ({total} files).");
    return Ok(ExitCode::SUCCESS);
}
