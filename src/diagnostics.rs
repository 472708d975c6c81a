//! Markdown rendering of fatal errors for stderr.

use std::io::IsTerminal as _;

use crate::config::CONFIG_FILE;
use crate::error::Error;

/// ANSI bold, used for headings when stderr is a terminal.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render a fatal error as markdown and print it to stderr,
/// bolding headings when stderr is a terminal.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    let styled = std::io::stderr().is_terminal();
    for line in md.lines() {
        if styled && line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render a fatal error as a structured markdown diagnostic:
/// what happened, and how to fix it where there is a known fix.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::Read { path, source } => format!(
            "\
# Error: Unreadable Document

`{}` could not be read: {source}

## Fix

Make sure the file is readable and encoded as UTF-8.
",
            path.display()
        ),
        Error::TomlDe(e) => format!(
            "\
# Error: Invalid Config

`{CONFIG_FILE}` is not valid:

{e}

## Fix

Only `include` and `exclude` lists of path prefixes are supported:

    include = [\"docs/\"]
    exclude = [\"docs/archive/\"]
"
        ),
        Error::CurrentDir(e) | Error::Io(e) => format!(
            "\
# Error: I/O

{e}
"
        ),
        Error::Pattern(e) => format!(
            "\
# Error: Internal Pattern

{e}
"
        ),
    };
}
