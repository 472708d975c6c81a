mod anchors;
mod commands;
mod config;
mod diagnostics;
mod discovery;
mod error;
mod resolver;
mod scanner;
mod types;
mod validator;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Check relative links, images, and heading anchors in markdown documentation.
#[derive(Parser)]
#[command(name = "mdlinkcheck", version, about)]
struct Cli {
    /// Markdown files and/or directories to scan
    #[arg(default_values = discovery::DEFAULT_TARGETS)]
    targets: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| return EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    return match commands::check(&cli.targets) {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}
