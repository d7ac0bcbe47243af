pub mod args;
pub mod commands;

pub use args::Args;

use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;

use crate::status::Report;

/// Parse arguments, run the check, print the report line and map it to the
/// plugin exit code.
pub async fn run() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => return reject_arguments(e),
    };

    if let Err(e) = commands::setup_logging(&args) {
        eprintln!("{e:#}");
    }

    let report = commands::execute(args).await;
    println!("{report}");
    ExitCode::from(report.exit_code())
}

fn reject_arguments(e: clap::Error) -> ExitCode {
    // --help / --version land here as well
    let _ = e.print();
    match argument_report(&e) {
        Some(report) => {
            println!("{report}");
            ExitCode::from(report.exit_code())
        }
        None => ExitCode::SUCCESS,
    }
}

/// UNKNOWN report for a command line clap refused, `None` for help/version.
///
/// clap exits with 2 on usage errors, which a monitoring system would read
/// as CRITICAL.
fn argument_report(e: &clap::Error) -> Option<Report> {
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return None;
    }

    let rendered = e.to_string();
    let first_line = rendered.lines().next().unwrap_or_default();
    let reason = first_line.strip_prefix("error: ").unwrap_or(first_line);
    Some(Report::unknown(format!("Invalid arguments: {reason}")))
}
