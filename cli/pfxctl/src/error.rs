//! Error handling and display for the CLI.

use colored::Colorize;
use pfx_id::IdError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{count} of {total} value(s) rejected")]
    Rejected { count: usize, total: usize },
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(hint) = err.downcast_ref::<IdError>().and_then(hint_for) {
        eprintln!("\n{}", format!("Hint: {hint}").yellow());
    }

    if let Some(CliError::Rejected { .. }) = err.downcast_ref::<CliError>() {
        eprintln!(
            "\n{}",
            "Hint: See the Code and Message columns above for each rejection.".yellow()
        );
    }
}

fn hint_for(err: &IdError) -> Option<&'static str> {
    match err {
        IdError::PrefixMismatch { .. } => Some("Pass the value's prefix with --prefix."),
        IdError::InvalidIdentifier { .. } => {
            Some("Check --scheme; cuids start with 'c' and are at least 25 characters.")
        }
        IdError::IncomparablePrefixes { .. } => Some("Sort IDs of one prefix at a time."),
        _ => None,
    }
}
