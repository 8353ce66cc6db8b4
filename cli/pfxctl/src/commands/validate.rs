//! Validate command.

use anyhow::Result;
use clap::Args;
use pfx_id::{CharId, Cuid, IdError};
use serde::Serialize;
use tabled::Tabled;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::CliError;
use crate::output::{print_output, print_success, OutputFormat};

use super::{CommandContext, SchemeArg};

/// Check values against a prefix and scheme.
///
/// Exits non-zero when any value is rejected.
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Values to check.
    #[arg(required = true)]
    values: Vec<String>,

    /// Expected prefix (defaults to PFX_DEFAULT_PREFIX).
    #[arg(long, short)]
    prefix: Option<String>,

    /// Identifier scheme (defaults to PFX_DEFAULT_SCHEME).
    #[arg(long, short, value_enum)]
    scheme: Option<SchemeArg>,

    /// Treat each value as a JSON literal (e.g. '"cus_..."' or 42).
    ///
    /// Values that are not valid JSON are rejected with `invalid_json`.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct ValidationRow {
    #[tabled(rename = "Value")]
    value: String,

    #[tabled(rename = "Valid")]
    valid: bool,

    #[tabled(rename = "Code")]
    code: String,

    #[tabled(rename = "Message")]
    message: String,
}

impl ValidateCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let prefix = ctx.resolve_prefix(self.prefix);
        let scheme = ctx.resolve_scheme(self.scheme);

        let rows: Vec<ValidationRow> = self
            .values
            .iter()
            .map(|value| {
                let result = if self.json {
                    check_json(value, &prefix, scheme)
                } else {
                    check(value, &prefix, scheme)
                };
                row(value, result)
            })
            .collect();

        let rejected = rows.iter().filter(|r| !r.valid).count();
        print_output(&rows, ctx.format);

        if rejected > 0 {
            warn!(rejected, total = rows.len(), "values rejected");
            return Err(CliError::Rejected {
                count: rejected,
                total: rows.len(),
            }
            .into());
        }

        if ctx.format == OutputFormat::Table {
            print_success(&format!("{} value(s) valid", rows.len()));
        }
        Ok(())
    }
}

/// Why a value was rejected.
#[derive(Debug, Error)]
enum Rejection {
    #[error(transparent)]
    Id(#[from] IdError),

    #[error("value is not a JSON literal: {0}")]
    Json(#[from] serde_json::Error),
}

impl Rejection {
    fn code(&self) -> &'static str {
        match self {
            Rejection::Id(e) => e.code(),
            Rejection::Json(_) => "invalid_json",
        }
    }
}

fn check(value: &str, prefix: &str, scheme: SchemeArg) -> Result<(), Rejection> {
    match scheme {
        SchemeArg::Cuid => Cuid::parse(value, prefix).map(drop)?,
        SchemeArg::Char => CharId::parse(value, prefix).map(drop)?,
    }
    Ok(())
}

fn check_json(value: &str, prefix: &str, scheme: SchemeArg) -> Result<(), Rejection> {
    let json: serde_json::Value = serde_json::from_str(value)?;
    debug!(%json, "checking json value");
    match scheme {
        SchemeArg::Cuid => Cuid::from_json(&json, prefix).map(drop)?,
        SchemeArg::Char => CharId::from_json(&json, prefix).map(drop)?,
    }
    Ok(())
}

fn row(value: &str, result: Result<(), Rejection>) -> ValidationRow {
    match result {
        Ok(()) => ValidationRow {
            value: value.to_string(),
            valid: true,
            code: String::new(),
            message: String::new(),
        },
        Err(e) => ValidationRow {
            value: value.to_string(),
            valid: false,
            code: e.code().to_string(),
            message: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "cus_ckp2rqb6h0000v8n6k0q6f1xz";

    #[test]
    fn test_check_cuid() {
        assert!(check(VALID, "cus_", SchemeArg::Cuid).is_ok());
        assert_eq!(
            check("bus_ckp2rqb6h0000v8n6k0q6f1xz", "cus_", SchemeArg::Cuid)
                .unwrap_err()
                .code(),
            "invalid_prefix"
        );
        assert_eq!(
            check("cus_short", "cus_", SchemeArg::Cuid).unwrap_err().code(),
            "invalid_id"
        );
    }

    #[test]
    fn test_check_char() {
        assert!(check("dev_x", "dev_", SchemeArg::Char).is_ok());
        assert_eq!(
            check("dev_", "dev_", SchemeArg::Char).unwrap_err().code(),
            "invalid_id"
        );
    }

    #[test]
    fn test_check_json_rejects_non_strings() {
        assert_eq!(
            check_json("42", "cus_", SchemeArg::Cuid).unwrap_err().code(),
            "invalid_type"
        );
        assert!(check_json(&format!("\"{VALID}\""), "cus_", SchemeArg::Cuid).is_ok());
    }

    #[test]
    fn test_check_json_rejects_unparseable_input() {
        let err = check_json(VALID, "cus_", SchemeArg::Cuid).unwrap_err();
        assert_eq!(err.code(), "invalid_json");

        let r = row("abc", check_json("abc", "", SchemeArg::Char));
        assert!(!r.valid);
        assert_eq!(r.code, "invalid_json");
    }

    #[test]
    fn test_row_reports_code() {
        let r = row(
            "x",
            Err(IdError::TypeMismatch {
                found: "number".to_string(),
            }
            .into()),
        );
        assert!(!r.valid);
        assert_eq!(r.code, "invalid_type");
    }
}
