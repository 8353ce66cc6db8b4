//! Inspect command.

use anyhow::Result;
use clap::Args;
use pfx_id::{CharId, Cuid};
use serde::Serialize;

use crate::output::print_single;

use super::{CommandContext, SchemeArg};

/// Split a single ID into its parts.
#[derive(Debug, Args)]
pub struct InspectCommand {
    /// The prefixed ID.
    value: String,

    /// Expected prefix (defaults to PFX_DEFAULT_PREFIX).
    #[arg(long, short)]
    prefix: Option<String>,

    /// Identifier scheme (defaults to PFX_DEFAULT_SCHEME).
    #[arg(long, short, value_enum)]
    scheme: Option<SchemeArg>,
}

#[derive(Debug, Serialize)]
struct Inspection {
    id: String,
    prefix: String,
    bare: String,
    scheme: &'static str,
}

impl InspectCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let prefix = ctx.resolve_prefix(self.prefix);
        let scheme = ctx.resolve_scheme(self.scheme);
        let inspection = inspect(&self.value, &prefix, scheme)?;
        print_single(&inspection, ctx.format);
        Ok(())
    }
}

fn inspect(value: &str, prefix: &str, scheme: SchemeArg) -> Result<Inspection, pfx_id::IdError> {
    let (prefix, bare, scheme) = match scheme {
        SchemeArg::Cuid => {
            let id = Cuid::parse(value, prefix)?;
            let scheme = id.scheme();
            let (prefix, bare) = id.into_parts();
            (prefix, bare, scheme)
        }
        SchemeArg::Char => {
            let id = CharId::parse(value, prefix)?;
            let scheme = id.scheme();
            let (prefix, bare) = id.into_parts();
            (prefix, bare, scheme)
        }
    };

    Ok(Inspection {
        id: value.to_string(),
        prefix,
        bare,
        scheme,
    })
}
