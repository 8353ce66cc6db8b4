//! Generate command.

use anyhow::Result;
use clap::Args;
use pfx_id::{CharId, Cuid};
use serde::Serialize;
use tabled::Tabled;
use tracing::info;
use ulid::Ulid;

use crate::output::print_output;

use super::{CommandContext, SchemeArg};

/// Generate new prefixed IDs.
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Prefix to prepend (defaults to PFX_DEFAULT_PREFIX).
    #[arg(long, short)]
    prefix: Option<String>,

    /// Identifier scheme (defaults to PFX_DEFAULT_SCHEME).
    #[arg(long, short, value_enum)]
    scheme: Option<SchemeArg>,

    /// Number of IDs to generate.
    #[arg(long, short = 'n', default_value = "1")]
    count: usize,
}

#[derive(Debug, Serialize, Tabled)]
struct GeneratedRow {
    #[tabled(rename = "ID")]
    id: String,

    #[tabled(rename = "Prefix")]
    prefix: String,

    #[tabled(rename = "Bare")]
    bare: String,

    #[tabled(rename = "Scheme")]
    scheme: String,
}

impl GenerateCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let prefix = ctx.resolve_prefix(self.prefix);
        let scheme = ctx.resolve_scheme(self.scheme);

        let rows = (0..self.count)
            .map(|_| generate_one(scheme, &prefix))
            .collect::<Result<Vec<_>>>()?;

        info!(count = rows.len(), prefix = %prefix, ?scheme, "generated ids");
        print_output(&rows, ctx.format);
        Ok(())
    }
}

fn generate_one(scheme: SchemeArg, prefix: &str) -> Result<GeneratedRow> {
    let (id, bare, scheme) = match scheme {
        SchemeArg::Cuid => {
            let id = Cuid::generate(prefix);
            (id.to_string(), id.bare().to_string(), id.scheme())
        }
        SchemeArg::Char => {
            let id = CharId::from_parts(prefix, Ulid::new().to_string().to_lowercase())?;
            (id.to_string(), id.bare().to_string(), id.scheme())
        }
    };

    Ok(GeneratedRow {
        id,
        prefix: prefix.to_string(),
        bare,
        scheme: scheme.to_string(),
    })
}
