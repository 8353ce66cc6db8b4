//! Sort command.

use anyhow::Result;
use clap::Args;
use pfx_id::{sort_ids, CharScheme, CuidScheme, IdError, PrefixedId, Scheme};
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use crate::output::print_output;

use super::{CommandContext, SchemeArg};

/// Sort IDs of one prefix by their bare value.
///
/// IDs with different prefixes cannot be ordered against each other.
#[derive(Debug, Args)]
pub struct SortCommand {
    /// IDs to sort.
    #[arg(required = true)]
    values: Vec<String>,

    /// Prefix shared by every value (defaults to PFX_DEFAULT_PREFIX).
    #[arg(long, short, conflicts_with = "separator")]
    prefix: Option<String>,

    /// Take each value's prefix to be everything up to and including
    /// the first occurrence of this separator.
    #[arg(long)]
    separator: Option<String>,

    /// Identifier scheme (defaults to PFX_DEFAULT_SCHEME).
    #[arg(long, short, value_enum)]
    scheme: Option<SchemeArg>,
}

#[derive(Debug, Serialize, Tabled)]
struct SortedRow {
    #[tabled(rename = "#")]
    position: usize,

    #[tabled(rename = "ID")]
    id: String,
}

impl SortCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let scheme = ctx.resolve_scheme(self.scheme);
        let resolver = match self.separator {
            Some(sep) => PrefixResolver::Separator(sep),
            None => PrefixResolver::Fixed(ctx.resolve_prefix(self.prefix)),
        };

        let sorted = match scheme {
            SchemeArg::Cuid => sort_values::<CuidScheme>(&self.values, &resolver)?,
            SchemeArg::Char => sort_values::<CharScheme>(&self.values, &resolver)?,
        };

        let rows: Vec<SortedRow> = sorted
            .into_iter()
            .enumerate()
            .map(|(i, id)| SortedRow {
                position: i + 1,
                id,
            })
            .collect();
        print_output(&rows, ctx.format);
        Ok(())
    }
}

enum PrefixResolver {
    Fixed(String),
    Separator(String),
}

impl PrefixResolver {
    fn prefix_of<'a>(&'a self, value: &'a str) -> &'a str {
        match self {
            PrefixResolver::Fixed(prefix) => prefix,
            PrefixResolver::Separator(sep) => match value.find(sep.as_str()) {
                Some(idx) => &value[..idx + sep.len()],
                None => "",
            },
        }
    }
}

fn sort_values<S: Scheme>(
    values: &[String],
    resolver: &PrefixResolver,
) -> Result<Vec<String>, IdError> {
    let mut ids = values
        .iter()
        .map(|v| PrefixedId::<S>::parse(v, resolver.prefix_of(v)))
        .collect::<Result<Vec<_>, _>>()?;

    sort_ids(&mut ids)?;
    debug!(count = ids.len(), "sorted ids");
    Ok(ids.iter().map(ToString::to_string).collect())
}
