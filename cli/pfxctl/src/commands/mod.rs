//! CLI commands.

mod generate;
mod inspect;
mod sort;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::output::OutputFormat;

/// pfxctl - Work with prefixed identifiers.
#[derive(Debug, Parser)]
#[command(name = "pfxctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate new prefixed IDs.
    Generate(generate::GenerateCommand),

    /// Check values against a prefix and scheme.
    Validate(validate::ValidateCommand),

    /// Split a single ID into its parts.
    Inspect(inspect::InspectCommand),

    /// Sort IDs of one prefix by their bare value.
    Sort(sort::SortCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub fn run(self, config: Config) -> Result<()> {
        let ctx = CommandContext {
            config,
            format: OutputFormat::parse(&self.format),
        };

        match self.command {
            Commands::Generate(cmd) => cmd.run(ctx),
            Commands::Validate(cmd) => cmd.run(ctx),
            Commands::Inspect(cmd) => cmd.run(ctx),
            Commands::Sort(cmd) => cmd.run(ctx),
            Commands::Version => {
                println!("pfxctl {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Resolve the prefix, preferring the flag over configuration.
    pub fn resolve_prefix(&self, flag: Option<String>) -> String {
        flag.unwrap_or_else(|| self.config.default_prefix.clone())
    }

    /// Resolve the scheme, preferring the flag over configuration.
    pub fn resolve_scheme(&self, flag: Option<SchemeArg>) -> SchemeArg {
        flag.unwrap_or(self.config.default_scheme)
    }
}

/// Identifier scheme selectable on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    /// Collision-resistant IDs ('c' + at least 24 more characters).
    #[default]
    Cuid,
    /// Opaque non-empty strings; generated as lowercase ULIDs.
    Char,
}

impl SchemeArg {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cuid" => Some(SchemeArg::Cuid),
            "char" => Some(SchemeArg::Char),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_arg_parse() {
        assert_eq!(SchemeArg::parse("cuid"), Some(SchemeArg::Cuid));
        assert_eq!(SchemeArg::parse("CHAR"), Some(SchemeArg::Char));
        assert_eq!(SchemeArg::parse("uuid"), None);
    }

    #[test]
    fn test_cli_parses_sort_with_separator() {
        let cli = Cli::try_parse_from([
            "pfxctl",
            "--format",
            "json",
            "sort",
            "--separator",
            "_",
            "cus_a",
            "cus_b",
        ])
        .unwrap();
        assert_eq!(cli.format, "json");
        assert!(matches!(cli.command, Commands::Sort(_)));
    }

    #[test]
    fn test_resolve_prefers_flags() {
        let ctx = CommandContext {
            config: Config {
                log_level: "warn".to_string(),
                log_json: false,
                default_prefix: "cus_".to_string(),
                default_scheme: SchemeArg::Char,
            },
            format: OutputFormat::Table,
        };
        assert_eq!(ctx.resolve_prefix(None), "cus_");
        assert_eq!(ctx.resolve_prefix(Some("dev_".to_string())), "dev_");
        assert_eq!(ctx.resolve_scheme(None), SchemeArg::Char);
        assert_eq!(ctx.resolve_scheme(Some(SchemeArg::Cuid)), SchemeArg::Cuid);
    }
}
