use super::args::{FormatArgs, RewriteArgs};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sqlproxy-dialect")]
#[command(about = "Rewrite MySQL statements for Oracle-family backends")]
pub struct Cli {
    /// Converter settings as TOML.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Schema metadata (unique indexes, columns, identity columns) as JSON.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub metadata: Option<PathBuf>,

    /// Converter name; overrides the `kind` of the config file.
    #[arg(long, global = true)]
    pub converter: Option<String>,

    /// Raise log verbosity. Ignored when RUST_LOG is set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert one statement and its bind arguments for the target backend.
    Rewrite(RewriteArgs),
    /// Inline bind arguments into a statement for logging.
    Format(FormatArgs),
}
