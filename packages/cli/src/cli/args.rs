use clap::{Args, ValueEnum};
use sqlproxy_dialect::Value;

use crate::input::parse_arg_value;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    /// Only the converted SQL text.
    Sql,
}

#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// Output format for the conversion result.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Bind argument as a JSON scalar (`1`, `"a"`, `null`, `true`); bare text
    /// that is not JSON is taken as a string. Repeat in placeholder order.
    /// Without arguments the statement is converted for preparation and its
    /// placeholders keep their source ordinals.
    #[arg(long = "arg", value_parser = parse_arg_value)]
    pub args: Vec<Value>,

    /// SQL statement text, '-' for stdin or '@path' for a file.
    pub sql: String,
}

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Bind argument as a JSON scalar. Repeat in placeholder order.
    #[arg(long = "arg", value_parser = parse_arg_value)]
    pub args: Vec<Value>,

    /// Also print the query description line used for query logging.
    #[arg(long)]
    pub describe: bool,

    /// SQL statement text, '-' for stdin or '@path' for a file.
    pub sql: String,
}
