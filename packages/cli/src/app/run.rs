use super::context::AppContext;
use crate::cli::root::{Cli, Command};
use crate::commands;
use crate::error::CliError;
use clap::Parser;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Rewrite(args) => {
            let context = AppContext::load(
                cli.config.as_deref(),
                cli.metadata.as_deref(),
                cli.converter.as_deref(),
            )?;
            commands::rewrite::run(&context, args)
        }
        Command::Format(args) => commands::format::run(args),
    }
}

/// `RUST_LOG` wins over `--verbose`; logs go to stderr so stdout stays parseable.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info,sqlproxy_dialect=debug",
        _ => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
