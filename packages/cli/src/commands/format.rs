use std::time::Instant;

use sqlproxy_dialect::{describe_query, render, StatementKind};

use crate::cli::args::FormatArgs;
use crate::error::CliError;
use crate::input;

pub fn run(args: FormatArgs) -> Result<(), CliError> {
    let sql = input::resolve_sql(&args.sql)?;
    let started = Instant::now();
    let rendered = render(&sql, &args.args);
    let elapsed = started.elapsed();

    if args.describe {
        let error = rendered.as_ref().err();
        println!(
            "{}",
            describe_query(
                "cli",
                StatementKind::preview(&sql).as_str(),
                &sql,
                &args.args,
                elapsed,
                error.map(|error| error as &dyn std::fmt::Display),
            )
        );
    }

    println!("{}", rendered?);
    Ok(())
}
