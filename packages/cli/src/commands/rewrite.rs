use crate::app::AppContext;
use crate::cli::args::{OutputFormat, RewriteArgs};
use crate::error::CliError;
use crate::input;
use crate::output;

pub fn run(context: &AppContext, args: RewriteArgs) -> Result<(), CliError> {
    let sql = input::resolve_sql(&args.sql)?;
    let converted = context.converter.convert(&sql, &args.args)?;

    match args.format {
        OutputFormat::Json => output::print_converted_json(&converted),
        OutputFormat::Table => output::print_converted_table(&converted),
        OutputFormat::Sql => println!("{}", converted.sql),
    }

    Ok(())
}
