use std::process;

fn main() {
    if let Err(error) = sqlproxy_cli::run() {
        eprintln!("sqlproxy-dialect: error: {error}");
        process::exit(1);
    }
}
