use sqlite_helper::config::{self, DatabaseConfig};
use sqlite_helper::{Connection, Result, TablePrinter};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: sqlite-demo [--config FILE] [DB_PATH] [SQL ...]";

const DEMO_STATEMENTS: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS example_table (id INTEGER PRIMARY KEY, name TEXT, age INTEGER);",
    "INSERT INTO example_table (name, age) VALUES ('John', 25), ('Alice', 30), ('Bob', 22);",
    "SELECT * FROM example_table;",
];

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    db_path: Option<PathBuf>,
    statements: Vec<String>,
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> std::result::Result<Args, String> {
    let mut args = Args::default();
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--config" => {
                let path = raw.next().ok_or("--config needs a file argument")?;
                args.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if args.db_path.is_none() => args.db_path = Some(PathBuf::from(arg)),
            _ => args.statements.push(arg),
        }
    }
    Ok(args)
}

fn run(args: Args) -> Result<()> {
    let mut database = match &args.config {
        Some(path) => config::load_config(path)?.database,
        None => DatabaseConfig::default(),
    };
    if let Some(path) = args.db_path {
        database.path = path;
    }

    info!(path = %database.path.display(), "opening database");
    let mut connection = Connection::open_with_config(&database)?;

    let statements: Vec<&str> = if args.statements.is_empty() {
        DEMO_STATEMENTS.to_vec()
    } else {
        args.statements.iter().map(String::as_str).collect()
    };

    for sql in statements {
        if let Some(result) = connection.execute(sql)? {
            TablePrinter::new(&result).print()?;
        }
    }

    connection.close()
}

fn main() -> ExitCode {
    // Logs go to stderr so the printed table stays alone on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("SQLite Exception: {}", e);
            ExitCode::FAILURE
        }
    }
}
