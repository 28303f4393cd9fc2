//! Interactive REPL binary. spec.md §7: `CREATE DATABASE`, `SHOW
//! DATABASES`, `USE`, `HELP`, `exit`/`quit` are handled here; anything
//! else is handed to the query executor.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use structopt::StructOpt;

use limbodb::config::EngineConfig;
use limbodb::db::{self, Database};
use limbodb::query::Outcome;
use limbodb::{error_line, info_line};

#[derive(StructOpt)]
#[structopt(name = "limbodb", about = "single-node relational storage engine")]
struct Opt {
    /// Root directory for database files, overriding the config file.
    #[structopt(long)]
    data_dir: Option<PathBuf>,

    /// Path to a TOML config file.
    #[structopt(long)]
    config: Option<PathBuf>,
}

fn load_config(opt: &Opt) -> EngineConfig {
    let mut config = match &opt.config {
        Some(path) => match EngineConfig::from_toml_file(path) {
            Ok(c) => c,
            Err(err) => {
                error_line!("failed to read config {:?}: {}", path, err);
                EngineConfig::default()
            }
        },
        None => EngineConfig::default(),
    };
    if let Some(dir) = &opt.data_dir {
        config.data_dir = dir.clone();
    }
    config
}

fn main() {
    env_logger::init();
    let opt = Opt::from_args();
    let config = load_config(&opt);

    info_line!("limbodb ready. data directory: {:?}", config.data_dir);
    info_line!("type HELP for a list of commands.");

    let mut current: Option<Database> = None;
    let stdin = io::stdin();
    loop {
        print_prompt(&current);
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(err) => {
                error_line!("failed to read input: {}", err);
                continue;
            }
        }
        let line = line.trim().trim_end_matches(';').trim();
        if line.is_empty() {
            continue;
        }

        let upper = line.to_uppercase();
        if upper == "EXIT" || upper == "QUIT" {
            break;
        } else if upper == "HELP" {
            print_help();
        } else if upper == "SHOW DATABASES" {
            show_databases(&config);
        } else if let Some(name) = strip_keyword(line, "CREATE DATABASE ") {
            create_database(&config, name.trim());
        } else if let Some(name) = strip_keyword(line, "USE ") {
            current = use_database(&config, name.trim());
        } else {
            match &mut current {
                Some(db) => run_statement(db, line),
                None => error_line!("no database selected; run USE <name> first"),
            }
        }
    }

    if let Some(db) = &current {
        if let Err(err) = db.flush() {
            error_line!("failed to flush on exit: {}", err);
        }
    }
}

/// Case-insensitive prefix strip that keeps the original case of the rest
/// of the line, so `CREATE DATABASE demo`/`create database DEMO` both
/// yield a database name in the case the user actually typed.
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    if line.len() < keyword.len() {
        return None;
    }
    let (head, tail) = line.split_at(keyword.len());
    if head.eq_ignore_ascii_case(keyword) {
        Some(tail)
    } else {
        None
    }
}

fn print_prompt(current: &Option<Database>) {
    match current {
        Some(db) => print!("limbodb:{}> ", db.name()),
        None => print!("limbodb> "),
    }
    let _ = io::stdout().flush();
}

fn print_help() {
    info_line!("commands:");
    info_line!("  CREATE DATABASE <name>");
    info_line!("  SHOW DATABASES");
    info_line!("  USE <name>");
    info_line!("  HELP");
    info_line!("  EXIT | QUIT");
    info_line!("  any CREATE TABLE / DROP TABLE / CREATE INDEX / INSERT / DELETE / UPDATE / SELECT statement");
}

fn show_databases(config: &EngineConfig) {
    match db::list_databases(config) {
        Ok(names) if names.is_empty() => info_line!("no databases yet"),
        Ok(names) => {
            for name in names {
                info_line!("{}", name);
            }
        }
        Err(err) => error_line!("{}", err),
    }
}

fn create_database(config: &EngineConfig, name: &str) {
    if name.is_empty() {
        error_line!("CREATE DATABASE requires a name");
        return;
    }
    if db::database_exists(config, name) {
        error_line!("database '{}' already exists", name);
        return;
    }
    match Database::open(config, name) {
        Ok(_) => info_line!("database '{}' created", name),
        Err(err) => error_line!("{}", err),
    }
}

fn use_database(config: &EngineConfig, name: &str) -> Option<Database> {
    if name.is_empty() {
        error_line!("USE requires a database name");
        return None;
    }
    match Database::open(config, name) {
        Ok(db) => {
            info_line!("using database '{}'", name);
            Some(db)
        }
        Err(err) => {
            error_line!("{}", err);
            None
        }
    }
}

fn run_statement(db: &mut Database, statement: &str) {
    match db.execute(statement) {
        Ok(Outcome::TableCreated(name)) => info_line!("table '{}' created", name),
        Ok(Outcome::TableDropped(name)) => info_line!("table '{}' dropped", name),
        Ok(Outcome::IndexCreated { table, column }) => info_line!("index created on {}.{}", table, column),
        Ok(Outcome::RowInserted(id)) => info_line!("1 row inserted (record_id {})", id),
        Ok(Outcome::RowsAffected(n)) => info_line!("{} row(s) affected", n),
        Ok(Outcome::Rows { columns, rows }) => {
            print!("{}", limbodb::query::render_table(&columns, &rows));
            info_line!("{} row(s)", rows.len());
        }
        Err(err) => error_line!("{}", err),
    }
}
