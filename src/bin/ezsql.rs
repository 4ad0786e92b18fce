//! ezsql: compile JSON query documents to SQL.
//!
//! # Usage
//!
//! ```bash
//! # Compile with the configured dialect
//! ezsql compile query.json
//!
//! # Count query for Oracle, machine-readable
//! ezsql compile query.json --dialect oracle --count --format json
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use ezsql::prelude::*;
use ezsql::transpiler::dialect::standard as standard_dialects;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ezsql")]
#[command(version)]
#[command(about = "Compile query documents to parameterized SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    ezsql compile query.json
    ezsql compile query.json --dialect pg --count
    ezsql dialects")]
struct Cli {
    /// Config file (default: ./ezsql.toml, then the user config dir)
    #[arg(short, long, global = true, env = "EZSQL_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON query document
    Compile {
        /// Path to the query JSON
        query: PathBuf,

        /// Dialect tag (overrides the config)
        #[arg(short, long)]
        dialect: Option<String>,

        /// Emit the row-count query instead
        #[arg(long)]
        count: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// List the built-in dialects
    Dialects,
    /// List entities declared in the config
    Entities,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(p) => Config::from_path(p).with_context(|| format!("reading {}", p.display()))?,
        None => Config::load()?,
    };
    Ok(config)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Compile {
            query,
            dialect,
            count,
            format,
        } => {
            let config = load_config(cli.config.as_ref())?;
            compile_file(&config, query, dialect.as_deref(), *count, *format)
        }
        Commands::Dialects => {
            show_dialects();
            Ok(())
        }
        Commands::Entities => {
            let config = load_config(cli.config.as_ref())?;
            show_entities(&config)
        }
    }
}

fn compile_file(
    config: &Config,
    path: &Path,
    dialect: Option<&str>,
    count: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let query: Query = serde_json::from_str(&text).map_err(EzError::from)?;
    query.validate()?;

    let db = match dialect {
        Some(tag) => tag.parse::<DbType>()?,
        None => config.db_type()?,
    };
    let catalog = config.catalog()?;
    let compiler = Compiler::new(&catalog).with_options(config.options());
    let out = if count {
        compiler.compile_count(db, &query)?
    } else {
        compiler.compile(db, &query)?
    };

    match format {
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "dialect": db.tag(),
                "sql": out.sql,
                "names": out.names,
                "params": out.params.iter().map(Value::to_json).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "Dialect:".dimmed(), db.tag().cyan());
            println!("{}", "Generated SQL:".green().bold());
            println!("{}", out.sql.white());
            if !out.params.is_empty() {
                println!();
                println!("{}", "Parameters:".cyan());
                for (name, value) in out.names.iter().zip(&out.params) {
                    println!("  {} = {}", name, value.to_string().yellow());
                }
            }
        }
    }
    Ok(())
}

fn show_dialects() {
    println!("{}", "Dialects:".cyan().bold());
    for db in standard_dialects().db_types() {
        println!("  {}", db.tag().green());
    }
}

fn show_entities(config: &Config) -> anyhow::Result<()> {
    let catalog = config.catalog()?;
    if catalog.is_empty() {
        println!("{}", "No entities configured.".yellow());
        return Ok(());
    }
    println!("{}", "Entities:".cyan().bold());
    for name in catalog.names() {
        let info = catalog.entity(name)?;
        println!("  {} {} {}", info.name.green(), "→".dimmed(), info.table);
        for (field, column) in &info.fields {
            println!("      {} {}", field.yellow(), column.dimmed());
        }
    }
    Ok(())
}
