//! lattes: analyse a directory of Lattes curriculum exports.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lattes_cli::commands::{self, FilterArgs, Session};
use lattes_cli::config::Config;
use lattes_ingestion::ImportMode;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lattes", about = "Lattes curriculum analytics", version)]
struct Cli {
    /// Config file; must exist when given. Defaults to lattes.toml if present
    #[arg(short, long, env = "LATTES_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of per-researcher CSV tables
    #[arg(long, env = "LATTES_CSV_DIR")]
    csv_dir: Option<PathBuf>,

    /// Journal ranking file used for enrichment
    #[arg(long, env = "LATTES_CATALOG")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Corpus-wide statistics as JSON
    Stats,
    /// Profile of one researcher as JSON
    Researcher { id: String },
    /// Search articles by title, issn, doi or year
    Search {
        query: String,
        #[arg(short, long, default_value = "title")]
        field: String,
        /// SJR range as min:max
        #[arg(long)]
        sjr: Option<String>,
        /// H index range as min:max
        #[arg(long)]
        h_index: Option<String>,
        /// Substring of the journal categories
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        year: Option<String>,
        /// Fail on an invalid filter instead of ignoring it
        #[arg(long)]
        strict: bool,
        /// Write the hits as CSV instead of printing them
        #[arg(long)]
        export: bool,
        /// Export path; the configured one when omitted
        #[arg(short, long, requires = "export")]
        output: Option<PathBuf>,
    },
    /// Import a CSV table into a researcher's curriculum
    Import {
        id: String,
        /// Entity name, e.g. ARTIGOS-PUBLICADOS
        entity: String,
        file: PathBuf,
        /// replace, merge or abort
        #[arg(short, long, default_value = "merge")]
        mode: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lattes=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_explicit(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.csv_dir {
        config.data.csv_dir = dir;
    }
    if let Some(catalog) = cli.catalog {
        config.data.catalog_path = catalog;
    }

    match cli.command {
        Command::Stats => {
            let session = Session::open(config)?;
            print_json(&commands::corpus_stats(&session))
        }
        Command::Researcher { id } => {
            let session = Session::open(config)?;
            print_json(&commands::researcher_profile(&session, &id)?)
        }
        Command::Search { query, field, sjr, h_index, category, year, strict, export, output } => {
            let session = Session::open(config)?;
            let filters = FilterArgs { sjr, h_index, category, year, strict };
            let results = commands::search(&session, &query, &field, &filters)?;
            if export {
                let path = commands::export(&session, &results, output.as_deref())?;
                println!("{} rows exported to {}", results.len(), path.display());
                Ok(())
            } else {
                print_json(&results)
            }
        }
        Command::Import { id, entity, file, mode } => {
            let mode = ImportMode::parse(&mode)
                .with_context(|| format!("Unknown import mode {mode:?} (replace, merge, abort)"))?;
            print_json(&commands::import(&config, &id, &entity, &file, mode)?)
        }
    }
}
