//! bookfinder: search Google Books by title and author.
//!
//! Runs one search through the background loader, then prints the result
//! list or, with `--detail N`, the full record of the N-th result.

mod config;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bookfinder_core::{BookLoader, BooksClient, OrderBy, SearchQuery, UreqTransport};
use clap::Parser;
use log::debug;

use config::{default_config_path, load_config, Config, Overrides, Settings};
use render::{render_detail, render_list};

#[derive(Parser)]
#[command(name = "bookfinder")]
#[command(about = "Search Google Books by title and author")]
#[command(version)]
struct Args {
    /// Book title (required)
    #[arg(long, short)]
    title: String,

    /// Author name
    #[arg(long, short)]
    author: Option<String>,

    /// Number of results to request (1-40)
    #[arg(long)]
    max_results: Option<u32>,

    /// Result ordering: relevance or newest
    #[arg(long)]
    order_by: Option<OrderBy>,

    /// API base URL, e.g. a local mock server
    #[arg(long)]
    base_url: Option<String>,

    /// Settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show the full record of the N-th result (1-based)
    #[arg(long, value_name = "N")]
    detail: Option<usize>,

    /// Print records as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config.clone() {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!(
                "Failed to load config from {}: {:#}. Using defaults.",
                config_path.display(),
                err
            );
            Config::default()
        }
    };

    let settings = Settings::resolve(
        &config,
        Overrides {
            max_results: args.max_results,
            order_by: args.order_by,
            base_url: args.base_url.clone(),
        },
    );
    debug!("settings: {settings:?}");

    let query = SearchQuery::new(&args.title, args.author.as_deref())?;
    let client = BooksClient::new(&settings.base_url);
    let mut loader = BookLoader::new(client, UreqTransport::new(settings.timeouts));
    loader.search(&query, &settings.options)?;
    let books = loader.wait().unwrap_or_else(|| loader.results());

    if let Some(err) = loader.last_error() {
        debug!("search failed with {:?}: {err}", err.kind());
    }

    match args.detail {
        Some(n) => {
            let book = n
                .checked_sub(1)
                .and_then(|index| loader.book(index))
                .with_context(|| format!("no result #{n}; the search returned {} books", books.len()))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(book)?);
            } else {
                print!("{}", render_detail(book));
            }
        }
        None => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&*books)?);
            } else {
                print!("{}", render_list(&books));
            }
        }
    }
    Ok(())
}
