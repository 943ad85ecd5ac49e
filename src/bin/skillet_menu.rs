//! skillet-menu: Extract a restaurant menu into a clean CSV table
//!
//! Usage:
//!   # Fetch a restaurant page and write its menu
//!   skillet-menu https://www.zomato.com/mangalore/some-place/order menu.csv
//!
//!   # Work from a page saved earlier
//!   skillet-menu --from html page.html menu.csv
//!
//!   # Or from a dump of the preloaded state JSON
//!   skillet-menu --from state state.json menu.csv

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use skillet::menu::{self, MenuSummary, CATEGORY_KEY};
use skillet::{
    input, reconcile, write_csv, FlattenConfig, Flattener, HttpConfig, HttpFetcher, ReconcileConfig,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Source {
    /// Fetch the page over HTTP
    Url,
    /// Read a saved HTML page
    Html,
    /// Read a saved preloaded state JSON document
    State,
}

#[derive(Parser, Debug)]
#[command(name = "skillet-menu")]
#[command(about = "Extract a restaurant menu into a clean CSV table", long_about = None)]
struct Args {
    /// Restaurant page URL, or a file path with --from html/state
    #[arg(value_name = "SOURCE")]
    source: String,

    /// Output CSV path
    #[arg(value_name = "OUTPUT_CSV")]
    output: PathBuf,

    /// How to read SOURCE
    #[arg(long, value_enum, default_value = "url")]
    from: Source,

    /// Keep columns that are dropped as noise by default
    #[arg(long)]
    keep_all_columns: bool,

    /// Keep rows in page order instead of sorting by category and price
    #[arg(long)]
    no_sort: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Skip the summary printed after writing
    #[arg(long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();

    // Build config
    let mut config = ReconcileConfig::default();
    if args.keep_all_columns {
        config.drop_columns.clear();
    }
    if args.no_sort {
        config.sort_by.clear();
    }
    let flattener = Flattener::new(FlattenConfig {
        separator: config.separator.clone(),
    });

    info!(source = %args.source, "extracting menu data");
    let batch = match args.from {
        Source::Url => {
            let fetcher = HttpFetcher::new(HttpConfig {
                timeout: Duration::from_secs(args.timeout_secs),
                ..HttpConfig::default()
            })?;
            menu::fetch_menu(&fetcher, &args.source, &flattener)?
        }
        Source::Html => {
            let html = input::read_text_file(&args.source)?;
            menu::menu_from_html(&html, &flattener)?
        }
        Source::State => {
            let state = input::read_json_file(&args.source)?;
            menu::menu_records(&state, &flattener).context("Failed to read menu list")?
        }
    };

    info!(items = batch.len(), "processing and cleaning data");
    let table = reconcile(&batch, &config).context("Failed to build menu table")?;

    write_csv(&args.output, &table)?;
    println!("Processed menu data saved to {}", args.output.display());

    if !args.quiet {
        println!();
        print!("{}", MenuSummary::from_table(&table, CATEGORY_KEY, "price"));
    }

    Ok(())
}
