//! skillet-search: Collect restaurants from the paginated search endpoint
//!
//! Usage:
//!   # Cookies copied from a browser session; the csrf cookie doubles as the token
//!   SKILLET_COOKIES='csrf=...; PHPSESSID=...' skillet-search --max-pages 5
//!
//!   # Another location
//!   skillet-search --cookies-file cookies.txt --city-id 4 --city-name Bengaluru \
//!       --entity-id 1234 --latitude 12.97 --longitude 77.59 --location-name "Indiranagar, Bengaluru"

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use skillet::input::read_text_file;
use skillet::search::{cookie_value, parse_cookies};
use skillet::{write_json_pretty, SearchConfig, SearchScraper};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "skillet-search")]
#[command(about = "Collect restaurants from the paginated search endpoint", long_about = None)]
struct Args {
    /// Cookie header string from a browser session
    #[arg(long, env = "SKILLET_COOKIES", hide_env_values = true)]
    cookies: Option<String>,

    /// Read the cookie header string from a file instead
    #[arg(long, conflicts_with = "cookies")]
    cookies_file: Option<PathBuf>,

    /// CSRF token (default: the `csrf` cookie)
    #[arg(long)]
    csrf: Option<String>,

    #[arg(long)]
    city_id: Option<u32>,

    #[arg(long)]
    city_name: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    latitude: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    longitude: Option<f64>,

    #[arg(long)]
    entity_id: Option<u64>,

    /// Location entity type, e.g. "subzone"
    #[arg(long)]
    entity_type: Option<String>,

    /// Display name of the location, e.g. "Kodailbail, Mangaluru"
    #[arg(long)]
    location_name: Option<String>,

    /// Maximum number of pages to fetch
    #[arg(long, default_value_t = 5)]
    max_pages: u32,

    /// Pause between pages in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Output JSON file
    #[arg(long, short = 'o', default_value = "restaurants.json")]
    output: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .init();

    let cookie_string = match (&args.cookies, &args.cookies_file) {
        (Some(s), _) => s.clone(),
        (None, Some(path)) => read_text_file(path)?,
        (None, None) => String::new(),
    };
    let cookies = parse_cookies(&cookie_string);
    debug!(count = cookies.len(), names = ?cookies.iter().map(|(n, _)| n).collect::<Vec<_>>(), "parsed cookies");

    let csrf_token = match args.csrf.or_else(|| cookie_value(&cookies, "csrf").map(str::to_string)) {
        Some(token) => token,
        None => bail!("No CSRF token: pass --csrf or include a csrf cookie"),
    };

    // Build config
    let mut config = SearchConfig {
        csrf_token,
        cookies,
        max_pages: args.max_pages,
        page_delay: Duration::from_millis(args.delay_ms),
        ..SearchConfig::default()
    };
    if let Some(city_id) = args.city_id {
        config.city_id = city_id;
    }
    if let Some(city_name) = args.city_name {
        config.city_name = city_name;
    }
    if let Some(latitude) = args.latitude {
        config.latitude = latitude;
    }
    if let Some(longitude) = args.longitude {
        config.longitude = longitude;
    }
    if let Some(entity_id) = args.entity_id {
        config.entity_id = entity_id;
    }
    if let Some(entity_type) = args.entity_type {
        config.entity_type = entity_type;
    }
    if let Some(location_name) = args.location_name {
        config.location_name = location_name;
    }

    let scraper = SearchScraper::over_http(config).context("Failed to set up HTTP client")?;
    info!(search_id = scraper.search_id(), "starting search");

    let restaurants = scraper.scrape();

    write_json_pretty(&args.output, &restaurants)?;
    println!("Total restaurants collected: {}", restaurants.len());
    println!("Saved to {}", args.output.display());

    Ok(())
}
