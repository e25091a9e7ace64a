//! rwsync - Export highlighted articles from Readwise to JSON
//!
//! Intended to run from a scheduler (e.g. a daily workflow); the exit
//! status reports success or failure. Manual runs can override the sync
//! window with --start-date/--end-date or --all-time.

use anyhow::Result;
use clap::Parser;
use highlights::storage::JsonArticleStore;
use highlights::sync::{SyncOptions, sync_articles};
use highlights::{ReadwiseClient, ReadwiseCredentials};
use log::{error, info};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rwsync", about = "Sync highlighted Readwise articles to a JSON file", version)]
struct Args {
    /// Fetch items highlighted on or after this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    start_date: Option<String>,

    /// Fetch items highlighted up to and including this date (requires --start-date)
    #[arg(long, value_name = "YYYY-MM-DD")]
    end_date: Option<String>,

    /// Fetch everything, ignoring dates and the stored checkpoint
    #[arg(long)]
    all_time: bool,

    /// Directory for articles.json and last_update.json
    /// (default: $OUTPUT_DIR, or ./readwise_exports)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("Sync failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    // Missing credentials fail here, before any network call
    let credentials = ReadwiseCredentials::from_env()?;

    let output_dir = args.output_dir.unwrap_or_else(config::output_dir);
    let store = JsonArticleStore::new(&output_dir)?;
    let client = ReadwiseClient::new(credentials);

    let options = SyncOptions {
        start_date: args.start_date,
        end_date: args.end_date,
        all_time: args.all_time,
    };

    let stats = sync_articles(&client, &store, &options)?;
    info!(
        "Done: {} new articles, {} total in {}",
        stats.articles_new,
        stats.total_articles,
        output_dir.display()
    );
    Ok(())
}
