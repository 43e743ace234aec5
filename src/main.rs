//! PodSearch CLI
//!
//! Interactive terminal search over the podcast catalog, plus a one-shot
//! `search` command for scripting.

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use podsearch::{catalog, AppConfig, IndexOptions, SearchIndex, DEFAULT_ENDPOINT};
use std::path::PathBuf;
use std::time::Duration;

/// PodSearch - fuzzy search for podcast shows
#[derive(Parser)]
#[command(name = "podsearch")]
#[command(author = "PodSearch Contributors")]
#[command(version)]
#[command(about = "Fuzzy search for podcast shows", long_about = None)]
struct Cli {
    /// Catalog endpoint returning a JSON array of shows
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Log file (default: podsearch.log next to the executable)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search box (default)
    Tui {
        /// Quiet period in milliseconds before a lookup runs
        #[arg(long, default_value = "100")]
        debounce_ms: u64,
    },

    /// Search once and print the matching shows
    Search {
        /// Search query (use -- before the query if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Maximum results
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Show match scores
        #[arg(long)]
        scores: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let mut config = AppConfig {
        endpoint: cli.endpoint,
        log_file: cli.log_file,
        ..AppConfig::default()
    };

    let log_path = config.log_path();
    if let Err(e) = podsearch::logging::init(&log_path) {
        eprintln!(
            "{} logging disabled ({}): {}",
            style("Warning:").yellow().bold(),
            log_path.display(),
            e
        );
    }

    let result = match cli.command {
        None => podsearch::tui::run(&config),
        Some(Commands::Tui { debounce_ms }) => {
            config.debounce = Duration::from_millis(debounce_ms);
            podsearch::tui::run(&config)
        }
        Some(Commands::Search {
            query,
            limit,
            scores,
            json,
        }) => cmd_search(&config, &query, limit, scores, json),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "podsearch failed");
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_search(
    config: &AppConfig,
    query: &str,
    limit: usize,
    scores: bool,
    json: bool,
) -> podsearch::Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Fetching {}", config.endpoint));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let fetched = catalog::client().and_then(|c| catalog::fetch_catalog(&c, &config.endpoint));
    spinner.finish_and_clear();
    let shows = fetched?;

    let index = SearchIndex::new(shows, IndexOptions::default());
    let hits: Vec<_> = index.search(query).into_iter().take(limit).collect();

    if json {
        let items: Vec<_> = hits.iter().map(|h| h.item).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("{}", style(format!("No shows match '{}'", query)).dim());
        return Ok(());
    }

    for hit in &hits {
        let genres = hit.item.genre_names().join(", ");
        let mut line = format!("{}", style(&hit.item.title).bold());
        if !genres.is_empty() {
            line.push_str(&format!("  {}", style(genres).cyan()));
        }
        if scores {
            if let Some(score) = hit.score {
                line.push_str(&format!("  {}", style(format!("({})", score)).dim()));
            }
        }
        println!("{}", line);
    }
    println!(
        "{}",
        style(format!("{} of {} shows matched", hits.len(), index.len())).dim()
    );

    Ok(())
}
