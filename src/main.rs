use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use gemprint::analysis::traits::AnalysisProviders;
use gemprint::config::Config;
use gemprint::fingerprint::builder::{Fingerprint, Record};
use gemprint::gematrix::client::GematrixClient;
use gemprint::output::files::Exporter;
use gemprint::output::terminal;
use gemprint::pipeline::pages::{PageLimit, PageRequests, StdinPrompt};
use gemprint::pipeline::session::PageSession;
use gemprint::scoring::aggregate::composite_score;

/// Gemprint: stylometric fingerprints for gematria search results.
///
/// Scores every phrase on a results page, merges phrases that land on the
/// same score, and flags scores that sit close to one another.
#[derive(Parser)]
#[command(name = "gemprint", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a word, phrase, or number and fingerprint the results page by page
    Search {
        /// What to search for (prompted for if omitted)
        query: Option<String>,

        /// First page to fetch (default: 1)
        #[arg(long, default_value = "1")]
        start_page: u32,

        /// Process this many pages without prompting
        #[arg(long)]
        pages: Option<u32>,

        /// Also export one table merged across all pages
        #[arg(long)]
        consolidate: bool,
    },

    /// Fingerprint a single phrase offline and show how its score is built
    Score {
        /// The phrase to analyze
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gemprint=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            start_page,
            pages,
            consolidate,
        } => {
            let config = Config::load()?;
            let query = match query {
                Some(q) => q,
                None => prompt_query()?,
            };
            if query.trim().is_empty() {
                anyhow::bail!("Nothing to search for. Pass a query or type one at the prompt.");
            }

            info!(query = %query, start_page, "Starting search session");

            let client = GematrixClient::new(&config)?;
            let providers = AnalysisProviders::default();
            let exporter = Exporter::new(&config.output_dir);
            let session =
                PageSession::new(&client, &providers, &exporter).with_consolidation(consolidate);

            let summary = match pages {
                Some(limit) => {
                    session
                        .run(PageRequests::new(query, start_page, PageLimit::new(limit)))
                        .await?
                }
                None => {
                    session
                        .run(PageRequests::new(query, start_page, StdinPrompt))
                        .await?
                }
            };

            println!("\n{}", "Session complete.".bold());
            println!("  Pages processed: {}", summary.pages);
            println!("  Fingerprints:    {}", summary.fingerprints);
            if summary.fetch_failures > 0 {
                println!(
                    "  {} {} page(s) failed to fetch",
                    "Warning:".yellow(),
                    summary.fetch_failures
                );
            }
            println!("  Output:          {}", exporter.dir().display());
        }

        Commands::Score { text } => {
            let providers = AnalysisProviders::default();
            let analysis = providers.analyze(&text);

            let fingerprint = Fingerprint::new(
                Record {
                    phrase: text.clone(),
                    jewish_value: String::new(),
                    english_value: String::new(),
                    simple_value: String::new(),
                    search_count: String::new(),
                },
                analysis.clone(),
            );
            let score = composite_score(&fingerprint);

            terminal::display_phrase_analysis(&text, &fingerprint.features, &analysis, score);
        }
    }

    Ok(())
}

/// Ask for the search query on stdin.
fn prompt_query() -> Result<String> {
    print!("Enter a word, phrase, or number to search: ");
    io::stdout().flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read search query")?;
    Ok(line.trim().to_string())
}
