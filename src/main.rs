use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use vlr_ingest::{AppConfig, Crawler, DocumentStore, Store, VlrClient};

#[derive(Parser)]
#[command(name = "vlr-ingest", about = "Crawl vlr.gg esports data into DuckDB", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl tours, their splits and matches into the store
    Crawl {
        /// Tour path to crawl instead of the configured list (repeatable)
        #[arg(short, long = "tour", value_name = "PATH")]
        tours: Vec<String>,
    },

    /// Store every player listed on vlr.gg `/stats` leaderboards
    CrawlPlayers {
        /// Leaderboard path to crawl instead of the configured list (repeatable)
        #[arg(short, long = "stats", value_name = "PATH")]
        pages: Vec<String>,
    },

    /// Show row counts of the crawled tables
    Stats,

    /// Apply schema migrations and seed reference data
    Migrate,

    /// Delete all crawled rows and match documents
    Wipe {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Verify that the database can be opened and report its version
    Check,
}

fn open_store(config: &AppConfig) -> Result<Store> {
    let url = config.require_database_url()?;
    let store = Store::open(url).with_context(|| format!("failed to open database at {url}"))?;
    Ok(store)
}

fn open_documents(config: &AppConfig) -> Result<Option<DocumentStore>> {
    config
        .document_store_url
        .as_deref()
        .map(|url| {
            DocumentStore::open(url).with_context(|| format!("failed to open document store at {url}"))
        })
        .transpose()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "vlr_ingest=info,warn",
        1 => "vlr_ingest=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Crawl { tours } => {
            let store = open_store(&config)?;
            store.run_migrations()?;
            store.seed_reference_data()?;
            let documents = open_documents(&config)?;
            let client = VlrClient::from_config(&config.scraper)?;

            let tours = if tours.is_empty() {
                config.crawl.tours.clone()
            } else {
                tours
            };
            info!(?tours, "starting crawl");

            let mut crawler = Crawler::new(&client, &store);
            if let Some(documents) = &documents {
                crawler = crawler.with_documents(documents);
            }
            let stats = crawler.run(&tours).await?;
            info!(
                "Done: {} tours, {} splits ({} failed), {} matches ({} skipped), {} game players",
                stats.tours,
                stats.splits_processed,
                stats.splits_failed,
                stats.matches_processed,
                stats.matches_skipped,
                stats.game_players_created
            );
        }

        Command::CrawlPlayers { pages } => {
            let store = open_store(&config)?;
            store.run_migrations()?;
            store.seed_reference_data()?;
            let client = VlrClient::from_config(&config.scraper)?;

            let pages = if pages.is_empty() {
                config.crawl.leaderboards.clone()
            } else {
                pages
            };
            if pages.is_empty() {
                bail!("no leaderboard given; pass --stats PATH or set crawl.leaderboards");
            }
            info!(?pages, "starting leaderboard crawl");

            let stats = Crawler::new(&client, &store).run_leaderboards(&pages).await?;
            info!("Done: {} players created", stats.players_created);
        }

        Command::Stats => {
            let counts = open_store(&config)?.counts()?;
            println!("─────────────────────────────────");
            println!("  vlr-ingest: Database Stats");
            println!("─────────────────────────────────");
            println!("  Regions      : {}", counts.regions);
            println!("  Teams        : {}", counts.teams);
            println!("  Players      : {}", counts.players);
            println!("  Tournaments  : {}", counts.tournaments);
            println!("  Splits       : {}", counts.splits);
            println!("  Matches      : {}", counts.matches);
            println!("  Games        : {}", counts.games);
            println!("  Game players : {}", counts.game_players);
            println!("─────────────────────────────────");
        }

        Command::Migrate => {
            let store = open_store(&config)?;
            store.run_migrations()?;
            store.seed_reference_data()?;
            println!("Migrations applied.");
        }

        Command::Wipe { yes } => {
            if !yes {
                bail!("refusing to wipe without --yes");
            }
            open_store(&config)?.wipe()?;
            if let Some(documents) = open_documents(&config)? {
                documents.clear()?;
            }
            println!("Crawled data deleted.");
        }

        Command::Check => {
            let version = open_store(&config)?.version()?;
            println!("Connection successful. DuckDB version: {version}");
        }
    }

    Ok(())
}
