mod export;
mod lookup;
mod refresh;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scribestats_core::SortKey;
use scribestats_store::{HistoryStore, PERSONAL_STATS};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "scribestats")]
#[command(about = "Writer analytics: extract, track, and export article statistics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Views,
    Reads,
    ReadPercent,
    Fans,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Views => SortKey::Views,
            SortArg::Reads => SortKey::Reads,
            SortArg::ReadPercent => SortKey::ReadRate,
            SortArg::Fans => SortKey::Fans,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the stats dashboard, aggregate, and append a snapshot to history
    Refresh {
        /// Read dashboard HTML from a file instead of fetching live
        #[arg(long)]
        input: Option<PathBuf>,
        /// Display sort key
        #[arg(long, value_enum, default_value_t = SortArg::Views)]
        sort: SortArg,
        /// Skip the per-article engagement and earnings fetches
        #[arg(long)]
        no_enrich: bool,
    },
    /// Print the entries of a history log
    History {
        #[arg(long, default_value = PERSONAL_STATS)]
        log: String,
        /// Only the most recent N entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Derive a numeric growth series from a history log
    Growth {
        #[arg(long, default_value = PERSONAL_STATS)]
        log: String,
        /// Snapshot field to chart, e.g. totalViews or followerCount
        #[arg(long, default_value = "totalViews")]
        field: String,
    },
    /// Write a history log as portable JSON
    ExportHistory {
        #[arg(long, default_value = PERSONAL_STATS)]
        log: String,
        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace a history log from a previously exported JSON file
    ImportHistory {
        #[arg(long, default_value = PERSONAL_STATS)]
        log: String,
        input: PathBuf,
    },
    /// Export the latest snapshot's article table as CSV
    ExportCsv {
        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Top stories for a tag
    Tag { tag: String },
    /// An author's recent articles
    Author { username: String },
    /// Follower and article counts for a publication
    Publication { publication: String },
    /// Trending stories from the site homepage
    Trending,
    /// Show or change persisted settings
    Settings {
        /// Turn milestone notifications on or off
        #[arg(long)]
        notifications: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = scribestats_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = HistoryStore::open(&config.data_dir)?;
    let cli = Cli::parse();
    match cli.command {
        Commands::Refresh {
            input,
            sort,
            no_enrich,
        } => refresh::run_refresh(&config, &store, input.as_deref(), sort.into(), no_enrich).await,
        Commands::History { log, limit } => run_history(&store, &log, limit),
        Commands::Growth { log, field } => run_growth(&store, &log, &field),
        Commands::ExportHistory { log, output } => {
            export::run_export_history(&store, &log, output.as_deref())
        }
        Commands::ImportHistory { log, input } => {
            export::run_import_history(&store, &log, &input)
        }
        Commands::ExportCsv { output } => export::run_export_csv(&store, output.as_deref()),
        Commands::Tag { tag } => lookup::run_tag(&config, &store, &tag).await,
        Commands::Author { username } => lookup::run_author(&config, &store, &username).await,
        Commands::Publication { publication } => {
            lookup::run_publication(&config, &publication).await
        }
        Commands::Trending => lookup::run_trending(&config).await,
        Commands::Settings { notifications } => run_settings(&store, notifications),
    }
}

fn run_history(store: &HistoryStore, log: &str, limit: Option<usize>) -> anyhow::Result<()> {
    let entries = store.read(log)?;
    if entries.is_empty() {
        println!("no entries in log '{log}'");
        return Ok(());
    }
    let skip = limit.map_or(0, |n| entries.len().saturating_sub(n));
    for entry in &entries[skip..] {
        println!("{}  {}", entry.timestamp.to_rfc3339(), entry.data);
    }
    Ok(())
}

fn run_growth(store: &HistoryStore, log: &str, field: &str) -> anyhow::Result<()> {
    let series = store.derive_growth(log, field)?;
    if series.points.is_empty() {
        println!("no numeric '{field}' values recorded in log '{log}'");
        return Ok(());
    }
    for point in &series.points {
        println!("{}  {}", point.timestamp.to_rfc3339(), point.value);
    }
    match series.delta() {
        Some(delta) => println!("change since previous capture: {delta:+}"),
        None => println!("insufficient data for a trend (need at least two captures)"),
    }
    Ok(())
}

fn run_settings(store: &HistoryStore, notifications: Option<bool>) -> anyhow::Result<()> {
    match notifications {
        Some(value) => {
            let mut settings = store.settings()?;
            settings.notifications = value;
            store.save_settings(&settings)?;
            println!(
                "milestone notifications {}",
                if value { "enabled" } else { "disabled" }
            );
        }
        None => {
            let settings = store.settings()?;
            println!(
                "milestone notifications: {}",
                if settings.notifications { "on" } else { "off" }
            );
        }
    }
    Ok(())
}
