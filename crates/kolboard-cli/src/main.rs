mod analyze;
mod contacts;
mod runner;
mod store;

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use kolboard_core::{MergePolicy, Platform, TierTable, UntieredPolicy};
use kolboard_pipeline::DuplicateMode;

#[derive(Debug, Parser)]
#[command(name = "kolboard")]
#[command(about = "KOL profile metrics and contact reconciliation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Inputs shared by `analyze` and `reconcile`.
#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Scraper dataset: a JSON array of items or an object with an `items` array.
    #[arg(long)]
    items: PathBuf,

    /// Usernames to report on, comma-separated. Profiles found in the
    /// dataset but not listed here are reported after these.
    #[arg(long, value_delimiter = ',')]
    usernames: Vec<String>,

    /// Aggregation preset: a built-in name or one declared in the presets file.
    #[arg(long, default_value = "quick-scan")]
    preset: String,

    /// Tier threshold table; defaults to `KOLBOARD_TIER_TABLE`.
    #[arg(long)]
    tier_table: Option<TierTable>,

    /// What to do with profiles below the tier floor; defaults to
    /// `KOLBOARD_UNTIERED_POLICY`.
    #[arg(long)]
    untiered: Option<UntieredPolicy>,

    #[arg(long, default_value = "tiktok")]
    platform: Platform,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build canonical profile records from a scraper dataset.
    Analyze(AnalyzeArgs),
    /// Build records, then plan how they merge into a store snapshot.
    Reconcile {
        #[command(flatten)]
        input: AnalyzeArgs,

        /// Store snapshot: JSON array of `{ id, username, campaign_id, platform }`.
        #[arg(long)]
        store: PathBuf,

        /// Only compare against rows of this campaign.
        #[arg(long)]
        campaign: Option<String>,

        /// Merge policy; defaults to `KOLBOARD_MERGE_POLICY`.
        #[arg(long)]
        policy: Option<MergePolicy>,
    },
    /// Extract email and phone from a biography.
    Contacts {
        #[arg(long)]
        bio: String,

        /// Known email; kept as-is and only filled when empty.
        #[arg(long, default_value = "")]
        email: String,

        /// Known phone; kept as-is and only filled when empty.
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// List store rows that duplicate an earlier row.
    DedupeStore {
        #[arg(long)]
        store: PathBuf,

        /// `per-campaign` or `global`.
        #[arg(long, default_value = "per-campaign")]
        mode: DuplicateMode,
    },
    /// List built-in and configured aggregation presets.
    Presets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = kolboard_core::load_app_config()?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Analyze(args)) => analyze::run_analyze(&config, &args).await?,
        Some(Commands::Reconcile {
            input,
            store: snapshot,
            campaign,
            policy,
        }) => {
            analyze::run_reconcile(&config, &input, &snapshot, campaign, policy).await?;
        }
        Some(Commands::Contacts { bio, email, phone }) => {
            contacts::run_contacts(&bio, email, phone)?;
        }
        Some(Commands::DedupeStore {
            store: snapshot,
            mode,
        }) => store::run_dedupe_store(&snapshot, mode).await?,
        Some(Commands::Presets) => analyze::run_list_presets(&config)?,
        None => Cli::command().print_help()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
