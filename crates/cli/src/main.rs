use anyhow::Result;
use clap::{Parser, Subcommand};
use tagger_core::config;
use tagger_core::config::AppConfig;
use tagger_core::pipeline::{self, CycleOutcome};
use tagger_core::selector;
use tagger_core::worker;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run => worker::run(cfg).await,
        Commands::Once { json } => run_once(cfg, json).await,
        Commands::Pending { limit, json } => run_pending(cfg, limit, json).await,
    }
}

#[derive(Parser)]
#[command(name = "catalog-tagger")]
#[command(about = "AI tagging worker for the media catalog", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tagging worker until externally terminated
    Run,
    /// Process at most one untagged image, then exit
    Once {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// List images that still lack AI tags
    Pending {
        /// Maximum number of rows to list
        #[arg(long, default_value_t = 20)]
        limit: i64,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

async fn run_once(cfg: AppConfig, json: bool) -> Result<()> {
    let pool = storage::connect(&cfg.database.path).await?;
    let registry = pipeline::build_registry(&cfg);
    let tagger = registry.tagger(Some(cfg.tagger.provider.as_str()))?;

    let outcome = pipeline::run_cycle(&pool, tagger.as_ref(), &[]).await?;
    if json {
        let payload = match &outcome {
            CycleOutcome::Tagged { media_id, tags } => serde_json::json!({
                "status": "tagged",
                "media_id": media_id,
                "tags": tags,
            }),
            CycleOutcome::Failed { media_id } => serde_json::json!({
                "status": "failed",
                "media_id": media_id,
            }),
            CycleOutcome::Idle => serde_json::json!({ "status": "idle" }),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        match &outcome {
            CycleOutcome::Tagged { media_id, tags } => {
                println!("tagged {}: {}", media_id, tags.join(", "))
            }
            CycleOutcome::Failed { media_id } => {
                println!("failed {} (left untagged, will be retried)", media_id)
            }
            CycleOutcome::Idle => println!("no untagged images"),
        }
    }
    Ok(())
}

async fn run_pending(cfg: AppConfig, limit: i64, json: bool) -> Result<()> {
    let pool = storage::connect(&cfg.database.path).await?;
    let count = selector::pending_count(&pool).await?;
    let items = selector::pending_items(&pool, limit).await?;

    if json {
        let payload = serde_json::json!({
            "pending": count,
            "items": items,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{} image(s) pending", count);
        for item in &items {
            println!("{}  {}", item.id, item.path);
        }
    }
    Ok(())
}
