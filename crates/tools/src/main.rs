use anyhow::{Context, Result};
use clap::Parser;
use labyrinth::{InputJournal, LevelCatalog, ReplayResult, SessionConfig, replay_to_end};
use std::fs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the journal JSON file to replay
    #[arg(short, long)]
    journal: String,
    /// Optional JSON level catalog replacing the built-in levels
    #[arg(short, long)]
    levels: Option<String>,
    /// Ticks to run before giving up on an unfinished session
    #[arg(long, default_value_t = 108_000)]
    max_ticks: u64,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let journal_data = fs::read_to_string(&args.journal)
        .with_context(|| format!("Failed to read journal file: {}", args.journal))?;
    let journal: InputJournal = serde_json::from_str(&journal_data)
        .with_context(|| "Failed to deserialize journal JSON")?;

    let catalog = match &args.levels {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read level catalog: {path}"))?;
            LevelCatalog::from_json(&text)
                .with_context(|| format!("Failed to parse level catalog: {path}"))?
        }
        None => LevelCatalog::builtin(),
    };

    let result: ReplayResult =
        replay_to_end(&catalog, &journal, &SessionConfig::default(), args.max_ticks)
            .context("Replay failed during execution")?;

    println!("Replay complete.");
    println!("Final Tick: {}", result.final_tick);
    println!("Outcome: {:?}", result.outcome.outcome);
    if let Some(cause) = result.outcome.cause {
        println!("Cause: {cause:?}");
    }
    println!("Elapsed: {:.2}s", result.outcome.elapsed_time_seconds);
    println!("Snapshot Hash: 0x{:016x}", result.final_snapshot_hash);

    Ok(())
}
