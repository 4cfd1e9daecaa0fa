//! VoteVision demo binary.
//!
//! Opens the configured store (seeding the demo polls on first run) and
//! prints every ranked view followed by per-poll results.

use std::process::ExitCode;
use std::sync::Arc;

use vote_vision::adapters::{FileKeyValueStore, InMemoryKeyValueStore};
use vote_vision::application::PollStore;
use vote_vision::config::{AppConfig, StorageBackend};
use vote_vision::domain::foundation::Timestamp;
use vote_vision::domain::ranking::RankingCategory;
use vote_vision::ports::KeyValueStore;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = config
        .logging
        .env_filter()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryKeyValueStore::new()),
        StorageBackend::File => Arc::new(FileKeyValueStore::new(&config.storage.data_dir)),
    };
    tracing::info!("Using {:?} storage", config.storage.backend);

    let store = PollStore::open(storage).await?;
    let engine = config.ranking.engine();
    let now = Timestamp::now();

    for category in RankingCategory::all() {
        let ranked = store
            .ranked(&engine, *category, config.ranking.default_limit)
            .await;
        println!("== {} ({}) ==", category, ranked.len());
        for poll in &ranked {
            println!(
                "  {:<50} {:>5} votes  {}",
                poll.question(),
                poll.total_votes(),
                poll.created_at().age_label(&now)
            );
        }
    }

    for poll in store.list_polls().await {
        let results = store.results(poll.id()).await?;
        let voted = store.voted_option(poll.id()).await;
        println!("\n{} [{}]", results.question, results.poll_id);
        for option in &results.options {
            let marker = if voted.as_ref() == Some(&option.option_id) {
                "*"
            } else {
                " "
            };
            println!(
                " {} {:<30} {:>5} ({:.1}%)",
                marker, option.text, option.votes, option.percentage
            );
        }
        let suffix = if results.total_votes == 1 { "" } else { "s" };
        println!("  Total: {} vote{}", results.total_votes, suffix);
    }

    Ok(())
}
