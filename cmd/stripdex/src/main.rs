//! stripdex - Download comic metadata and cluster it into an offline index.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

use stripdex_cluster::{ClusterStore, Registry};
use stripdex_fetch::ComicClient;

/// Download comic metadata records and group them into similarity
/// clusters, one JSON snapshot file per cluster.
///
/// Comics are fetched concurrently; clustering is online and greedy:
/// each record joins the first existing cluster whose centre is close
/// enough on title or transcript, otherwise it founds its own cluster.
/// Snapshots stay consistent with memory after every ingest, so the
/// output directory is usable even if the run is interrupted.
#[derive(Parser, Debug)]
#[command(name = "stripdex")]
#[command(about = "Cluster comic metadata into an offline index")]
#[command(version)]
struct Cli {
    /// Highest comic number to fetch (numbers 1..=max-num)
    #[arg(long, default_value_t = 2024)]
    max_num: u32,

    /// Directory for cluster snapshot files
    #[arg(long, default_value = "./clusters")]
    out_dir: PathBuf,

    /// Base URL of the comic API
    #[arg(long, default_value = stripdex_fetch::DEFAULT_BASE_URL)]
    base_url: String,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    // The store never creates its root, so a missing output directory
    // is fatal here, before anything is fetched.
    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create output directory {}", cli.out_dir.display()))?;

    let registry = Arc::new(Registry::new(ClusterStore::new(&cli.out_dir)));
    let client = Arc::new(ComicClient::with_base_url(&cli.base_url));

    // One producer task per comic number, no concurrency cap. A failed
    // fetch stays isolated to its own task.
    let mut handles = Vec::with_capacity(cli.max_num as usize);
    for num in 1..=cli.max_num {
        let registry = registry.clone();
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            fetch_and_cluster(num, &client, &registry).await;
        }));
    }

    // Completion barrier: the final counts are only meaningful once
    // every producer is done.
    for handle in handles {
        if let Err(e) = handle.await {
            warn!("producer task failed: {}", e);
        }
    }

    info!(
        "total successful downloads: {} in {} clusters",
        registry.ingested(),
        registry.len()
    );
    Ok(())
}

/// Fetch one record and hand it to the registry. Fetch and decode
/// failures are logged and dropped without touching the registry.
async fn fetch_and_cluster(num: u32, client: &ComicClient, registry: &Registry) {
    let url = client.comic_url(num);
    let start = Instant::now();

    let comic = match client.comic(num).await {
        Ok(comic) => comic,
        Err(e) => {
            warn!("{} failed: {}", url, e);
            return;
        }
    };
    debug!("{} took {:.2}s to download", url, start.elapsed().as_secs_f64());

    let outcome = registry.ingest(comic);
    for failure in &outcome.save_failures {
        warn!("failed to save cluster {}: {}", failure.cluster, failure.error);
    }
}
