//! Search node binary.
//!
//! # Usage
//!
//! ```bash
//! cracker-node --bind 127.0.0.1:7000 --name node-a
//! cracker-node --bind 127.0.0.1:7001 --distribution dynamic --chunk-size 4096
//! ```

use clap::{Parser, ValueEnum};
use distributed_cracker::events::TracingEventSink;
use distributed_cracker::node::{SearchNode, router};
use distributed_cracker::search::types::{DEFAULT_CHUNK_SIZE, DEFAULT_POLL_INTERVAL};
use distributed_cracker::search::{Distribution, SearchTuning};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DistributionArg {
    Static,
    Dynamic,
}

/// Distributed password search node
#[derive(Parser, Debug)]
#[command(name = "cracker-node")]
#[command(about = "Serves one share of a distributed digest search over HTTP")]
#[command(version)]
struct Args {
    /// Address to bind the HTTP API to
    #[arg(short, long, env = "CRACKER_BIND", default_value = "127.0.0.1:7000")]
    bind: SocketAddr,

    /// Name reported to session coordinators (defaults to node-<uuid>)
    #[arg(short, long, env = "CRACKER_NODE_NAME")]
    name: Option<String>,

    /// How a node's range is handed to its workers
    #[arg(long, value_enum, default_value = "static")]
    distribution: DistributionArg,

    /// Indices claimed per cursor bump in dynamic mode
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: u64,

    /// Candidates hashed between two cancellation checks
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL)]
    poll_interval: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn tuning(&self) -> SearchTuning {
        let distribution = match self.distribution {
            DistributionArg::Static => Distribution::Static,
            DistributionArg::Dynamic => Distribution::Dynamic {
                chunk_size: self.chunk_size.max(1),
            },
        };
        SearchTuning {
            distribution,
            poll_interval: self.poll_interval.max(1),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let name = args
        .name
        .clone()
        .unwrap_or_else(|| format!("node-{}", uuid::Uuid::new_v4()));
    let tuning = args.tuning();

    tracing::info!("Starting {} on {}", name, args.bind);
    tracing::info!(
        "Distribution: {:?}, poll interval: {}",
        tuning.distribution,
        tuning.poll_interval
    );

    let node = Arc::new(SearchNode::new(name, tuning, Arc::new(TracingEventSink)));
    let app = router(node);

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app).await?;

    Ok(())
}
