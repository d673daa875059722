//! Session driver for a cluster of search nodes.
//!
//! # Usage
//!
//! ```bash
//! # Digest of a test password
//! cracker-client hash 'aB3'
//!
//! # Check that every node answers
//! cracker-client --nodes 127.0.0.1:7000,127.0.0.1:7001 probe
//!
//! # Crack a 4 symbol password over two nodes with 8 workers each
//! cracker-client --nodes 127.0.0.1:7000,127.0.0.1:7001 crack <md5-hex> --length 4 --workers 8
//! ```

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use distributed_cracker::keyspace::Alphabet;
use distributed_cracker::search::digest::hex_digest;
use distributed_cracker::search::{DigestAlgorithm, LengthMode};
use distributed_cracker::session::{
    HttpSearchClient, SearchClient, SessionCoordinator, SessionRequest,
};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Distributed password search client
#[derive(Parser, Debug)]
#[command(name = "cracker-client")]
#[command(about = "Dispatches a digest search across search nodes")]
#[command(version)]
struct Args {
    /// Node addresses (host:port), comma separated, in node index order
    #[arg(long, env = "CRACKER_NODES", value_delimiter = ',', global = true)]
    nodes: Vec<String>,

    /// Seconds to wait for a TCP connection to a node
    #[arg(long, default_value_t = 3, global = true)]
    connect_timeout: u64,

    /// Seconds a single node search may take before it counts as failed (unbounded if unset)
    #[arg(long, global = true)]
    request_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the cluster for the plaintext of a digest
    Crack {
        /// Target digest, hex encoded
        digest: String,

        /// Password length (or maximum length with --up-to)
        #[arg(short, long)]
        length: usize,

        /// Worker threads per node
        #[arg(short, long, default_value_t = 4)]
        workers: usize,

        /// printable, lower-alnum, lower, digits, or a literal symbol set
        #[arg(short, long, default_value = "printable")]
        alphabet: Alphabet,

        /// md5 or sha256
        #[arg(long, default_value = "md5")]
        algorithm: DigestAlgorithm,

        /// Also try every shorter length, shortest first
        #[arg(long)]
        up_to: bool,
    },

    /// Print the digest of a plaintext, for producing test targets
    Hash {
        plaintext: String,

        /// md5 or sha256
        #[arg(long, default_value = "md5")]
        algorithm: DigestAlgorithm,
    },

    /// Check that every node is alive and print its name
    Probe,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    match args.command {
        Command::Hash {
            ref plaintext,
            algorithm,
        } => {
            println!("{}", hex_digest(algorithm, plaintext.as_bytes()));
            Ok(())
        }
        Command::Probe => {
            let client = build_client(&args)?;
            probe(&client, &args.nodes).await
        }
        Command::Crack {
            ref digest,
            length,
            workers,
            ref alphabet,
            algorithm,
            up_to,
        } => {
            let client = build_client(&args)?;
            let length_mode = if up_to {
                LengthMode::UpTo
            } else {
                LengthMode::Exact
            };
            let request = SessionRequest::new(digest.trim(), length, args.nodes.clone(), workers)
                .with_alphabet(alphabet.clone())
                .with_algorithm(algorithm)
                .with_length_mode(length_mode);

            let coordinator = SessionCoordinator::new(client);
            let result = coordinator
                .run_session(&request)
                .await
                .context("search session failed")?;

            match result.candidate {
                Some(ref candidate) if result.found => {
                    println!("FOUND: {}", candidate);
                    println!(
                        "node {} ({}), worker {}, {}ms",
                        result.node_index,
                        result.node_id,
                        result.worker_id.map_or("-".to_string(), |w| w.to_string()),
                        result.elapsed_millis
                    );
                }
                _ => println!("NOT FOUND after {}ms", result.elapsed_millis),
            }
            Ok(())
        }
    }
}

fn build_client(args: &Args) -> anyhow::Result<HttpSearchClient> {
    if args.nodes.is_empty() {
        bail!("no nodes given; use --nodes or CRACKER_NODES");
    }
    let client = HttpSearchClient::new(
        Duration::from_secs(args.connect_timeout),
        args.request_timeout.map(Duration::from_secs),
    )?;
    Ok(client)
}

async fn probe(client: &HttpSearchClient, nodes: &[String]) -> anyhow::Result<()> {
    let mut failures = 0usize;

    for (index, node) in nodes.iter().enumerate() {
        let status = async {
            let alive = client.is_alive(node).await?;
            let name = client.node_name(node).await?;
            Ok::<_, distributed_cracker::error::SessionError>((alive, name))
        }
        .await;

        match status {
            Ok((true, name)) => println!("[{}] {} -> {} (alive)", index, node, name),
            Ok((false, name)) => {
                failures += 1;
                println!("[{}] {} -> {} (not alive)", index, node, name);
            }
            Err(e) => {
                failures += 1;
                println!("[{}] {} -> unreachable: {}", index, node, e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} nodes unavailable", failures, nodes.len());
    }
    Ok(())
}
