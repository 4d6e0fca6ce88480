//! SlabKV Server Binary
//!
//! Opens the engine, starts maintenance and serves the TCP protocol.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use slabkv::network::Server;
use slabkv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// SlabKV Server
#[derive(Parser, Debug)]
#[command(name = "slabkv-server")]
#[command(about = "Embeddable key-value storage engine with a TCP protocol")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./slabkv_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Memory quota in MB
    #[arg(short = 'M', long, default_value = "100")]
    memory_mb: u64,

    /// Track the memory quota without enforcing it
    #[arg(long)]
    soft_memory_limit: bool,

    /// Read-cache entry lifetime in seconds
    #[arg(long, default_value = "3600")]
    cache_ttl_secs: u64,

    /// Hard cap on the data file size in MB
    #[arg(long)]
    max_file_mb: Option<u64>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,slabkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("SlabKV Server v{}", slabkv::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    let mut builder = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .memory_limit(args.memory_mb * 1024 * 1024)
        .memory_limit_enabled(!args.soft_memory_limit)
        .cache_ttl(Duration::from_secs(args.cache_ttl_secs));
    if let Some(mb) = args.max_file_mb {
        builder = builder.max_data_file_size(mb * 1024 * 1024);
    }
    let config = builder.build();

    let engine = match Engine::open(config.clone()) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = engine.start_maintenance() {
        tracing::error!("Failed to start maintenance tasks: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Engine initialized successfully");

    let mut server = Server::new(config, Arc::clone(&engine));
    let result = server.run();

    if let Err(e) = engine.shutdown() {
        tracing::error!("Engine shutdown failed: {}", e);
    }

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
