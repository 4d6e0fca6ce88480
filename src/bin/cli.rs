//! SlabKV CLI Client
//!
//! Command-line interface for interacting with a SlabKV server.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use slabkv::network::Client;
use slabkv::sql::{SqlQuery, SqlResult};
use slabkv::{PutOptions, Result, SearchQuery};

/// SlabKV CLI
#[derive(Parser, Debug)]
#[command(name = "slabkv-cli")]
#[command(about = "CLI for the SlabKV key-value store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    server: String,

    /// Request timeout in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        key: String,
    },

    /// Store a key-value pair
    Set {
        key: String,
        value: String,

        /// Expire after this many seconds
        #[arg(long)]
        ttl: Option<u64>,

        /// Comma-separated name vector, e.g. 0.1,0.5,0.9
        #[arg(long, value_delimiter = ',')]
        vector: Vec<f32>,
    },

    /// Replace the value of an existing key
    Update {
        key: String,
        value: String,
    },

    /// Delete a key
    Del {
        key: String,
    },

    /// Search keys by exact key, '?' mask or name vector
    Find {
        /// Exact key
        #[arg(long, conflicts_with_all = ["mask", "vector"])]
        key: Option<String>,

        /// Mask where '?' matches any single byte
        #[arg(long, conflicts_with = "vector")]
        mask: Option<String>,

        /// Comma-separated query vector
        #[arg(long, value_delimiter = ',')]
        vector: Option<Vec<f32>>,

        /// Minimum cosine similarity for vector search
        #[arg(long, default_value = "0.8")]
        threshold: f64,
    },

    /// Ping the server
    Ping,

    /// Show engine statistics
    Stats,

    /// List user tables
    Tables,

    /// Create a table; columns are name:type pairs
    CreateTable {
        table: String,
        columns: Vec<String>,
    },

    /// Drop a table
    DropTable {
        table: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("(error) {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut client = Client::connect(&args.server)?;
    if args.timeout_ms > 0 {
        client.set_timeout(Some(Duration::from_millis(args.timeout_ms)))?;
    }

    match args.command {
        Commands::Get { key } => match client.get(key.as_bytes())? {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => println!("(nil)"),
        },
        Commands::Set {
            key,
            value,
            ttl,
            vector,
        } => {
            let mut options = PutOptions::new().name_vector(vector);
            if let Some(secs) = ttl {
                options = options.expires_in(Duration::from_secs(secs));
            }
            client.put_with(key.as_bytes(), value.as_bytes(), options)?;
            println!("OK");
        }
        Commands::Update { key, value } => {
            client.update(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        Commands::Del { key } => {
            client.delete(key.as_bytes())?;
            println!("OK");
        }
        Commands::Find {
            key,
            mask,
            vector,
            threshold,
        } => {
            let query = match (key, mask, vector) {
                (Some(key), _, _) => SearchQuery::exact_match(key),
                (_, Some(mask), _) => SearchQuery::mask_search(mask),
                (_, _, Some(vector)) => SearchQuery::vector_search(vector, threshold),
                _ => {
                    return Err(slabkv::SlabError::InvalidArgument(
                        "one of --key, --mask or --vector is required".to_string(),
                    ))
                }
            };
            let results = client.find(query)?;
            if results.is_empty() {
                println!("(empty)");
            }
            for (i, value) in results.iter().enumerate() {
                println!("{}) {}", i + 1, String::from_utf8_lossy(value));
            }
        }
        Commands::Ping => println!("{}", client.ping()?),
        Commands::Stats => {
            let stats = client.stats()?;
            println!("index_size:   {}", stats.index_size);
            println!("file_size:    {}", stats.file_size);
            println!("free_blocks:  {}", stats.free_blocks);
            println!("free_bytes:   {}", stats.free_bytes);
            println!("used_memory:  {}", stats.used_memory);
            println!("max_memory:   {}", stats.max_memory);
            println!("memory_ratio: {:.3}", stats.memory_ratio);
            println!("cache_size:   {}", stats.cache_size);
        }
        Commands::Tables => {
            let query = SqlQuery::select(Vec::<String>::new()).build()?;
            print_sql(&client.sql(query)?);
        }
        Commands::CreateTable { table, columns } => {
            let mut builder = SqlQuery::create_table(table);
            for column in columns {
                let (name, data_type) = column.split_once(':').unwrap_or((column.as_str(), "TEXT"));
                builder = builder.column(name, data_type);
            }
            print_sql(&client.sql(builder.build()?)?);
        }
        Commands::DropTable { table } => {
            print_sql(&client.sql(SqlQuery::drop_table(table).build()?)?);
        }
    }

    Ok(())
}

fn print_sql(result: &SqlResult) {
    if !result.success {
        println!("(error) {}", result.message);
        return;
    }
    println!("{}", result.message);
    for row in &result.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        println!("  {}", cells.join(" "));
    }
}
