//! redwire CLI Client
//!
//! Command-line interface for issuing string and bitmap commands.

use bytes::Bytes;
use clap::{Parser, Subcommand};
use redwire::{Client, Config, SetOptions};
use tracing_subscriber::{fmt, EnvFilter};

/// redwire CLI
#[derive(Parser, Debug)]
#[command(name = "redwire-cli")]
#[command(about = "CLI for Redis string and bitmap commands")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    /// Read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping,

    /// Get a value by key
    Get { key: String },

    /// Set a key-value pair
    Set {
        key: String,
        value: String,

        /// Expire after N seconds
        #[arg(long, conflicts_with = "px")]
        ex: Option<i64>,

        /// Expire after N milliseconds
        #[arg(long)]
        px: Option<i64>,

        /// Only set if the key does not exist
        #[arg(long, conflicts_with = "xx")]
        nx: bool,

        /// Only set if the key exists
        #[arg(long)]
        xx: bool,
    },

    /// Increment an integer value by one
    Incr { key: String },

    /// Increment an integer value by a step
    Incrby {
        key: String,
        #[arg(allow_hyphen_values = true)]
        step: i64,
    },

    /// Increment a float value by a step
    Incrbyfloat {
        key: String,
        #[arg(allow_hyphen_values = true)]
        step: f64,
    },

    /// Append to a value
    Append { key: String, value: String },

    /// Length of a value in bytes
    Strlen { key: String },

    /// Substring by byte offsets (inclusive)
    Getrange {
        key: String,
        #[arg(allow_hyphen_values = true)]
        start: i64,
        #[arg(allow_hyphen_values = true)]
        end: i64,
    },

    /// Overwrite part of a value
    Setrange {
        key: String,
        offset: u64,
        value: String,
    },

    /// Set or clear one bit
    Setbit { key: String, offset: u64, bit: u8 },

    /// Read one bit
    Getbit { key: String, offset: u64 },

    /// Count set bits
    Bitcount { key: String },

    /// Position of the first bit equal to BIT
    Bitpos {
        key: String,
        bit: u8,
        #[arg(allow_hyphen_values = true)]
        start: Option<i64>,
        #[arg(allow_hyphen_values = true)]
        end: Option<i64>,
    },

    /// Get several values
    Mget {
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,redwire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .server_addr(&args.server)
        .read_timeout_ms(args.timeout_ms)
        .build();

    let mut client = match Client::connect(&config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&mut client, args.command) {
        match e.kind() {
            Some(kind) => tracing::error!("{:?}: {}", kind, e),
            None => tracing::error!("{}", e),
        }
        std::process::exit(1);
    }
}

fn run<S: std::io::Read + std::io::Write>(
    client: &mut Client<S>,
    command: Commands,
) -> redwire::Result<()> {
    match command {
        Commands::Ping => println!("{}", client.ping()?),
        Commands::Get { key } => print_bulk(client.get(&key)?),
        Commands::Set {
            key,
            value,
            ex,
            px,
            nx,
            xx,
        } => {
            let mut options = SetOptions::new();
            if let Some(seconds) = ex {
                options = options.ex(seconds);
            }
            if let Some(millis) = px {
                options = options.px(millis);
            }
            if nx {
                options = options.nx();
            }
            if xx {
                options = options.xx();
            }
            match client.set_with(&key, &value, &options)? {
                true => println!("OK"),
                false => println!("(nil)"),
            }
        }
        Commands::Incr { key } => println!("{}", client.incr(&key)?),
        Commands::Incrby { key, step } => println!("{}", client.incrby(&key, step)?),
        Commands::Incrbyfloat { key, step } => println!("{}", client.incrbyfloat(&key, step)?),
        Commands::Append { key, value } => println!("{}", client.append(&key, &value)?),
        Commands::Strlen { key } => println!("{}", client.strlen(&key)?),
        Commands::Getrange { key, start, end } => {
            print_bulk(Some(client.getrange(&key, start, end)?))
        }
        Commands::Setrange { key, offset, value } => {
            println!("{}", client.setrange(&key, offset, &value)?)
        }
        Commands::Setbit { key, offset, bit } => println!("{}", client.setbit(&key, offset, bit)?),
        Commands::Getbit { key, offset } => println!("{}", client.getbit(&key, offset)?),
        Commands::Bitcount { key } => println!("{}", client.bitcount(&key)?),
        Commands::Bitpos {
            key,
            bit,
            start,
            end,
        } => println!("{}", client.bitpos(&key, bit, start, end)?),
        Commands::Mget { keys } => {
            for (key, value) in client.mget(&keys)? {
                print!("{} => ", String::from_utf8_lossy(&key));
                print_bulk(value);
            }
        }
    }
    Ok(())
}

/// Print a bulk value the way redis-cli does: quoted, with escapes
fn print_bulk(value: Option<Bytes>) {
    match value {
        Some(data) => println!("\"{}\"", data.escape_ascii()),
        None => println!("(nil)"),
    }
}
