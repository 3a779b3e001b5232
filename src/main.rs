//! Command line front end for the bunny_pullzone library.
//!
//! Manages the hostnames of a single pull zone and prints the resulting
//! hostname as JSON.
//!
//! ## Usage
//!
//! 1. Create a `.env` file with `BUNNY_API_KEY`
//! 2. Run: `cargo run -- create --zone 12345 --name cdn.example.com --certificate --force-ssl`

#![allow(clippy::print_stdout)] // Allow println! in the binary

use bunny_pullzone::{BunnyClient, BunnyClientConfig, HostnameReconciler, PullzoneHostname};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bunny_pullzone", version, about = "Manage bunny.net pull zone hostnames")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a hostname of a pull zone
    Get {
        /// Pull zone ID
        #[arg(long)]
        zone: i64,
        /// Hostname ID
        #[arg(long)]
        id: i64,
    },
    /// Add a hostname and apply its TLS settings
    Create {
        /// Pull zone ID
        #[arg(long)]
        zone: i64,
        /// DNS hostname
        #[arg(long)]
        name: String,
        /// Provision a free certificate
        #[arg(long)]
        certificate: bool,
        /// Redirect HTTP to HTTPS
        #[arg(long)]
        force_ssl: bool,
    },
    /// Change the TLS settings of an existing hostname
    Update {
        /// Pull zone ID
        #[arg(long)]
        zone: i64,
        /// Hostname ID
        #[arg(long)]
        id: i64,
        /// Whether a certificate should be bound (unchanged if omitted)
        #[arg(long)]
        certificate: Option<bool>,
        /// Whether HTTP is redirected to HTTPS (unchanged if omitted)
        #[arg(long)]
        force_ssl: Option<bool>,
    },
    /// Remove a hostname from a pull zone
    Delete {
        /// Pull zone ID
        #[arg(long)]
        zone: i64,
        /// DNS hostname
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let client = BunnyClient::new(BunnyClientConfig::from_env()?)?;
    let reconciler = HostnameReconciler::new(client);
    tracing::debug!(
        api_url = %reconciler.api().config().api_url,
        timeout_ms = reconciler.api().config().timeout_ms,
        "bunny api client ready"
    );

    let hostname = match cli.command {
        Command::Get { zone, id } => reconciler.get(zone, id).await?,
        Command::Create {
            zone,
            name,
            certificate,
            force_ssl,
        } => {
            let desired = PullzoneHostname::new(zone, name)
                .with_certificate(certificate)
                .with_force_ssl(force_ssl);
            reconciler.create(&desired).await?
        }
        Command::Update {
            zone,
            id,
            certificate,
            force_ssl,
        } => {
            let current = reconciler.get(zone, id).await?;
            let desired = PullzoneHostname {
                has_certificate: certificate.unwrap_or(current.has_certificate),
                force_ssl: force_ssl.unwrap_or(current.force_ssl),
                ..current.clone()
            };
            reconciler.update(&desired, &current).await?
        }
        Command::Delete { zone, name } => {
            reconciler.delete(zone, &name).await?;
            println!("Hostname {name} removed from pull zone {zone}");
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&hostname)?);

    Ok(())
}

/// Install the log subscriber. `RUST_LOG` filters, `RUST_LOG_FORMAT=json` switches output.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if log_format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}
