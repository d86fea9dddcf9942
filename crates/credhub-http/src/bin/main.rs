use clap::Parser;
use credhub_core::CREDHUB_CONFIG;
use credhub_http::config::HTTPConfig;
use credhub_http::server;
use log::info;
use std::net::IpAddr;
use tracing_subscriber::EnvFilter;

/// Credhub credential server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a TOML config file with an `[http]` table.
    #[arg(short, long, env = CREDHUB_CONFIG)]
    config: Option<String>,
    /// Host address, overriding the config file.
    #[arg(short = 's', long)]
    host: Option<IpAddr>,
    /// Port, overriding the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => HTTPConfig::from_file(path)?,
        None => HTTPConfig::default(),
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    info!("{}", config);
    let addr = config.to_socket_address();
    let server = server::http_server(config)?;
    tracing::info!("listening on {}", addr);
    server.await?;

    Ok(())
}
