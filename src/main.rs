mod app;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tcpchat::{config, logging};

/// Terminal client for a line-oriented TCP chat server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chat server host name or IP address.
    #[arg(long)]
    host: Option<String>,

    /// Chat server TCP port.
    #[arg(long)]
    port: Option<u16>,

    /// Log in with this username after connecting.
    #[arg(long, short)]
    username: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    if let Some(host) = cli.host {
        cfg.server.host = host;
    }
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }
    if let Some(username) = cli.username {
        cfg.username = Some(username);
    }

    logging::init(&cfg.logging)?;

    if let Err(e) = app::run(cfg).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
