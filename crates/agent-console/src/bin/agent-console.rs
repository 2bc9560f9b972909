//! Headless agent console
//!
//! Runs the transfer notification lifecycle against the simulated request
//! feed for a fixed time, logging every arrival and resolution, then prints
//! a JSON snapshot of the console.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use agent_console::logging::{log_welcome, setup_logging};
use agent_console::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless agent console", long_about = None)]
struct Args {
    /// Config file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How long to run in seconds
    #[arg(short, long, default_value = "60")]
    duration_secs: u64,

    /// Initial presence (online, offline, break)
    #[arg(short, long, default_value = "online")]
    presence: PresenceStatus,

    /// Agent name used on ticket replies
    #[arg(long, default_value = "Agent")]
    agent_name: String,

    /// Override the configured log level
    #[arg(short, long)]
    log_level: Option<String>,

    /// Accept every transfer as soon as it arrives
    #[arg(long)]
    auto_accept: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config =
        ConsoleConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    setup_logging(config.logging.to_logging_config()?)?;
    log_welcome("agent-console", agent_console::VERSION);

    let mut console = AgentConsole::builder()
        .with_config(config)
        .with_presence(args.presence)
        .with_agent_name(args.agent_name)
        .build()?;
    let mut events = console.events();
    console.start()?;

    let deadline = tokio::time::sleep(Duration::from_secs(args.duration_secs));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => {
                info!("⏰ Run time elapsed");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C");
                break;
            }
            event = events.next() => {
                let Some(event) = event else {
                    warn!("Event stream closed");
                    break;
                };
                match event {
                    NotificationEvent::Arrived(notification) if args.auto_accept => {
                        console.accept_transfer(&notification.id);
                    }
                    NotificationEvent::Resolved { notification, resolution } => {
                        let (pending, _) = console.presenter().counts();
                        info!(
                            "{} {} ({} still pending)",
                            notification.customer_name, resolution, pending
                        );
                    }
                    _ => {}
                }
            }
        }
    }

    console.shutdown().await;

    println!("{}", console.snapshot_json()?);
    Ok(())
}
