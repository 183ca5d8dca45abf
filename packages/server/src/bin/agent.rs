//! Standalone agent runner
//!
//! Routes chat messages through the ENS deals plugin without a host runtime.
//! `sample` prints generated listings and needs no configuration.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use ens_deals::domains::agent::{ens_deals_plugin, Plugin};
use ens_deals::domains::marketplace::listing::normalize;
use ens_deals::domains::marketplace::sample::sample_listings;
use ens_deals::kernel::ServerDeps;
use ens_deals::Config;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "agent")]
#[command(about = "ENS deal scout agent runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read messages from stdin, one per line
    Chat,

    /// Handle a single message
    Run { message: String },

    /// Print generated sample listings
    Sample {
        #[arg(long, default_value_t = 10)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Print normalized listings as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so replies stay clean on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,ens_deals=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sample { count, seed, json } => print_samples(count, seed, json),
        Commands::Run { message } => {
            let (plugin, deps) = load().await?;
            respond(&plugin, &deps, &message).await
        }
        Commands::Chat => {
            let (plugin, deps) = load().await?;
            println!(
                "{} ({} actions). Ctrl-D to quit.",
                plugin.name.bright_cyan().bold(),
                plugin.actions.len()
            );

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
                let message = line.trim();
                if message.is_empty() {
                    continue;
                }
                respond(&plugin, &deps, message).await?;
            }
            Ok(())
        }
    }
}

async fn load() -> Result<(Plugin, ServerDeps)> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let deps = ServerDeps::from_config(&config)
        .await
        .context("Failed to initialize services")?;
    Ok((ens_deals_plugin(), deps))
}

async fn respond(plugin: &Plugin, deps: &ServerDeps, message: &str) -> Result<()> {
    match plugin.dispatch(message, deps).await {
        Ok(Some(reply)) => {
            println!("{}", format!("[{}]", reply.action).dimmed());
            println!("{}", reply.text);
        }
        Ok(None) => {
            println!(
                "{} Try: {}",
                "I don't know how to help with that.".yellow(),
                plugin.action_names().join(", ")
            );
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
        }
    }
    println!();
    Ok(())
}

fn print_samples(count: usize, seed: u64, json: bool) -> Result<()> {
    let now = Utc::now();
    let listings: Vec<_> = sample_listings(count, seed)
        .iter()
        .map(|raw| normalize(raw, now))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    for listing in &listings {
        let floor = listing
            .floor_price
            .map(|f| format!("{:.3}", f))
            .unwrap_or_else(|| "-".to_string());
        let line = format!(
            "{:<16} {:>8.3} ETH  floor {:>6}",
            listing.domain_name, listing.price, floor
        );
        if listing.is_below_floor {
            println!("{} {}", line.green(), "below floor".green().bold());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}
