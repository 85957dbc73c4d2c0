// crates/jetwash/src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use jetwash_core::config::Config;
use jetwash_core::corrections::CorrectionTable;
use jetwash_core::pipeline;
use jetwash_influx::InfluxClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Treatment pipeline for raw vehicle telemetry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, treat and write back every configured topic
    Run(RunArgs),
    /// Show the effective topic table
    Topics(TopicsArgs),
    /// Check connectivity to the configured InfluxDB instance
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Path to a TOML config file (default: jetwash.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Resolve and log points without writing them back
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug, Default)]
struct TopicsArgs {
    /// Path to a TOML config file (default: jetwash.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct CheckArgs {
    /// Path to a TOML config file (default: jetwash.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => handle_run(args)?,
        Command::Topics(args) => handle_topics(args)?,
        Command::Check(args) => handle_check(args)?,
    }

    println!("\n✅ Done.");
    Ok(())
}

fn handle_run(args: RunArgs) -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load(args.config.as_deref())?;
    let client = InfluxClient::new(config.influx.clone())?;

    info!(
        topics = config.topics.len(),
        dry_run = args.dry_run,
        "starting treatment run"
    );
    let summary = pipeline::run(&client, &config, args.dry_run)?;

    println!("\n--- Treatment Summary ---");
    for topic in &summary.topics {
        println!(
            "  {} -> {}: {} raw rows, {} points",
            topic.source, topic.target, topic.raw_rows, topic.points
        );
    }
    if args.dry_run {
        println!(
            "  ⚠️  Dry run: {} points resolved, none written.",
            summary.total_points()
        );
    } else {
        println!("  ✅ Wrote {} points.", summary.total_points());
    }

    Ok(())
}

fn handle_topics(args: TopicsArgs) -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load(args.config.as_deref())?;
    let corrections = CorrectionTable::new(config.wheel_radius_m);

    let mut table = Table::new();
    table.set_header(vec!["Source", "Target", "Correction"]);
    for topic in &config.topics {
        table.add_row(vec![
            topic.source.clone(),
            topic.target.clone(),
            corrections.for_source(&topic.source).describe(),
        ]);
    }
    println!("{table}");

    Ok(())
}

fn handle_check(args: CheckArgs) -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load(args.config.as_deref())?;
    let client = InfluxClient::new(config.influx.clone())?;

    client.ping().context("InfluxDB did not answer the ping")?;

    println!("  ✅ {} is reachable.", config.influx.url);
    println!(
        "  Org: {}  Bucket: {}",
        config.influx.org, config.influx.bucket
    );

    Ok(())
}
