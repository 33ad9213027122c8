//! pixpin CLI entry point.

mod args;
mod commands;
mod menu;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use pixpin_core::api::PixPin;
use pixpin_core::protocol::render_command_line;
use pixpin_core::sink::RecordingSink;
use pixpin_host::{ClientConfig, PixPinClient};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.validate() {
        e.exit();
    }

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Preset, config file and environment, then command-line flags.
fn build_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::load(cli.profile).context("Failed to load configuration")?;

    if let Some(path) = &cli.executable {
        config.executable_path = path.clone();
    }
    if let Some(ms) = cli.timeout {
        config.execution_timeout = Duration::from_millis(ms);
    }
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Examples = cli.command {
        println!("{}", crate::args::EXAMPLES_TEXT);
        return Ok(());
    }

    let config = build_config(&cli)?;
    let runtime = tokio::runtime::Runtime::new()?;

    if cli.dry_run {
        return runtime.block_on(dry_run(&cli, &config));
    }

    let client = PixPinClient::new(config);
    runtime.block_on(async {
        match &cli.command {
            Commands::Status => print_value(&status(&client), cli.json),
            Commands::Start => {
                let started = client.ensure_running().await?;
                if !started {
                    info!("PixPin is already running");
                }
                print_value(&status(&client), cli.json)
            }
            Commands::Refresh => {
                client.refresh();
                print_value(&status(&client), cli.json)
            }
            Commands::Interactive => menu::run(&client).await,
            command => {
                client.prepare().await?;
                let value = commands::execute(&client.commands(), command, client.config()).await?;
                print_value(&value, cli.json)
            }
        }
    })
}

/// Record what a command would dispatch and print the command lines.
async fn dry_run(cli: &Cli, config: &ClientConfig) -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let pixpin = PixPin::new(&sink);
    commands::execute(&pixpin, &cli.command, config).await?;

    let program = config.executable_path.to_string_lossy();
    let lines: Vec<String> = sink
        .take()
        .iter()
        .map(|invocation| render_command_line(&program, &invocation.args()))
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else {
        for line in lines {
            println!("{}", line);
        }
    }
    Ok(())
}

fn status(client: &PixPinClient) -> Value {
    json!({
        "state": client.state(),
        "running": client.is_running(),
        "available": client.is_available(),
        "executable": client.executable_path().display().to_string(),
        "detected": client.cached_path().map(|path| path.display().to_string()),
    })
}

fn print_value(value: &Value, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(value)?);
        return Ok(());
    }
    match value {
        Value::Null => {}
        Value::String(text) => println!("{}", text),
        Value::Bool(_) | Value::Number(_) => println!("{}", value),
        _ => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
