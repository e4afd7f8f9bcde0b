// src/main.rs
extern crate acpitemp_rs;
extern crate anyhow;

use std::env;
use std::path::PathBuf;

use acpitemp_rs::core::config::Config;
use acpitemp_rs::core::orchestrator::Orchestrator;
use anyhow::{Context, Result};
use tracing::error;
use tracing_subscriber::EnvFilter;

struct Args {
    json: bool,
    config: Option<PathBuf>,
}

fn usage(program: &str) {
    eprintln!("Usage: {program} [--json] [--config <path>]");
    eprintln!("    --json             print the report as JSON");
    eprintln!("    --config <path>    read settings from <path> instead of the default locations");
}

// None means usage was printed and the program should stop
fn parse_args() -> Result<Option<Args>> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "acpitemp".to_string());
    let mut parsed = Args {
        json: false,
        config: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "--config" => {
                let path = args.next().context("--config requires a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                usage(&program);
                return Ok(None);
            }
            other => {
                usage(&program);
                anyhow::bail!("unknown argument {other}");
            }
        }
    }
    Ok(Some(parsed))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => return Ok(()),
        Err(e) => {
            error!(error = %e, "Invalid arguments");
            return Ok(());
        }
    };

    // A broken config file never stops the readers; fall back to defaults
    let loaded = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        error!(error = %format!("{e:#}"), "Falling back to default configuration");
        Config::default()
    });

    let report = Orchestrator::from_config(&config).run();

    if args.json {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => error!(error = %e, "Serializing report failed"),
        }
    } else {
        print!("{}", report.render());
    }
    Ok(())
}
