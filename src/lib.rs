pub mod cable;
pub mod commands;
pub mod config;
mod error;
pub mod cost;

use std::io::Read;

use anyhow::Context;
use tracing::info;

pub use config::AdvisorConfig;
pub use error::AdvisorError;

const USAGE: &str = "sparkadvisor <cable|cost|rules> [FILE]\n\
    cable  read a JSON installation context and recommend a cable\n\
    cost   read a quotation report and print its parsed breakdown\n\
    rules  list the active cable rule table";

pub fn run() -> anyhow::Result<()> {
    let config = AdvisorConfig::load();
    init_logging(config.as_ref().ok().and_then(|c| c.log_filter.as_deref()));
    let config = config.context("failed to load configuration")?;

    let mut args = std::env::args().skip(1);
    let command = args
        .next()
        .ok_or_else(|| AdvisorError::Usage(USAGE.to_string()))?;
    let input_path = args.next();

    info!("Running '{}' command", command);

    let output = match command.as_str() {
        "cable" => {
            let advisor = config.cable_advisor()?;
            let input = read_input(input_path.as_deref())?;
            let response = commands::cable::select_cable(&advisor, &input).map_err(anyhow::Error::msg)?;
            serde_json::to_string_pretty(&response)?
        }
        "cost" => {
            let input = read_input(input_path.as_deref())?;
            let response = commands::cost::parse_cost(&config.cost_parser(), &input);
            serde_json::to_string_pretty(&response)?
        }
        "rules" => {
            let advisor = config.cable_advisor()?;
            serde_json::to_string_pretty(&commands::cable::list_rules(&advisor))?
        }
        other => {
            return Err(AdvisorError::Usage(format!("unknown command '{}'\n{}", other, USAGE)).into());
        }
    };

    println!("{}", output);
    Ok(())
}

/// Log to stderr so stdout carries only the JSON result.
fn init_logging(config_filter: Option<&str>) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(config_filter.unwrap_or("info")))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: Option<&str>) -> Result<String, AdvisorError> {
    match path {
        Some("-") | None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}
