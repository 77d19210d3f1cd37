#![forbid(unsafe_code)]

//! `mcp-scout` — probe MCP servers for the tools they advertise.
//!
//! Probes either an ad-hoc command line (given after `--`) or named
//! entries from a TOML server catalog, printing each server's discovered
//! tool names as text or JSON. Discovery is best-effort: a server that
//! cannot be launched or never completes the handshake reports an empty
//! tool list rather than an error.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use mcp_scout::config::{ScoutConfig, ServerEntry};
use mcp_scout::discovery::{discover, LaunchSpec};
use mcp_scout::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "mcp-scout",
    about = "Probe MCP servers for the tools they advertise",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the TOML server catalog.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Probe only this named catalog entry (requires --config).
    #[arg(long)]
    server: Option<String>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Result output format (text or json).
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Discovery timeout override in seconds.
    #[arg(long)]
    timeout_seconds: Option<u64>,

    /// Environment override for the ad-hoc command (repeatable).
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    env: Vec<(String, String)>,

    /// Ad-hoc server command to probe, given after `--`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut results: Vec<(String, Vec<String>)> = Vec::new();

    if let Some((command, rest)) = args.command.split_first() {
        // Ad-hoc probe: everything after `--` is the server command line.
        let mut spec = LaunchSpec::new(command.clone());
        spec.args = rest.to_vec();
        spec.env = args.env.iter().cloned().collect::<HashMap<_, _>>();
        apply_timeout(&mut spec, args.timeout_seconds);

        let outcome = discover(&spec).await;
        results.push((command.clone(), outcome.tools));
    } else {
        let Some(path) = args.config.as_deref() else {
            return Err(AppError::Config(
                "nothing to probe: pass --config or a server command after `--`".into(),
            ));
        };
        let catalog = ScoutConfig::load(path)?;
        info!(
            catalog = %path.display(),
            servers = catalog.servers.len(),
            "catalog loaded"
        );

        let targets: Vec<(&str, &ServerEntry)> = match &args.server {
            Some(name) => vec![(name.as_str(), catalog.entry(name)?)],
            None => catalog.enabled(),
        };

        for (name, entry) in targets {
            let mut spec = entry.launch_spec();
            apply_timeout(&mut spec, args.timeout_seconds);

            let outcome = discover(&spec).await;
            results.push((name.to_owned(), outcome.tools));
        }
    }

    print_results(&results, args.output)
}

fn apply_timeout(spec: &mut LaunchSpec, override_seconds: Option<u64>) {
    if let Some(seconds) = override_seconds {
        spec.timeout = Duration::from_secs(seconds);
    }
}

fn print_results(results: &[(String, Vec<String>)], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for (name, tools) in results {
                if tools.is_empty() {
                    println!("{name}: no tools discovered");
                } else {
                    println!("{name}: {}", tools.join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = results
                .iter()
                .map(|(name, tools)| (name.clone(), serde_json::json!(tools)))
                .collect();
            let text = serde_json::to_string_pretty(&serde_json::Value::Object(map))
                .map_err(|err| AppError::Io(format!("failed to render json output: {err}")))?;
            println!("{text}");
        }
    }
    Ok(())
}

fn parse_env_pair(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so stdout stays clean for the probe results.
    let subscriber = fmt().with_env_filter(env_filter).with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
