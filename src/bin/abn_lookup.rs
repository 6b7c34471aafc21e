//! ABN lookup command line
//!
//! # Usage
//!
//! ```bash
//! # One-shot search
//! ABN_LOOKUP_GUID=... abn-lookup search "acme pty"
//! abn-lookup search "acme pty" --format json
//!
//! # Drive the full control from stdin: each line replaces the input text
//! abn-lookup interactive
//! ```
//!
//! Interactive commands: `:N` selects row N, `:dismiss` simulates a click
//! outside the dropdown, `:outputs` prints the host outputs, `:quit` exits.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use abn_lookup::{
    AbnLookupClient, AbnLookupControl, CandidateRecord, CandidateSource, ControlConfig,
    ControlDriver, ControlView, HostFields,
};

#[derive(Parser)]
#[command(name = "abn-lookup")]
#[command(version = "0.1.0")]
#[command(about = "Search the ABR for businesses by name")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML config file (defaults to ABN_LOOKUP_* environment variables)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// ABR web services GUID (overrides config)
    #[arg(long, global = true, env = "ABN_LOOKUP_GUID", hide_env_values = true)]
    guid: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up businesses matching a name
    Search {
        name: String,

        /// Output format
        #[arg(long, short = 'o', default_value = "pretty", value_enum)]
        format: OutputFormat,
    },

    /// Drive the autocomplete control from stdin
    Interactive,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "abn_lookup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ControlConfig::from_file(path)?,
        None => ControlConfig::from_env()?,
    };
    if let Some(guid) = cli.guid {
        config.sub_key = Some(guid);
    }

    match cli.command {
        Commands::Search { name, format } => search(&config, &name, format).await,
        Commands::Interactive => interactive(config).await,
    }
}

async fn search(config: &ControlConfig, name: &str, format: OutputFormat) -> Result<()> {
    let client = AbnLookupClient::new(config).context("Failed to create lookup client")?;
    let names = client
        .lookup(name, config.credential())
        .await
        .with_context(|| format!("Lookup for '{}' failed", name))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Pretty => print_candidates(&names),
    }
    Ok(())
}

fn print_candidates(names: &[CandidateRecord]) {
    if names.is_empty() {
        println!("{}", "No matching businesses".yellow());
        return;
    }
    for (i, record) in names.iter().enumerate() {
        println!(
            "{:>2}. {}  {}  {} {}",
            i,
            record.name.bold(),
            record.registration_number.dimmed(),
            record.region_code.as_deref().unwrap_or("-"),
            record.postcode.as_deref().unwrap_or("-"),
        );
    }
}

async fn interactive(config: ControlConfig) -> Result<()> {
    let client =
        Arc::new(AbnLookupClient::new(&config).context("Failed to create lookup client")?);
    let control = AbnLookupControl::init(
        config,
        HostFields::default(),
        Arc::new(|| tracing::debug!("Output changed")),
    );
    let (handle, task) = ControlDriver::spawn(control, client);

    let mut views = handle.views();
    let printer = tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            print_view(&view);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":quit" | ":q" => break,
            ":dismiss" => {
                handle.outside_interaction();
            }
            ":outputs" => {
                if let Some(outputs) = handle.outputs().await {
                    println!("{}", serde_json::to_string_pretty(&outputs)?);
                }
            }
            cmd if cmd.starts_with(':') => match cmd[1..].parse::<usize>() {
                Ok(index) => {
                    handle.select(index);
                }
                Err(_) => eprintln!("{} {}", "unknown command:".yellow(), cmd),
            },
            _ => {
                handle.input(line.as_str());
            }
        }
    }

    handle.shutdown();
    let control = task.await.context("Control driver panicked")?;
    printer.abort();

    println!("{}", serde_json::to_string_pretty(&control.get_outputs())?);
    Ok(())
}

fn print_view(view: &ControlView) {
    println!("> {}", view.input_text);
    for (i, row) in view.rows.iter().enumerate() {
        println!("  [{}] {}  {}", i, row.name, row.abn.dimmed());
    }
}
