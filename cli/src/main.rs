// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0

//! # Contract Checker
//!
//! The `contract-checker` binary reads the zoning rules programmed on one
//! fabric leaf and prints them with endpoint groups, VRFs and contracts in
//! place of raw class tags.
//!
//! ## Usage
//!
//! - `contract-checker <pod> <node>` - every rule on the leaf
//! - `contract-checker <pod> <node> -t <tenant> -c <contract>` - one contract
//! - `-w` writes `<pod>_<node>.csv`, `-l` appends diagnostics to the log file
//!
//! Controller URL and credentials come from the config file, `APIC_*`
//! environment variables (a `.env` file is honoured) or an interactive prompt.

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use checker_core::application::{ResolutionReport, ResolutionRequest, ResolutionSession};
use checker_core::config::CheckerConfig;
use checker_core::contract::ContractRef;
use checker_core::infrastructure::{ApicClient, FirmwareVersion};

use contract_checker::credentials::{self, TerminalPrompter};
use contract_checker::logging::init_logging;
use contract_checker::output::{self, export, table};

/// Resolve a leaf's zoning rules into endpoint groups, VRFs and contracts
#[derive(Parser)]
#[command(name = "contract-checker")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Pod id of the leaf
    pod: u32,

    /// Node id of the leaf
    node: u32,

    /// Tenant owning the contract to check
    #[arg(short, long, requires = "contract")]
    tenant: Option<String>,

    /// Contract to check (only its rules are shown)
    #[arg(short, long, requires = "tenant")]
    contract: Option<String>,

    /// Debug level: 1 = HTTP status codes, 2 = internal objects, 3 = verbose
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=3)
    )]
    debug: u8,

    /// Also log to the configured log file
    #[arg(short, long)]
    logfile: bool,

    /// Write the rule table to <pod>_<node>.csv
    #[arg(short, long)]
    write: bool,

    /// Print the full report as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    fn request(&self) -> ResolutionRequest {
        let request = ResolutionRequest::node(self.pod, self.node);
        match (&self.tenant, &self.contract) {
            (Some(tenant), Some(contract)) => request.with_contract(ContractRef::new(tenant, contract)),
            _ => request,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = CheckerConfig::load_or_default(cli.config.clone())
        .context("Failed to load configuration")?;

    let log_file = cli.logfile.then(|| config.logging.file.clone());
    init_logging(cli.debug, log_file.as_deref())?;

    tokio::select! {
        biased;
        _ = tokio::signal::ctrl_c() => {
            println!("{}", "Interrupted -> Goodbye!".yellow());
            std::process::exit(130);
        }
        result = run(cli, config) => result,
    }
}

async fn run(cli: Cli, config: CheckerConfig) -> Result<()> {
    // Prompts block on the terminal; keep them off the runtime so Ctrl-C is still seen.
    let config = tokio::task::spawn_blocking(move || {
        let mut config = config;
        credentials::complete(&mut config, &TerminalPrompter)?;
        Ok::<_, anyhow::Error>(config)
    })
    .await
    .context("Credential prompt failed")??;
    config.validate().context("Invalid configuration")?;

    let client = ApicClient::from_config(&config)?;
    println!("{}", client.base_url());

    let username = config.controller.username.as_deref().unwrap_or_default();
    let password = config.controller.password.as_deref().unwrap_or_default();
    println!("{}", username);
    client
        .login(username, password)
        .await
        .context("Controller login failed")?;

    let version = client
        .controller_version()
        .await
        .context("Failed to read controller version")?;
    println!("Controller version: {}", version);
    if !version.is_supported() {
        let (major, minor) = FirmwareVersion::MINIMUM;
        bail!("Unsupported controller version {} (requires {}.{} or later)", version, major, minor);
    }

    let request = cli.request();
    info!(pod = request.pod, node = request.node, contract = ?request.contract, "Resolving zoning rules");
    let report = ResolutionSession::new(&client, config.fetch.page_size)
        .resolve(request)
        .await;

    present(&cli, &report)?;
    println!("{}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}

fn present(cli: &Cli, report: &ResolutionReport) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        table::print_report(report);
    }

    if cli.write && !report.is_empty() {
        let path = export::csv_path(cli.pod, cli.node);
        println!("Writing {} on same directory", path.display());
        export::write_csv(&path, &output::rows(report))?;
    }
    Ok(())
}
