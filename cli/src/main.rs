//! agora — replay governance operation scripts against an in-process ledger.

mod script;

use agora_governance::{GovernanceConfig, GovernanceLedger, Receipt};
use agora_nullables::NullClock;
use agora_types::{Clock, Timestamp};
use agora_utils::{format_duration, init_tracing, LogFormat};
use anyhow::Context;
use clap::Parser;
use script::{Script, Step};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agora", about = "Delegated voting registry and governance hub")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long, env = "AGORA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "AGORA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "AGORA_LOG_FORMAT")]
    log_format: Option<String>,

    /// Override the hub quorum.
    #[arg(long, env = "AGORA_QUORUM")]
    quorum: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay an operation script and print every committed event.
    Run {
        /// Script file with [[step]] entries.
        #[arg(long)]
        script: PathBuf,

        /// Clock reading before the first step (overrides the script).
        #[arg(long)]
        start_time: Option<u64>,

        /// Print receipts as JSON lines.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(cli: &Cli) -> anyhow::Result<GovernanceConfig> {
    let mut config = match &cli.config {
        Some(path) => GovernanceConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GovernanceConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    if let Some(quorum) = cli.quorum {
        config.hub.quorum = quorum;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let format: LogFormat = config.logging.format.parse()?;
    init_tracing(format, &config.logging.level);

    match cli.command {
        Command::Run {
            script,
            start_time,
            json,
        } => {
            let script = Script::from_toml_file(&script)?;
            let start = start_time
                .or(script.start_time)
                .unwrap_or_else(|| Timestamp::now().as_secs());
            run(&config, script, start, json)
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn run(config: &GovernanceConfig, script: Script, start: u64, json: bool) -> anyhow::Result<()> {
    let ledger = GovernanceLedger::new(config, NullClock::new(start))
        .context("deploying governance engines")?;
    tracing::info!(
        proposals = config.registry.proposals.len(),
        quorum = config.hub.quorum,
        start,
        "ledger ready"
    );

    for committed in ledger.events() {
        print_line(json, &committed, || format!("v0 {}", describe(&committed.event)))?;
    }

    let mut rejected = 0usize;
    for (n, step) in script.steps.into_iter().enumerate() {
        match step {
            Step::Advance { advance_secs } => {
                ledger.clock().advance(advance_secs);
                tracing::debug!(
                    step = n,
                    now = %ledger.clock().now(),
                    "advanced clock by {}",
                    format_duration(advance_secs)
                );
            }
            Step::Call { caller, op } => {
                let op_name = op.name();
                match ledger.submit(&caller, op) {
                    Ok(receipt) => print_receipt(json, &receipt)?,
                    Err(e) => {
                        rejected += 1;
                        if json {
                            let line = serde_json::json!({
                                "step": n,
                                "op": op_name,
                                "caller": caller,
                                "error": e.to_string(),
                            });
                            println!("{line}");
                        } else {
                            println!("step {n}: {op_name} by {caller} rejected: {e}");
                        }
                    }
                }
            }
        }
    }

    if !json {
        print_summary(&ledger);
    }
    tracing::info!(version = ledger.version(), rejected, "script finished");
    Ok(())
}

fn print_line<T: serde::Serialize>(
    json: bool,
    value: &T,
    human: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{}", human());
    }
    Ok(())
}

fn print_receipt(json: bool, receipt: &Receipt) -> anyhow::Result<()> {
    print_line(json, receipt, || {
        receipt
            .events
            .iter()
            .map(|e| format!("v{} @{} {}", receipt.version, receipt.timestamp, describe(e)))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn describe(event: &agora_governance::GovernanceEvent) -> String {
    let body = serde_json::to_string(event).unwrap_or_default();
    format!("{:<20} {body}", event.name())
}

fn print_summary(ledger: &GovernanceLedger<NullClock>) {
    let now = ledger.clock().now();
    ledger.with_state(|state| {
        let registry = &state.registry;
        if registry.proposal_count() > 0 {
            println!("registry:");
            for (i, p) in registry.proposals().enumerate() {
                println!("  [{i}] {:<24} {} votes", p.name, p.vote_count);
            }
            if let Ok(name) = registry.winner_name() {
                println!(
                    "  winning proposal: {} ({name})",
                    registry.winning_proposal()
                );
            }
        }
        let hub = &state.hub;
        if hub.proposal_count() > 0 {
            println!("hub (quorum {}):", hub.quorum());
            for p in hub.proposals() {
                let phase = p.phase(now);
                let remaining = p.deadline.remaining_from(now);
                println!(
                    "  [{}] {:<24} for {} / against {}  {}{}",
                    p.id,
                    p.description,
                    p.votes_for,
                    p.votes_against,
                    phase.as_str(),
                    if remaining > 0 {
                        format!(" ({} left)", format_duration(remaining))
                    } else {
                        String::new()
                    }
                );
            }
        }
    });
}
