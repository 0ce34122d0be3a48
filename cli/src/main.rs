// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Hashchain CLI
//!
//! Entry point for the `hashchain` binary. Parses CLI arguments, initializes
//! logging, and runs one subcommand against a JSON chain dump:
//!
//! - `demo`   : build the sample chain (optionally tampered) and dump it
//! - `verify` : validate a dump; exit status 1 if any block fails
//! - `append` : extend a valid dump by one block
//! - `inspect`: print a one-line summary per block
//! - `version`: print build and digest-format versions

mod cli;
mod logging;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};

use hashchain_ledger::config::{DIGEST_ALGORITHM, DIGEST_FORMAT_VERSION, TIMESTAMP_FORMAT};
use hashchain_ledger::crypto::is_digest_hex;
use hashchain_ledger::{export, Block, BlockDraft, Chain, ChainConfig, IndexPolicy};

use cli::{Commands, GlobalArgs, HashchainCli};

/// Number of hex characters shown for digests in summaries.
const SHORT_DIGEST_LEN: usize = 16;

fn main() -> Result<ExitCode> {
    let cli = HashchainCli::parse();
    logging::init_logging(&cli.global.log_level, cli.global.log_format);

    let config = load_config(&cli.global)?;

    match cli.command {
        Commands::Demo(args) => run_demo(args, config)?,
        Commands::Verify(args) => {
            if !run_verify(args, config)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Append(args) => run_append(args, config)?,
        Commands::Inspect(args) => run_inspect(args, config)?,
        Commands::Version => print_version(),
    }
    Ok(ExitCode::SUCCESS)
}

/// Resolves the chain configuration from the config file and flags.
fn load_config(global: &GlobalArgs) -> Result<ChainConfig> {
    let mut config = match &global.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config file {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => ChainConfig::default(),
    };

    if global.strict_index {
        config = config.with_index_policy(IndexPolicy::Sequential);
    }

    tracing::debug!(?config, "chain configuration resolved");
    Ok(config)
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

/// Builds the sample chain, optionally tampers with it, dumps it, and
/// reports whether it validates.
fn run_demo(args: cli::DemoArgs, config: ChainConfig) -> Result<()> {
    let mut chain = sample_chain(config)?;
    tracing::info!(blocks = chain.len(), "sample chain built");

    if args.tamper {
        chain = tamper_quantity(&chain, 1, json!(9999))?;
        tracing::info!("block 1 quantity overwritten without re-digesting");
    }

    write_dump(&chain, args.output.as_deref())?;

    match chain.validate() {
        Ok(()) => eprintln!("chain is valid ({} blocks)", chain.len()),
        Err(e) => eprintln!("chain is INVALID: {}", e),
    }
    Ok(())
}

/// Validates a dump. Returns whether it held up.
fn run_verify(args: cli::VerifyArgs, config: ChainConfig) -> Result<bool> {
    let chain = read_chain(&args.input, config)?;

    match chain.validate() {
        Ok(()) => {
            let tip = chain.latest()?;
            println!(
                "valid: {} blocks, tip #{} {}",
                chain.len(),
                tip.index(),
                tip.digest()
            );
            Ok(true)
        }
        Err(e) => {
            println!("invalid: {}", e);
            Ok(false)
        }
    }
}

/// Extends a valid dump by one block.
fn run_append(args: cli::AppendArgs, config: ChainConfig) -> Result<()> {
    let mut chain = read_chain(&args.input, config)?;
    if let Err(e) = chain.validate() {
        bail!("refusing to extend an invalid chain: {}", e);
    }

    let payload: Value =
        serde_json::from_str(&args.payload).context("--payload is not valid JSON")?;
    let timestamp = args.timestamp.unwrap_or_else(today);
    let index = match args.index {
        Some(index) => index,
        None => chain.latest()?.index().saturating_add(1),
    };

    let block = chain
        .append(BlockDraft::new(index, timestamp, payload))
        .context("append rejected")?;
    tracing::info!(index = block.index(), digest = %block.digest(), "block appended");

    write_dump(&chain, args.output.as_deref())
}

/// Prints one line per block, then the validation verdict.
fn run_inspect(args: cli::InspectArgs, config: ChainConfig) -> Result<()> {
    let chain = read_chain(&args.input, config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for block in &chain {
        writeln!(out, "{}", summarize(block))?;
    }
    match chain.validate() {
        Ok(()) => writeln!(out, "-- valid")?,
        Err(e) => writeln!(out, "-- {}", e)?,
    }
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("hashchain {}", env!("CARGO_PKG_VERSION"));
    println!("digest    v{} ({})", DIGEST_FORMAT_VERSION, DIGEST_ALGORITHM);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Genesis plus the Dennis/Sanya transfers.
fn sample_chain(config: ChainConfig) -> Result<Chain> {
    let mut chain = Chain::with_config(config);
    chain.append(BlockDraft::new(
        1,
        "01/09/2021",
        json!({ "sender": "Dennis", "recipient": "Sanya", "quantity": 20 }),
    ))?;
    chain.append(BlockDraft::new(
        2,
        "02/09/2021",
        json!({ "sender": "Sanya", "recipient": "Dennis", "quantity": 370 }),
    ))?;
    Ok(chain)
}

/// Rewrites one block's `quantity` through the dump, leaving its digest
/// stale. Blocks inside a `Chain` cannot be edited directly.
fn tamper_quantity(chain: &Chain, position: usize, quantity: Value) -> Result<Chain> {
    let mut dump: Value = serde_json::from_str(&export::to_json_compact(chain)?)?;
    let payload = dump
        .pointer_mut(&format!("/blocks/{}/payload", position))
        .and_then(Value::as_object_mut)
        .with_context(|| format!("block {} has no object payload", position))?;
    payload.insert("quantity".to_string(), quantity);
    Ok(export::from_json(&dump.to_string(), *chain.config())?)
}

fn read_chain(path: &Path, config: ChainConfig) -> Result<Chain> {
    let chain = if path == Path::new("-") {
        export::read_from(io::stdin().lock(), config).context("failed to read chain from stdin")?
    } else {
        let file = File::open(path)
            .with_context(|| format!("failed to open chain file {}", path.display()))?;
        export::read_from(BufReader::new(file), config)
            .with_context(|| format!("failed to read chain from {}", path.display()))?
    };
    tracing::debug!(blocks = chain.len(), "chain loaded");
    Ok(chain)
}

fn write_dump(chain: &Chain, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            export::write_to(chain, &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), blocks = chain.len(), "chain written");
        }
        None => export::write_to(chain, io::stdout().lock())?,
    }
    Ok(())
}

fn today() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn short_digest(digest: &str) -> &str {
    digest.get(..SHORT_DIGEST_LEN).unwrap_or(digest)
}

fn summarize(block: &Block) -> String {
    let mut line = format!(
        "#{:<4} {:<12} {}  prev={}  {}",
        block.index(),
        block.timestamp(),
        short_digest(block.digest()),
        short_digest(block.previous_digest()),
        block.payload()
    );
    if !is_digest_hex(block.digest()) {
        line.push_str("  [malformed digest]");
    }
    line
}
