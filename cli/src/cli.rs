//! # CLI Interface
//!
//! Defines the command-line argument structure for `hashchain` using
//! `clap` derive. Subcommands: `demo`, `verify`, `append`, `inspect`,
//! and `version`. Chain files are JSON dumps; `-` means stdin.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Build, extend, inspect, and verify hash-chained ledgers.
#[derive(Parser, Debug)]
#[command(
    name = "hashchain",
    about = "Append-only hash-chained ledger tool",
    version,
    propagate_version = true
)]
pub struct HashchainCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Reject appended blocks whose index is not the tip's index plus one.
    #[arg(long, global = true, env = "HASHCHAIN_STRICT_INDEX")]
    pub strict_index: bool,

    /// Chain configuration file (JSON), e.g. `{"index_policy": "sequential"}`.
    ///
    /// `--strict-index` takes precedence over the file.
    #[arg(long, short = 'c', global = true, env = "HASHCHAIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "HASHCHAIN_LOG_FORMAT",
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(
        long,
        global = true,
        env = "HASHCHAIN_LOG",
        default_value = "hashchain=info,hashchain_ledger=info"
    )]
    pub log_level: String,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the sample two-transfer chain and print its dump.
    Demo(DemoArgs),
    /// Load a dump and check every digest and link.
    Verify(VerifyArgs),
    /// Append one block to a dump and write the extended chain.
    Append(AppendArgs),
    /// Print one summary line per block.
    Inspect(InspectArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `demo` subcommand.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Overwrite block 1's quantity with 9999 after building, without
    /// re-digesting, to show the validator catching it.
    #[arg(long)]
    pub tamper: bool,

    /// Write the dump here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Chain dump to verify (`-` for stdin).
    pub input: PathBuf,
}

/// Arguments for the `append` subcommand.
#[derive(Args, Debug)]
pub struct AppendArgs {
    /// Chain dump to extend (`-` for stdin).
    pub input: PathBuf,

    /// Block payload as JSON, e.g. `{"sender":"a","recipient":"b","quantity":1}`.
    #[arg(long, short = 'p')]
    pub payload: String,

    /// Block timestamp. Defaults to today's date as `dd/mm/yyyy`.
    #[arg(long, short = 't')]
    pub timestamp: Option<String>,

    /// Block index. Defaults to the tip's index plus one.
    #[arg(long)]
    pub index: Option<u64>,

    /// Write the extended dump here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Chain dump to summarize (`-` for stdin).
    pub input: PathBuf,
}
