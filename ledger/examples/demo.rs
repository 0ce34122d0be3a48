//! Walkthrough of the ledger API: build a chain, dump it, tamper with the
//! dump, and watch validation catch it.
//!
//! Run with:
//!   cargo run -p hashchain-ledger --example demo

use serde_json::{json, Value};

use hashchain_ledger::export::{from_json, to_json};
use hashchain_ledger::{BlockDraft, Chain, ChainConfig, LedgerError, LedgerResult};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";

fn report(label: &str, chain: &Chain) {
    match chain.validate() {
        Ok(()) => println!("{BOLD}{label}{RESET}: {GREEN}valid{RESET} ({} blocks)", chain.len()),
        Err(e) => println!("{BOLD}{label}{RESET}: {RED}{e}{RESET}"),
    }
}

fn main() -> LedgerResult<()> {
    let mut chain = Chain::new();
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

    let dump = to_json(&chain)?;
    println!("{dump}");
    report("as built", &chain);

    // Edit the dump the way someone with write access to the file would.
    let mut edited: Value =
        serde_json::from_str(&dump).map_err(|e| LedgerError::Serialization(e.to_string()))?;
    edited["blocks"][1]["payload"]["quantity"] = json!(9999);
    let tampered = from_json(&edited.to_string(), ChainConfig::default())?;
    report("after editing block 1", &tampered);

    Ok(())
}
