//! End-to-end integrity tests for the ledger.
//!
//! These tests drive the public API only: build a chain, dump it to JSON,
//! edit the dump the way an attacker with write access to the file would,
//! reload it, and check that validation points at the right block.

use hashchain_ledger::export::{from_json, to_json};
use hashchain_ledger::{
    Block, BlockDraft, Chain, ChainConfig, LedgerError, Payload, ValidationFailure,
};
use serde::Serialize;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Transfer<'a> {
    sender: &'a str,
    recipient: &'a str,
    quantity: u64,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("hashchain_ledger=trace")
        .with_test_writer()
        .try_init();
}

/// Genesis plus the two sample transfers.
fn sample_chain() -> Chain {
    let mut chain = Chain::new();
    chain
        .append(
            BlockDraft::from_serializable(
                1,
                "01/09/2021",
                &Transfer {
                    sender: "Dennis",
                    recipient: "Sanya",
                    quantity: 20,
                },
            )
            .expect("payload"),
        )
        .expect("append 1");
    chain
        .append(
            BlockDraft::from_serializable(
                2,
                "02/09/2021",
                &Transfer {
                    sender: "Sanya",
                    recipient: "Dennis",
                    quantity: 370,
                },
            )
            .expect("payload"),
        )
        .expect("append 2");
    chain
}

fn long_chain(len: u64) -> Chain {
    let mut chain = Chain::new();
    for i in 1..len {
        chain
            .append(BlockDraft::new(i, "01/01/2022", json!({ "seq": i })))
            .expect("append");
    }
    chain
}

/// Dump `chain`, let `edit` modify the JSON, and load the result.
fn tamper(chain: &Chain, edit: impl FnOnce(&mut Value)) -> Chain {
    let mut dump: Value = serde_json::from_str(&to_json(chain).expect("dump")).expect("parse");
    edit(&mut dump);
    from_json(&dump.to_string(), ChainConfig::default()).expect("reload")
}

// ---------------------------------------------------------------------------
// Happy Path
// ---------------------------------------------------------------------------

#[test]
fn sample_chain_is_valid() {
    init_tracing();
    let chain = sample_chain();
    assert!(chain.validate().is_ok());
    assert_eq!(chain.len(), 3);

    let latest = chain.latest().expect("tip");
    assert_eq!(latest.index(), 2);
    assert_eq!(latest.payload().get("quantity"), Some(&json!(370)));
}

#[test]
fn digests_are_stable_across_chains() {
    let a = sample_chain();
    let b = sample_chain();
    let digests_a: Vec<&str> = a.iter().map(Block::digest).collect();
    let digests_b: Vec<&str> = b.iter().map(Block::digest).collect();
    assert_eq!(digests_a, digests_b);
}

#[test]
fn dump_roundtrip_stays_valid() {
    let chain = long_chain(10);
    let reloaded = tamper(&chain, |_| {});
    assert_eq!(reloaded.blocks(), chain.blocks());
    assert!(reloaded.validate().is_ok());
}

#[test]
fn appending_to_reloaded_chain() {
    let mut chain = tamper(&sample_chain(), |_| {});
    chain
        .append(BlockDraft::new(3, "03/09/2021", Payload::from("note")))
        .expect("append");
    assert_eq!(chain.len(), 4);
    assert!(chain.validate().is_ok());
}

// ---------------------------------------------------------------------------
// Tamper Detection
// ---------------------------------------------------------------------------

#[test]
fn edited_quantity_is_detected() {
    init_tracing();
    let chain = tamper(&sample_chain(), |dump| {
        dump["blocks"][1]["payload"]["quantity"] = json!(9999);
    });

    let err = chain.validate().expect_err("tampered chain must fail");
    assert_eq!(err.index, 1);
    assert!(matches!(err.failure, ValidationFailure::DigestMismatch { .. }));
}

#[test]
fn overwritten_previous_digest_is_detected() {
    let chain = tamper(&sample_chain(), |dump| {
        dump["blocks"][2]["previous_digest"] = json!("deadbeef");
    });

    let err = chain.validate().expect_err("tampered chain must fail");
    assert_eq!(err.index, 2);
}

#[test]
fn edited_timestamp_is_detected() {
    let chain = tamper(&sample_chain(), |dump| {
        dump["blocks"][1]["timestamp"] = json!("31/12/1999");
    });
    assert_eq!(chain.validate().expect_err("must fail").index, 1);
}

#[test]
fn consistent_forgery_breaks_the_next_link() {
    // Rewrite block 1 and give it a correct digest for its new content. The
    // forgery is self-consistent, so the break shows up at block 2.
    let original = sample_chain();
    let forged = Block::new(
        1,
        "01/09/2021",
        json!({ "sender": "Dennis", "recipient": "Sanya", "quantity": 9999 }),
        original.blocks()[0].digest(),
    );
    let chain = tamper(&original, |dump| {
        dump["blocks"][1] = serde_json::to_value(&forged).expect("block json");
    });

    let err = chain.validate().expect_err("must fail");
    assert_eq!(err.index, 2);
    assert!(matches!(err.failure, ValidationFailure::LinkageMismatch { .. }));
}

#[test]
fn swapped_blocks_are_detected() {
    let chain = tamper(&long_chain(6), |dump| {
        let blocks = dump["blocks"].as_array_mut().expect("array");
        blocks.swap(2, 4);
    });
    let err = chain.validate().expect_err("must fail");
    assert_eq!(err.index, 2);
    assert!(matches!(err.failure, ValidationFailure::LinkageMismatch { .. }));
}

#[test]
fn inserted_block_is_detected() {
    let chain = tamper(&long_chain(4), |dump| {
        let extra = serde_json::to_value(Block::unlinked(9, "01/01/2022", "injected"))
            .expect("block json");
        dump["blocks"].as_array_mut().expect("array").insert(2, extra);
    });
    let err = chain.validate().expect_err("must fail");
    assert_eq!(err.index, 2);
}

#[test]
fn truncated_dump_still_valid_prefix() {
    // Dropping the tail leaves a valid, shorter chain: tamper-evidence
    // covers stored blocks, not blocks that were never shown.
    let chain = tamper(&long_chain(5), |dump| {
        dump["blocks"].as_array_mut().expect("array").truncate(3);
    });
    assert!(chain.validate().is_ok());
    assert_eq!(chain.len(), 3);
}

// ---------------------------------------------------------------------------
// Error Paths
// ---------------------------------------------------------------------------

#[test]
fn strict_chain_rejects_skipped_index() {
    let mut chain = Chain::with_config(ChainConfig::strict());
    let err = chain
        .append(BlockDraft::new(5, "01/09/2021", "skip"))
        .expect_err("must reject");
    assert!(matches!(
        err,
        LedgerError::IndexOutOfSequence {
            expected: 1,
            actual: 5
        }
    ));
}

#[test]
fn unserializable_payload_is_rejected() {
    let mut map = std::collections::HashMap::new();
    map.insert((1u8, 2u8), "tuple keys have no JSON form");
    let err = BlockDraft::from_serializable(1, "01/09/2021", &map).expect_err("must reject");
    assert!(matches!(err, LedgerError::InvalidPayload(_)));
}

#[test]
fn empty_dump_is_an_error() {
    let err = from_json(r#"{ "blocks": [] }"#, ChainConfig::default()).expect_err("must reject");
    assert!(matches!(err, LedgerError::EmptyChain));
}
