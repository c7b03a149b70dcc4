//! Canonical raw forms.
//!
//! The builders below fix the line order of every document; callers only
//! supply field values. The text they produce is what gets hashed and
//! signed, so any change here changes document identities network-wide.

use std::fmt::{Display, Write};

use crate::block::BlockDraft;
use crate::transaction::TransactionDraft;

fn line(raw: &mut String, key: &str, value: impl Display) {
    // Writing into a String cannot fail.
    let _ = writeln!(raw, "{key}: {value}");
}

fn section<S: AsRef<str>>(raw: &mut String, title: &str, items: &[S]) {
    raw.push_str(title);
    raw.push_str(":\n");
    for item in items {
        raw.push_str(item.as_ref());
        raw.push('\n');
    }
}

/// Transaction without its signature lines.
pub fn unsigned_transaction(tx: &TransactionDraft) -> String {
    let mut raw = String::new();
    line(&mut raw, "Version", tx.version);
    raw.push_str("Type: Transaction\n");
    line(&mut raw, "Currency", &tx.currency);
    line(&mut raw, "Blockstamp", &tx.blockstamp);
    line(&mut raw, "Locktime", tx.locktime);
    section(&mut raw, "Issuers", &tx.issuers.iter().map(|i| i.as_str()).collect::<Vec<_>>());
    section(&mut raw, "Inputs", &tx.inputs);
    section(&mut raw, "Unlocks", &tx.unlocks);
    section(&mut raw, "Outputs", &tx.outputs);
    line(&mut raw, "Comment", &tx.comment);
    raw
}

/// Full transaction: unsigned part followed by one signature per line.
pub fn transaction(tx: &TransactionDraft) -> String {
    let mut raw = unsigned_transaction(tx);
    for signature in &tx.signatures {
        raw.push_str(signature);
        raw.push('\n');
    }
    raw
}

/// Compact transaction layout used inside blocks and by low-bandwidth relays.
///
/// The header line carries the version, the item counts, whether a comment
/// follows, and the locktime; the items follow without section titles.
pub fn compact_transaction(tx: &TransactionDraft) -> String {
    let mut raw = format!(
        "TX:{}:{}:{}:{}:{}:{}:{}\n",
        tx.version,
        tx.issuers.len(),
        tx.inputs.len(),
        tx.unlocks.len(),
        tx.outputs.len(),
        if tx.has_comment() { 1 } else { 0 },
        tx.locktime
    );
    raw.push_str(&tx.blockstamp);
    raw.push('\n');
    let lines = tx
        .issuers
        .iter()
        .map(|i| i.as_str())
        .chain(tx.inputs.iter().map(String::as_str))
        .chain(tx.unlocks.iter().map(String::as_str))
        .chain(tx.outputs.iter().map(String::as_str));
    for l in lines {
        raw.push_str(l);
        raw.push('\n');
    }
    if tx.has_comment() {
        raw.push_str(&tx.comment);
        raw.push('\n');
    }
    for signature in &tx.signatures {
        raw.push_str(signature);
        raw.push('\n');
    }
    raw
}

/// Block content without proof-of-work nonce or signature.
pub fn block_inner_part(block: &BlockDraft) -> String {
    let mut raw = String::new();
    line(&mut raw, "Version", block.version);
    raw.push_str("Type: Block\n");
    line(&mut raw, "Currency", &block.currency);
    line(&mut raw, "Number", block.number);
    line(&mut raw, "PoWMin", block.pow_min);
    line(&mut raw, "Time", block.time);
    line(&mut raw, "MedianTime", block.median_time);
    if let Some(dividend) = block.dividend {
        line(&mut raw, "UniversalDividend", dividend);
    }
    line(&mut raw, "UnitBase", block.unitbase);
    line(&mut raw, "Issuer", &block.issuer);
    line(&mut raw, "IssuersFrame", block.issuers_frame);
    line(&mut raw, "IssuersFrameVar", block.issuers_frame_var);
    line(&mut raw, "DifferentIssuersCount", block.issuers_count);
    if let Some(previous_hash) = &block.previous_hash {
        line(&mut raw, "PreviousHash", previous_hash);
    }
    if let Some(previous_issuer) = &block.previous_issuer {
        line(&mut raw, "PreviousIssuer", previous_issuer);
    }
    if !block.parameters.is_empty() {
        line(&mut raw, "Parameters", &block.parameters);
    }
    line(&mut raw, "MembersCount", block.members_count);
    section(&mut raw, "Identities", &block.identities);
    section(&mut raw, "Joiners", &block.joiners);
    section(&mut raw, "Actives", &block.actives);
    section(&mut raw, "Leavers", &block.leavers);
    section(&mut raw, "Revoked", &block.revoked);
    section(&mut raw, "Excluded", &block.excluded);
    section(&mut raw, "Certifications", &block.certifications);
    raw.push_str("Transactions:\n");
    for tx in &block.transactions {
        raw.push_str(&compact_transaction(tx));
    }
    raw
}

/// The part of a block its issuer signs: inner hash and nonce.
pub fn block_signed_part(inner_hash: &str, nonce: u64) -> String {
    format!("InnerHash: {inner_hash}\nNonce: {nonce}\n")
}
