//! Transaction documents.
//!
//! A [`TransactionDraft`] is built leniently from loosely typed JSON and may be
//! edited freely. [`TransactionDraft::finalize`] freezes it into a
//! [`Transaction`] whose hash, output aggregates, and optional recipients are
//! fixed at that moment and never recomputed implicitly.

use std::fmt;
use std::ops::Deref;

use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use trustmesh_crypto::{Digester, Sha256Digester};
use trustmesh_types::{DocumentHash, Pubkey};

use crate::coerce::{
    as_object, int_field, optional_int_field, optional_string_field, parse_int_prefix,
    string_field, string_list,
};
use crate::raw;

fn leading_u64(field: Option<&str>) -> u64 {
    field
        .and_then(parse_int_prefix)
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(0)
}

/// One decomposed input: `amount:base:type:identifier:position`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InputRecord {
    pub amount: u64,
    pub base: u64,
    #[serde(rename = "type")]
    pub source_type: String,
    pub identifier: String,
    pub pos: u64,
    pub raw: String,
}

impl InputRecord {
    /// Split an input line positionally. Missing parts become empty or `0`.
    pub fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split(':').collect();
        Self {
            amount: leading_u64(parts.first().copied()),
            base: leading_u64(parts.get(1).copied()),
            source_type: parts.get(2).copied().unwrap_or_default().to_string(),
            identifier: parts.get(3).copied().unwrap_or_default().to_string(),
            pos: leading_u64(parts.get(4).copied()),
            raw: input.to_string(),
        }
    }
}

/// One decomposed output: `amount:base:conditions`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub amount: u64,
    pub base: u64,
    pub conditions: String,
    pub raw: String,
}

impl OutputRecord {
    pub fn parse(output: &str) -> Self {
        let parts: Vec<&str> = output.split(':').collect();
        Self {
            amount: leading_u64(parts.first().copied()),
            base: leading_u64(parts.get(1).copied()),
            conditions: parts.get(2).copied().unwrap_or_default().to_string(),
            raw: output.to_string(),
        }
    }

    /// Rebuild the output line from the record's fields.
    pub fn to_raw(&self) -> String {
        format!("{}:{}:{}", self.amount, self.base, self.conditions)
    }

    /// The key named by the first `SIG(..)` condition, or [`Recipient::Unknown`].
    pub fn recipient(&self) -> Recipient {
        recipient_of(&self.raw)
    }
}

/// Recipient extracted from an output's unlock condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recipient {
    Pubkey(Pubkey),
    Unknown,
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Pubkey(pk) => write!(f, "{pk}"),
            Recipient::Unknown => f.write_str("UNKNOWN"),
        }
    }
}

impl Serialize for Recipient {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Greedy: from the first `SIG(` up to the last `)` on the line.
fn recipient_of(output: &str) -> Recipient {
    let captured = output.find("SIG(").and_then(|start| {
        let rest = &output[start + 4..];
        rest.rfind(')').map(|end| &rest[..end])
    });
    match captured {
        Some(key) if !key.is_empty() => Recipient::Pubkey(Pubkey::new(key)),
        _ => Recipient::Unknown,
    }
}

/// Structured view of a transaction, shared by standalone and block-embedded
/// transactions.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub hash: Option<DocumentHash>,
    pub version: u64,
    pub currency: String,
    pub issuers: Vec<Pubkey>,
    pub signatures: Vec<String>,
    pub inputs: Vec<InputRecord>,
    pub unlocks: Vec<String>,
    pub outputs: Vec<OutputRecord>,
    pub comment: String,
    pub blockstamp: String,
    pub blockstamp_time: Option<u64>,
    pub locktime: u64,
}

/// Editable transaction fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionDraft {
    pub version: u64,
    pub currency: String,
    pub blockstamp: String,
    pub blockstamp_time: Option<u64>,
    pub locktime: u64,
    pub issuers: Vec<Pubkey>,
    pub inputs: Vec<String>,
    pub unlocks: Vec<String>,
    pub outputs: Vec<String>,
    /// Empty when the transaction carries no comment.
    pub comment: String,
    pub signatures: Vec<String>,
    /// Hash supplied with the input; adopted as-is by [`finalize`](Self::finalize).
    pub hash: Option<DocumentHash>,
}

impl TransactionDraft {
    /// Build from JSON. Never fails: unusable fields take their defaults.
    pub fn from_json(value: &Value) -> Self {
        let obj = as_object(value);
        Self {
            version: int_field(&obj, "version"),
            currency: string_field(&obj, "currency"),
            blockstamp: string_field(&obj, "blockstamp"),
            blockstamp_time: optional_int_field(&obj, "blockstampTime"),
            locktime: int_field(&obj, "locktime"),
            issuers: string_list(&obj, "issuers")
                .into_iter()
                .map(Pubkey::from)
                .collect(),
            inputs: string_list(&obj, "inputs"),
            unlocks: string_list(&obj, "unlocks"),
            outputs: string_list(&obj, "outputs"),
            comment: string_field(&obj, "comment"),
            signatures: string_list(&obj, "signatures"),
            hash: optional_string_field(&obj, "hash").map(DocumentHash::new),
        }
    }

    /// Build from JSON, forcing the currency when one is given.
    pub fn from_json_in_currency(value: &Value, currency: &str) -> Self {
        let mut draft = Self::from_json(value);
        if !currency.is_empty() {
            draft.currency = currency.to_string();
        }
        draft
    }

    pub fn has_comment(&self) -> bool {
        !self.comment.is_empty()
    }

    /// Canonical raw form, signatures included. This is the hash input.
    pub fn raw(&self) -> String {
        raw::transaction(self)
    }

    pub fn compact(&self) -> String {
        raw::compact_transaction(self)
    }

    pub fn compute_hash(&self) -> DocumentHash {
        self.compute_hash_with(&Sha256Digester)
    }

    pub fn compute_hash_with<D: Digester>(&self, digester: &D) -> DocumentHash {
        digester.digest(self.raw().as_bytes())
    }

    /// Weighted size: header and blockstamp, issuer/signature pairs,
    /// input/unlock pairs, the comment line, and outputs.
    pub fn weighted_len(&self) -> usize {
        2 + self.issuers.len() * 2
            + self.inputs.len() * 2
            + usize::from(self.has_comment())
            + self.outputs.len()
    }

    pub fn input_records(&self) -> Vec<InputRecord> {
        self.inputs.iter().map(|i| InputRecord::parse(i)).collect()
    }

    pub fn output_records(&self) -> Vec<OutputRecord> {
        self.outputs.iter().map(|o| OutputRecord::parse(o)).collect()
    }

    pub fn recipients(&self) -> Vec<Recipient> {
        self.outputs.iter().map(|o| recipient_of(o)).collect()
    }

    pub fn view(&self) -> TransactionView {
        self.view_with_hash(self.hash.clone())
    }

    fn view_with_hash(&self, hash: Option<DocumentHash>) -> TransactionView {
        TransactionView {
            hash,
            version: self.version,
            currency: self.currency.clone(),
            issuers: self.issuers.clone(),
            signatures: self.signatures.clone(),
            inputs: self.input_records(),
            unlocks: self.unlocks.clone(),
            outputs: self.output_records(),
            comment: self.comment.clone(),
            blockstamp: self.blockstamp.clone(),
            blockstamp_time: self.blockstamp_time,
            locktime: self.locktime,
        }
    }

    pub fn to_json(&self) -> Value {
        self.json_with_hash(self.hash.as_ref())
    }

    fn json_with_hash(&self, hash: Option<&DocumentHash>) -> Value {
        json!({
            "version": self.version,
            "currency": self.currency,
            "issuers": self.issuers,
            "inputs": self.inputs,
            "unlocks": self.unlocks,
            "outputs": self.outputs,
            "comment": self.comment,
            "locktime": self.locktime,
            "blockstamp": self.blockstamp,
            "blockstampTime": self.blockstamp_time,
            "signatures": self.signatures,
            "raw": self.raw(),
            "hash": hash,
        })
    }

    /// Freeze the draft. A supplied hash is adopted, otherwise it is computed.
    pub fn finalize(mut self) -> Transaction {
        let hash = match self.hash.take() {
            Some(hash) if !hash.is_empty() => hash,
            _ => self.compute_hash(),
        };
        Transaction::from_parts(self, hash)
    }
}

/// A finalized transaction: fields are read-only and the hash is fixed.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    fields: TransactionDraft,
    hash: DocumentHash,
    output_amount: u64,
    output_base: u64,
    recipients: Option<Vec<Recipient>>,
}

impl Transaction {
    fn from_parts(fields: TransactionDraft, hash: DocumentHash) -> Self {
        let outputs = fields.output_records();
        let output_amount = outputs
            .iter()
            .fold(0u64, |sum, o| sum.saturating_add(o.amount));
        let output_base = outputs.iter().map(|o| o.base).max().unwrap_or(0);
        Self {
            fields,
            hash,
            output_amount,
            output_base,
            recipients: None,
        }
    }

    pub fn from_json(value: &Value) -> Self {
        TransactionDraft::from_json(value).finalize()
    }

    pub fn from_json_in_currency(value: &Value, currency: &str) -> Self {
        TransactionDraft::from_json_in_currency(value, currency).finalize()
    }

    pub fn hash(&self) -> &DocumentHash {
        &self.hash
    }

    /// Sum of all output amounts, fixed at finalization.
    pub fn output_amount(&self) -> u64 {
        self.output_amount
    }

    /// Largest output base, fixed at finalization.
    pub fn output_base(&self) -> u64 {
        self.output_base
    }

    pub fn recipients(&self) -> Option<&[Recipient]> {
        self.recipients.as_deref()
    }

    pub fn with_recipients(mut self) -> Self {
        self.attach_recipients();
        self
    }

    fn attach_recipients(&mut self) {
        self.recipients = Some(self.fields.recipients());
    }

    /// Recompute the hash from the current fields, ignoring the stored one.
    pub fn rehash(self) -> Self {
        let hash = self.fields.compute_hash();
        Self { hash, ..self }
    }

    /// Back to an editable draft. The hash is dropped.
    pub fn into_draft(self) -> TransactionDraft {
        self.fields
    }

    pub fn view(&self) -> TransactionView {
        self.fields.view_with_hash(Some(self.hash.clone()))
    }

    pub fn to_json(&self) -> Value {
        let mut value = self.fields.json_with_hash(Some(&self.hash));
        if let (Some(recipients), Value::Object(map)) = (&self.recipients, &mut value) {
            map.insert("recipients".to_string(), json!(recipients));
        }
        value
    }
}

impl Deref for Transaction {
    type Target = TransactionDraft;

    fn deref(&self) -> &TransactionDraft {
        &self.fields
    }
}

impl Serialize for Transaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Attach recipients to every transaction of a batch.
pub fn set_recipients(txs: &mut [Transaction]) {
    for tx in txs {
        tx.attach_recipients();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        json!({
            "version": 10,
            "currency": "g1",
            "blockstamp": "12-0000A",
            "locktime": 0,
            "issuers": ["HgTTJLAQ5sqfknMq7yLPZbehtuLSsKj9CxWN7k8QvYJd"],
            "inputs": ["100:0:D:HgTTJLAQ5sqfknMq7yLPZbehtuLSsKj9CxWN7k8QvYJd:3"],
            "unlocks": ["0:SIG(0)"],
            "outputs": ["100:0:SIG(DNann1Lh55eZMEDXeYt59bzHbA3NJR46DeQYCS2qQdLV)"],
            "comment": "",
            "signatures": ["sig=="]
        })
    }

    #[test]
    fn raw_layout_is_fixed() {
        let tx = TransactionDraft::from_json(&sample());
        let expected = "Version: 10\nType: Transaction\nCurrency: g1\nBlockstamp: 12-0000A\n\
Locktime: 0\nIssuers:\nHgTTJLAQ5sqfknMq7yLPZbehtuLSsKj9CxWN7k8QvYJd\nInputs:\n\
100:0:D:HgTTJLAQ5sqfknMq7yLPZbehtuLSsKj9CxWN7k8QvYJd:3\nUnlocks:\n0:SIG(0)\nOutputs:\n\
100:0:SIG(DNann1Lh55eZMEDXeYt59bzHbA3NJR46DeQYCS2qQdLV)\nComment: \nsig==\n";
        assert_eq!(tx.raw(), expected);
    }

    #[test]
    fn compact_layout_counts_items() {
        let mut tx = TransactionDraft::from_json(&sample());
        assert!(tx.compact().starts_with("TX:10:1:1:1:1:0:0\n12-0000A\n"));
        tx.comment = "rent".into();
        let compact = tx.compact();
        assert!(compact.starts_with("TX:10:1:1:1:1:1:0\n"));
        assert!(compact.ends_with("rent\nsig==\n"));
    }

    #[test]
    fn finalize_computes_uppercase_hash() {
        let tx = Transaction::from_json(&sample());
        assert!(tx.hash().is_well_formed());
        assert_eq!(tx.hash(), &trustmesh_crypto::hash_document(&tx.raw()));
    }

    #[test]
    fn supplied_hash_is_adopted() {
        let mut input = sample();
        input["hash"] = json!("abcdef");
        let tx = Transaction::from_json(&input);
        assert_eq!(tx.hash().as_str(), "abcdef");
        assert_ne!(tx.clone().rehash().hash().as_str(), "abcdef");
    }

    #[test]
    fn currency_override() {
        let tx = TransactionDraft::from_json_in_currency(&sample(), "beta");
        assert_eq!(tx.currency, "beta");
        let tx = TransactionDraft::from_json_in_currency(&sample(), "");
        assert_eq!(tx.currency, "g1");
    }

    #[test]
    fn weighted_len_counts_units() {
        let mut tx = TransactionDraft::from_json(&sample());
        assert_eq!(tx.weighted_len(), 2 + 2 + 2 + 1);
        tx.comment = "x".into();
        assert_eq!(tx.weighted_len(), 8);
    }

    #[test]
    fn input_record_decomposition() {
        let input = InputRecord::parse("100:0:T:ABCD:7");
        assert_eq!(input.amount, 100);
        assert_eq!(input.base, 0);
        assert_eq!(input.source_type, "T");
        assert_eq!(input.identifier, "ABCD");
        assert_eq!(input.pos, 7);
        let short = InputRecord::parse("garbage");
        assert_eq!(short.amount, 0);
        assert_eq!(short.identifier, "");
    }

    #[test]
    fn output_record_back_to_raw() {
        let out = OutputRecord::parse("50:1:SIG(B)");
        assert_eq!(out.to_raw(), "50:1:SIG(B)");
        assert_eq!(out.recipient(), Recipient::Pubkey(Pubkey::new("B")));
    }

    #[test]
    fn recipient_extraction() {
        assert_eq!(recipient_of("1:0:XHX(abc)"), Recipient::Unknown);
        assert_eq!(recipient_of("1:0:SIG()"), Recipient::Unknown);
        assert_eq!(
            recipient_of("1:0:(SIG(A) || SIG(B))"),
            Recipient::Pubkey(Pubkey::new("A) || SIG(B)"))
        );
        assert_eq!(Recipient::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn recipients_are_attached_on_demand() {
        let tx = Transaction::from_json(&sample());
        assert!(tx.recipients().is_none());
        assert!(tx.to_json().get("recipients").is_none());
        let tx = tx.with_recipients();
        assert_eq!(tx.recipients().map(<[Recipient]>::len), Some(1));
        assert_eq!(
            tx.to_json()["recipients"][0],
            json!("DNann1Lh55eZMEDXeYt59bzHbA3NJR46DeQYCS2qQdLV")
        );
    }

    #[test]
    fn batch_set_recipients() {
        let mut txs = vec![Transaction::from_json(&sample()), Transaction::from_json(&sample())];
        set_recipients(&mut txs);
        assert!(txs.iter().all(|tx| tx.recipients().is_some()));
    }

    #[test]
    fn json_carries_raw_and_hash() {
        let tx = Transaction::from_json(&sample());
        let value = tx.to_json();
        assert_eq!(value["raw"], json!(tx.raw()));
        assert_eq!(value["hash"], json!(tx.hash().as_str()));
        assert_eq!(value["blockstampTime"], Value::Null);
    }

    #[test]
    fn into_draft_drops_hash() {
        let mut input = sample();
        input["hash"] = json!("FFFF");
        let draft = Transaction::from_json(&input).into_draft();
        assert_eq!(draft.hash, None);
    }
}
