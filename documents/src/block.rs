//! Block documents.
//!
//! [`BlockDraft`] carries every block field and all raw forms; it is what the
//! block generator mutates while assembling a candidate. [`Block`] is the
//! finalized, read-only value whose hash was fixed once by
//! [`BlockDraft::finalize`].

use std::ops::Deref;

use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use tracing::trace;
use trustmesh_crypto::{Digester, Sha256Digester};
use trustmesh_types::{Blockstamp, CurrencyParams, DocumentHash, Pubkey};

use crate::coerce::{
    as_object, int_field, optional_int_field, optional_string_field, string_field, string_list,
};
use crate::error::DocumentError;
use crate::parameters;
use crate::raw;
use crate::transaction::{TransactionDraft, TransactionView};

/// Editable block fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockDraft {
    pub version: u64,
    pub currency: String,
    pub number: u64,
    pub pow_min: u64,
    pub time: u64,
    pub median_time: u64,
    /// `None` when no dividend is issued by this block.
    pub dividend: Option<u64>,
    pub ud_time: u64,
    pub unitbase: u64,
    pub issuer: Pubkey,
    pub issuers_frame: u64,
    pub issuers_frame_var: u64,
    pub issuers_count: u64,
    pub previous_hash: Option<DocumentHash>,
    pub previous_issuer: Option<Pubkey>,
    /// Colon-delimited protocol constants; only the genesis block sets it.
    pub parameters: String,
    pub members_count: u64,
    pub identities: Vec<String>,
    pub joiners: Vec<String>,
    pub actives: Vec<String>,
    pub leavers: Vec<String>,
    pub revoked: Vec<String>,
    pub excluded: Vec<String>,
    pub certifications: Vec<String>,
    pub transactions: Vec<TransactionDraft>,
    /// Declared size as received; see [`weighted_len`](Self::weighted_len).
    pub len: u64,
    pub inner_hash: Option<DocumentHash>,
    pub nonce: u64,
    pub signature: String,
    /// Hash supplied with the input; adopted as-is by [`finalize`](Self::finalize).
    pub hash: Option<DocumentHash>,
}

impl BlockDraft {
    /// Build from JSON. Never fails: unusable fields take their defaults.
    ///
    /// Embedded transactions inherit the block's currency.
    pub fn from_json(value: &Value) -> Self {
        let obj = as_object(value);
        let currency = string_field(&obj, "currency");
        let transactions = obj
            .get("transactions")
            .and_then(Value::as_array)
            .map(|txs| {
                txs.iter()
                    .map(|tx| TransactionDraft::from_json_in_currency(tx, &currency))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            version: int_field(&obj, "version"),
            number: int_field(&obj, "number"),
            pow_min: int_field(&obj, "powMin"),
            time: int_field(&obj, "time"),
            median_time: int_field(&obj, "medianTime"),
            dividend: optional_int_field(&obj, "dividend"),
            ud_time: int_field(&obj, "UDTime"),
            unitbase: int_field(&obj, "unitbase"),
            issuer: Pubkey::new(string_field(&obj, "issuer")),
            issuers_frame: int_field(&obj, "issuersFrame"),
            issuers_frame_var: int_field(&obj, "issuersFrameVar"),
            issuers_count: int_field(&obj, "issuersCount"),
            previous_hash: optional_string_field(&obj, "previousHash").map(DocumentHash::new),
            previous_issuer: optional_string_field(&obj, "previousIssuer").map(Pubkey::new),
            parameters: string_field(&obj, "parameters"),
            members_count: int_field(&obj, "membersCount"),
            identities: string_list(&obj, "identities"),
            joiners: string_list(&obj, "joiners"),
            actives: string_list(&obj, "actives"),
            leavers: string_list(&obj, "leavers"),
            revoked: string_list(&obj, "revoked"),
            excluded: string_list(&obj, "excluded"),
            certifications: string_list(&obj, "certifications"),
            transactions,
            len: int_field(&obj, "len"),
            inner_hash: optional_string_field(&obj, "inner_hash").map(DocumentHash::new),
            nonce: int_field(&obj, "nonce"),
            signature: string_field(&obj, "signature"),
            hash: optional_string_field(&obj, "hash").map(DocumentHash::new),
            currency,
        }
    }

    /// Content without nonce or signature.
    pub fn raw_inner_part(&self) -> String {
        raw::block_inner_part(self)
    }

    /// The supplied inner hash, or the digest of [`raw_inner_part`](Self::raw_inner_part).
    pub fn inner_hash(&self) -> DocumentHash {
        self.inner_hash_with(&Sha256Digester)
    }

    fn inner_hash_with<D: Digester>(&self, digester: &D) -> DocumentHash {
        match &self.inner_hash {
            Some(hash) if !hash.is_empty() => hash.clone(),
            _ => digester.digest(self.raw_inner_part().as_bytes()),
        }
    }

    /// `InnerHash` and `Nonce` lines: what the issuer signs.
    pub fn signed_part(&self) -> String {
        raw::block_signed_part(self.inner_hash().as_str(), self.nonce)
    }

    /// Inner part followed by the signed part, unsigned.
    pub fn raw(&self) -> String {
        let mut raw = self.raw_inner_part();
        raw.push_str(&self.signed_part());
        raw
    }

    /// Signed part plus signature line. This is the hash input.
    pub fn proof_of_work_part(&self) -> String {
        format!("{}{}\n", self.signed_part(), self.signature)
    }

    /// The complete block as transmitted and stored.
    pub fn raw_signed(&self) -> String {
        format!("{}{}\n", self.raw(), self.signature)
    }

    pub fn compute_hash(&self) -> DocumentHash {
        self.compute_hash_with(&Sha256Digester)
    }

    pub fn compute_hash_with<D: Digester>(&self, digester: &D) -> DocumentHash {
        let signed = raw::block_signed_part(self.inner_hash_with(digester).as_str(), self.nonce);
        digester.digest(format!("{signed}{}\n", self.signature).as_bytes())
    }

    /// Weighted size: every collection entry counts once, every embedded
    /// transaction by its own weighted size.
    pub fn weighted_len(&self) -> usize {
        self.identities.len()
            + self.joiners.len()
            + self.actives.len()
            + self.leavers.len()
            + self.revoked.len()
            + self.certifications.len()
            + self
                .transactions
                .iter()
                .map(TransactionDraft::weighted_len)
                .sum::<usize>()
    }

    pub fn quick_description(&self) -> String {
        format!(
            "#{} ({} newcomers, {} certifications)",
            self.number,
            self.identities.len(),
            self.certifications.len()
        )
    }

    /// First identity line starting with `pubkey`, in list order.
    pub fn inline_identity(&self, pubkey: &str) -> Option<&str> {
        self.identities
            .iter()
            .map(String::as_str)
            .find(|line| line.starts_with(pubkey))
    }

    /// Embedded transactions decomposed the same way as standalone ones.
    pub fn transactions_view(&self) -> Vec<TransactionView> {
        self.transactions.iter().map(TransactionDraft::view).collect()
    }

    /// Decoded protocol constants, when this block carries any.
    pub fn params(&self) -> Option<CurrencyParams> {
        if self.parameters.is_empty() {
            return None;
        }
        Some(parameters::decode(&self.parameters))
    }

    pub fn params_strict(&self) -> Result<CurrencyParams, DocumentError> {
        parameters::decode_strict(&self.parameters)
    }

    pub fn to_json(&self) -> Value {
        self.json_with_hash(self.hash.as_ref())
    }

    fn json_with_hash(&self, hash: Option<&DocumentHash>) -> Value {
        let transactions: Vec<Value> = self
            .transactions
            .iter()
            .map(TransactionDraft::to_json)
            .collect();
        json!({
            "version": self.version,
            "currency": self.currency,
            "number": self.number,
            "powMin": self.pow_min,
            "time": self.time,
            "medianTime": self.median_time,
            "dividend": self.dividend,
            "UDTime": self.ud_time,
            "unitbase": self.unitbase,
            "issuer": self.issuer,
            "issuersFrame": self.issuers_frame,
            "issuersFrameVar": self.issuers_frame_var,
            "issuersCount": self.issuers_count,
            "previousHash": self.previous_hash,
            "previousIssuer": self.previous_issuer,
            "parameters": self.parameters,
            "membersCount": self.members_count,
            "identities": self.identities,
            "joiners": self.joiners,
            "actives": self.actives,
            "leavers": self.leavers,
            "revoked": self.revoked,
            "excluded": self.excluded,
            "certifications": self.certifications,
            "transactions": transactions,
            "len": self.len,
            "inner_hash": self.inner_hash,
            "nonce": self.nonce,
            "signature": self.signature,
            "hash": hash,
        })
    }

    /// Freeze the draft. A supplied hash is adopted, otherwise it is computed.
    pub fn finalize(mut self) -> Block {
        let hash = match self.hash.take() {
            Some(hash) if !hash.is_empty() => hash,
            _ => {
                let hash = self.compute_hash();
                trace!(number = self.number, hash = %hash, "block hash computed");
                hash
            }
        };
        Block { fields: self, hash }
    }
}

/// A finalized block: fields are read-only and the hash is fixed.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    fields: BlockDraft,
    hash: DocumentHash,
}

impl Block {
    pub fn from_json(value: &Value) -> Self {
        BlockDraft::from_json(value).finalize()
    }

    /// Hash of a block given as JSON, adopting a supplied hash.
    pub fn hash_of(value: &Value) -> DocumentHash {
        Self::from_json(value).hash
    }

    pub fn hash(&self) -> &DocumentHash {
        &self.hash
    }

    pub fn number_and_hash(&self) -> Blockstamp {
        Blockstamp::new(self.fields.number, self.hash.clone())
    }

    /// Back to an editable draft. The hash is dropped.
    pub fn into_draft(self) -> BlockDraft {
        self.fields
    }

    pub fn to_json(&self) -> Value {
        self.fields.json_with_hash(Some(&self.hash))
    }
}

impl Deref for Block {
    type Target = BlockDraft;

    fn deref(&self) -> &BlockDraft {
        &self.fields
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
