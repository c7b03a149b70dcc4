//! Shape-based classification of incoming documents.
//!
//! Shapes overlap (a block also carries transactions, a certification also
//! carries a `pubkey`), so the rules are tried in a fixed order and the
//! first match wins.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use trustmesh_documents::coerce::is_truthy;
use trustmesh_types::Pubkey;

use crate::error::RouterError;
use crate::peer::Peer;

/// Network message type of a routable document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Block,
    Revocation,
    Identity,
    #[serde(rename = "cert")]
    Certification,
    Membership,
    Transaction,
    Peer,
    Status,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Revocation => "revocation",
            Self::Identity => "identity",
            Self::Certification => "cert",
            Self::Membership => "membership",
            Self::Transaction => "transaction",
            Self::Peer => "peer",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the router should do with one document.
#[derive(Clone, Debug, PartialEq)]
pub enum Classification {
    /// Relay to a weighted random sample of up peers.
    Broadcast {
        kind: DocumentKind,
        self_originated: bool,
    },
    /// Status emitted by this node, sent to a single peer.
    Targeted { to: Pubkey },
    /// A peer reported unreachable: mark it down.
    PeerDown(Pubkey),
    /// A newer peer record exists: hand it to peering.
    NewerPeer(Peer),
    /// Matches no rule.
    Drop,
}

fn text<'a>(doc: &'a Value, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}

fn is_local(doc: &Value, key: &str, local: &Pubkey) -> bool {
    text(doc, key).is_some_and(|value| local == value)
}

fn peer_record(doc: &Value) -> Result<Peer, RouterError> {
    let peer = doc
        .get("peer")
        .ok_or_else(|| RouterError::Malformed("missing peer record".into()))?;
    serde_json::from_value(peer.clone()).map_err(|e| RouterError::Malformed(e.to_string()))
}

/// Classify `doc` relative to the local node's key.
///
/// Errors only for documents that match a rule but lack the fields that rule
/// needs (a transaction without an issuer list, an unreachable notice
/// without a peer key).
pub fn classify(doc: &Value, local: &Pubkey) -> Result<Classification, RouterError> {
    let has = |key: &str| is_truthy(doc.get(key));
    let broadcast = |kind, self_originated| Classification::Broadcast {
        kind,
        self_originated,
    };

    if has("joiners") {
        return Ok(broadcast(DocumentKind::Block, is_local(doc, "issuer", local)));
    }
    if has("revocation") {
        return Ok(broadcast(DocumentKind::Revocation, is_local(doc, "pubkey", local)));
    }
    if has("pubkey") && has("uid") {
        return Ok(broadcast(DocumentKind::Identity, is_local(doc, "pubkey", local)));
    }
    if has("idty_uid") {
        return Ok(broadcast(DocumentKind::Certification, is_local(doc, "pubkey", local)));
    }
    if has("userid") {
        return Ok(broadcast(DocumentKind::Membership, is_local(doc, "issuer", local)));
    }
    if has("inputs") {
        let issuers = doc
            .get("issuers")
            .and_then(Value::as_array)
            .ok_or_else(|| RouterError::Malformed("transaction without issuers".into()))?;
        let self_originated = issuers
            .iter()
            .filter_map(Value::as_str)
            .any(|issuer| local == issuer);
        return Ok(broadcast(DocumentKind::Transaction, self_originated));
    }
    if has("endpoints") {
        return Ok(broadcast(DocumentKind::Peer, is_local(doc, "pubkey", local)));
    }
    if has("from") && is_local(doc, "from", local) {
        let to = if has("to") { text(doc, "to") } else { text(doc, "idty_issuer") };
        return Ok(Classification::Targeted {
            to: Pubkey::new(to.unwrap_or_default()),
        });
    }
    if has("unreachable") {
        let pubkey = doc
            .get("peer")
            .and_then(|p| p.get("pubkey"))
            .and_then(Value::as_str)
            .ok_or_else(|| RouterError::Malformed("unreachable notice without peer key".into()))?;
        return Ok(Classification::PeerDown(Pubkey::new(pubkey)));
    }
    if has("outdated") {
        return Ok(Classification::NewerPeer(peer_record(doc)?));
    }
    Ok(Classification::Drop)
}
