//! Peer records as stored by the directory, and the resolved form carried in
//! routing envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use trustmesh_types::{Endpoint, Pubkey};

/// A peer as known to the peer directory.
///
/// Fields not needed for routing (version, currency, signature, status, ...)
/// are kept in `extra` so the full record can be handed on unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub pubkey: Pubkey,
    /// Advertised endpoint lines, unparsed.
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// Blockstamp the peer document was signed at, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Peer {
    pub fn new(pubkey: impl Into<Pubkey>, endpoints: Vec<String>) -> Self {
        Self {
            pubkey: pubkey.into(),
            endpoints,
            block: None,
            extra: Map::new(),
        }
    }
}

/// Destination of one routed document, endpoints resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TargetPeer {
    pub pubkey: Pubkey,
    pub endpoints: Vec<Endpoint>,
    /// Set for peers selected from the member pool.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub member: bool,
}

/// Resolve a directory record into an envelope target.
pub fn peerize(peer: &Peer, member: bool) -> TargetPeer {
    TargetPeer {
        pubkey: peer.pubkey.clone(),
        endpoints: peer.endpoints.iter().map(|e| Endpoint::parse(e)).collect(),
        member,
    }
}

/// Synthetic target standing for one of the local node's mirror endpoints.
pub fn mirror_target(index: usize, local: &Pubkey, endpoint: &str) -> TargetPeer {
    TargetPeer {
        pubkey: Pubkey::new(format!("M{index}_{local}")),
        endpoints: vec![Endpoint::parse(endpoint)],
        member: false,
    }
}
