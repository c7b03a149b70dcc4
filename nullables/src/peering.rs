//! Nullable peering: a fixed local identity that records reconciliations.

use std::sync::Mutex;

use async_trait::async_trait;
use trustmesh_router::{Peer, Peering, PeeringError};
use trustmesh_types::Pubkey;

pub struct NullPeering {
    pubkey: Pubkey,
    mirrors: Vec<String>,
    newer_peers: Mutex<Vec<Peer>>,
    newer_peer_error: Mutex<Option<PeeringError>>,
    mirror_error: Mutex<Option<PeeringError>>,
}

impl NullPeering {
    pub fn new(pubkey: impl Into<Pubkey>) -> Self {
        Self {
            pubkey: pubkey.into(),
            mirrors: Vec::new(),
            newer_peers: Mutex::new(Vec::new()),
            newer_peer_error: Mutex::new(None),
            mirror_error: Mutex::new(None),
        }
    }

    pub fn with_mirrors(mut self, mirrors: Vec<String>) -> Self {
        self.mirrors = mirrors;
        self
    }

    /// Make every `handle_newer_peer` call fail with `err`.
    pub fn fail_newer_peer_with(&self, err: PeeringError) {
        *self.newer_peer_error.lock().unwrap() = Some(err);
    }

    /// Make every `mirror_endpoints` call fail with `err`.
    pub fn fail_mirrors_with(&self, err: PeeringError) {
        *self.mirror_error.lock().unwrap() = Some(err);
    }

    /// Peer records passed to `handle_newer_peer`, in call order.
    pub fn newer_peers(&self) -> Vec<Peer> {
        self.newer_peers.lock().unwrap().clone()
    }
}

#[async_trait]
impl Peering for NullPeering {
    fn pubkey(&self) -> &Pubkey {
        &self.pubkey
    }

    async fn mirror_endpoints(&self) -> Result<Vec<String>, PeeringError> {
        let failure = self.mirror_error.lock().unwrap().clone();
        match failure {
            Some(err) => Err(err),
            None => Ok(self.mirrors.clone()),
        }
    }

    async fn handle_newer_peer(&self, peer: Peer) -> Result<(), PeeringError> {
        self.newer_peers.lock().unwrap().push(peer);
        let failure = self.newer_peer_error.lock().unwrap().clone();
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
