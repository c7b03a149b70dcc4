//! In-process peer registry and a static peering identity.
//!
//! Used by the relay daemon, which has no persistent peer store, and by
//! tests that want a real directory rather than a recording double.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use tracing::{debug, info};
use trustmesh_types::Pubkey;

use crate::directory::{PeerDirectory, Peering};
use crate::error::{DirectoryError, PeeringError};
use crate::peer::Peer;

/// Reachability of a known peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerStatus {
    Up,
    Down,
}

#[derive(Clone, Debug)]
struct PeerEntry {
    peer: Peer,
    status: PeerStatus,
}

#[derive(Debug, Default)]
struct Registry {
    /// Known peers keyed by public key.
    peers: HashMap<Pubkey, PeerEntry>,
    /// Keys currently recognised as network members.
    members: HashSet<Pubkey>,
}

/// Peer directory held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryPeerDirectory {
    registry: RwLock<Registry>,
}

impl MemoryPeerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a peer record.
    pub async fn upsert(&self, peer: Peer, status: PeerStatus) {
        let mut registry = self.registry.write().await;
        debug!(pubkey = %peer.pubkey, ?status, "peer registered");
        registry.peers.insert(peer.pubkey.clone(), PeerEntry { peer, status });
    }

    pub async fn set_member(&self, pubkey: Pubkey, member: bool) {
        let mut registry = self.registry.write().await;
        if member {
            registry.members.insert(pubkey);
        } else {
            registry.members.remove(&pubkey);
        }
    }

    async fn set_status(&self, pubkey: &Pubkey, status: PeerStatus) -> bool {
        match self.registry.write().await.peers.get_mut(pubkey) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }

    pub async fn status(&self, pubkey: &Pubkey) -> Option<PeerStatus> {
        self.registry.read().await.peers.get(pubkey).map(|e| e.status)
    }

    /// Number of known peers, up or down.
    pub async fn len(&self) -> usize {
        self.registry.read().await.peers.len()
    }
}

#[async_trait]
impl PeerDirectory for MemoryPeerDirectory {
    async fn randomly_up_peers_without(
        &self,
        excluded: &[Pubkey],
    ) -> Result<Vec<Peer>, DirectoryError> {
        let mut peers: Vec<Peer> = self
            .registry
            .read()
            .await
            .peers
            .values()
            .filter(|e| e.status == PeerStatus::Up && !excluded.contains(&e.peer.pubkey))
            .map(|e| e.peer.clone())
            .collect();
        peers.shuffle(&mut rand::thread_rng());
        Ok(peers)
    }

    async fn is_member(&self, pubkey: &Pubkey) -> Result<bool, DirectoryError> {
        Ok(self.registry.read().await.members.contains(pubkey))
    }

    async fn get_peer(&self, pubkey: &Pubkey) -> Result<Option<Peer>, DirectoryError> {
        Ok(self
            .registry
            .read()
            .await
            .peers
            .get(pubkey)
            .map(|e| e.peer.clone()))
    }

    async fn set_peer_down(&self, pubkey: &Pubkey) -> Result<(), DirectoryError> {
        // A peer already dropped from the registry needs no update.
        if !self.set_status(pubkey, PeerStatus::Down).await {
            debug!(pubkey = %pubkey, "unknown peer reported unreachable, ignored");
        }
        Ok(())
    }
}

/// Fixed local identity with a static list of mirror endpoints.
#[derive(Clone, Debug)]
pub struct StaticPeering {
    pubkey: Pubkey,
    mirrors: Vec<String>,
}

impl StaticPeering {
    pub fn new(pubkey: Pubkey, mirrors: Vec<String>) -> Self {
        Self { pubkey, mirrors }
    }
}

#[async_trait]
impl Peering for StaticPeering {
    fn pubkey(&self) -> &Pubkey {
        &self.pubkey
    }

    async fn mirror_endpoints(&self) -> Result<Vec<String>, PeeringError> {
        Ok(self.mirrors.clone())
    }

    async fn handle_newer_peer(&self, peer: Peer) -> Result<(), PeeringError> {
        // Nothing to reconcile without a local peer document store.
        info!(pubkey = %peer.pubkey, "newer peer record received");
        Ok(())
    }
}
