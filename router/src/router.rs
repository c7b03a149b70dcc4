//! The gossip routing stage.
//!
//! A [`Router`] takes documents one at a time, classifies them, resolves
//! their destination peers through the [`PeerDirectory`], and produces a
//! [`RoutingEnvelope`]. Failures are contained per document: they are logged
//! and counted, and the next document is processed normally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};
use trustmesh_types::Pubkey;
use trustmesh_utils::StatsCounter;

use crate::classify::{classify, Classification, DocumentKind};
use crate::config::RouterConfig;
use crate::directory::{PeerDirectory, Peering};
use crate::envelope::{RoutedDocument, RoutingEnvelope};
use crate::error::RouterError;
use crate::peer::{mirror_target, peerize, Peer, TargetPeer};
use crate::random::{RandomSource, ThreadRandom};
use crate::selection::choose_x_in;

/// Counter names exposed by [`RouterHandle::stats`].
pub const STAT_NAMES: &[&str] = &[
    "routed",
    "dropped",
    "failed",
    "skipped_inactive",
    "peers_down",
    "newer_peer",
];

struct Shared {
    active: AtomicBool,
    stats: StatsCounter,
}

/// Cloneable control surface of a router, usable while it runs on a task.
#[derive(Clone)]
pub struct RouterHandle {
    shared: Arc<Shared>,
}

impl RouterHandle {
    fn new(active: bool) -> Self {
        Self {
            shared: Arc::new(Shared {
                active: AtomicBool::new(active),
                stats: StatsCounter::new(STAT_NAMES),
            }),
        }
    }

    /// Turn routing on or off. While off, documents are consumed and dropped
    /// without touching the directory.
    pub fn set_active(&self, active: bool) {
        self.shared.active.store(active, Ordering::SeqCst);
        info!(active, "router activity changed");
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.shared.stats
    }
}

/// How destination peers are resolved for one document.
enum Selection {
    RandomUp { self_originated: bool },
    Targeted(Pubkey),
}

pub struct Router {
    directory: Arc<dyn PeerDirectory>,
    peering: Arc<dyn Peering>,
    random: Arc<dyn RandomSource>,
    config: RouterConfig,
    handle: RouterHandle,
}

impl Router {
    pub fn new(
        directory: Arc<dyn PeerDirectory>,
        peering: Arc<dyn Peering>,
        config: RouterConfig,
    ) -> Self {
        Self::with_random(directory, peering, config, Arc::new(ThreadRandom))
    }

    /// Build with an explicit random source, for reproducible sampling.
    pub fn with_random(
        directory: Arc<dyn PeerDirectory>,
        peering: Arc<dyn Peering>,
        config: RouterConfig,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let handle = RouterHandle::new(config.active);
        Self {
            directory,
            peering,
            random,
            config,
            handle,
        }
    }

    pub fn handle(&self) -> RouterHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Route one document. Never fails: errors are logged and yield `None`.
    pub async fn process(&self, doc: Value) -> Option<RoutingEnvelope> {
        let stats = self.handle.stats();
        if !self.handle.is_active() {
            trace!("router inactive, document skipped");
            stats.increment("skipped_inactive");
            return None;
        }
        match self.try_process(doc).await {
            Ok(Some(envelope)) => {
                debug!(kind = %envelope.kind, peers = envelope.peers.len(), "document routed");
                stats.increment("routed");
                Some(envelope)
            }
            Ok(None) => None,
            Err(err) if err.is_newer_peer_race() => {
                info!("newer peer document available on the network for local node");
                stats.increment("newer_peer");
                None
            }
            Err(err) => {
                error!(error = %err, "routing error");
                stats.increment("failed");
                None
            }
        }
    }

    async fn try_process(&self, doc: Value) -> Result<Option<RoutingEnvelope>, RouterError> {
        let local = self.peering.pubkey().clone();
        match classify(&doc, &local)? {
            Classification::Broadcast {
                kind,
                self_originated,
            } => {
                self.route(kind, doc, Selection::RandomUp { self_originated })
                    .await
            }
            Classification::Targeted { to } => {
                self.route(DocumentKind::Status, doc, Selection::Targeted(to))
                    .await
            }
            Classification::PeerDown(pubkey) => {
                self.directory.set_peer_down(&pubkey).await?;
                info!(pubkey = %pubkey, "peer unreachable: now considered as DOWN");
                self.handle.stats().increment("peers_down");
                Ok(None)
            }
            Classification::NewerPeer(peer) => {
                self.peering.handle_newer_peer(peer).await?;
                Ok(None)
            }
            Classification::Drop => {
                trace!("unclassifiable document dropped");
                self.handle.stats().increment("dropped");
                Ok(None)
            }
        }
    }

    async fn route(
        &self,
        kind: DocumentKind,
        doc: Value,
        selection: Selection,
    ) -> Result<Option<RoutingEnvelope>, RouterError> {
        // Activity may have changed while this document was being classified.
        if !self.handle.is_active() {
            self.handle.stats().increment("skipped_inactive");
            return Ok(None);
        }
        let peers = match selection {
            Selection::RandomUp { self_originated } => {
                self.random_up_peers(self_originated).await?
            }
            Selection::Targeted(to) => self.targeted(&to).await?,
        };
        Ok(Some(RoutingEnvelope {
            kind,
            document: RoutedDocument::from_json(kind, doc),
            peers,
        }))
    }

    /// Weighted sample of up peers: members first, then non-members, then
    /// the local node's mirror endpoints.
    pub async fn random_up_peers(
        &self,
        self_originated: bool,
    ) -> Result<Vec<TargetPeer>, RouterError> {
        let local = self.peering.pubkey().clone();
        let up = self
            .directory
            .randomly_up_peers_without(std::slice::from_ref(&local))
            .await?;

        let lookups = up.iter().map(|p| self.directory.is_member(&p.pubkey));
        let membership = join_all(lookups).await;

        let mut members: Vec<Peer> = Vec::new();
        let mut nonmembers: Vec<Peer> = Vec::new();
        for (peer, is_member) in up.into_iter().zip(membership) {
            if is_member? {
                members.push(peer);
            } else {
                nonmembers.push(peer);
            }
        }

        let caps = self.config.caps(self_originated);
        let members = choose_x_in(members, caps.members, self.random.as_ref());
        let nonmembers = choose_x_in(nonmembers, caps.nonmembers, self.random.as_ref());

        let mut targets: Vec<TargetPeer> = members
            .iter()
            .map(|p| peerize(p, true))
            .chain(nonmembers.iter().map(|p| peerize(p, false)))
            .collect();

        let mirrors = self.peering.mirror_endpoints().await?;
        targets.extend(
            mirrors
                .iter()
                .enumerate()
                .map(|(index, endpoint)| mirror_target(index, &local, endpoint)),
        );
        Ok(targets)
    }

    /// The single peer `to`, or nothing when `to` is the local node.
    pub async fn targeted(&self, to: &Pubkey) -> Result<Vec<TargetPeer>, RouterError> {
        if to == self.peering.pubkey() {
            return Ok(Vec::new());
        }
        match self.directory.get_peer(to).await? {
            Some(peer) => Ok(vec![peerize(&peer, false)]),
            None => Err(RouterError::PeerNotFound(to.clone())),
        }
    }

    /// Drain `input` in order, forwarding each envelope to `output`.
    ///
    /// Returns when `input` is closed or `output` has no receiver left.
    pub async fn run(self, mut input: mpsc::Receiver<Value>, output: mpsc::Sender<RoutingEnvelope>) {
        while let Some(doc) = input.recv().await {
            if let Some(envelope) = self.process(doc).await {
                if output.send(envelope).await.is_err() {
                    debug!("envelope receiver dropped, router stopping");
                    break;
                }
            }
        }
        debug!(stats = ?self.handle.stats().snapshot(), "router input closed");
    }

    /// Run on a tokio task. Envelopes come out in input order.
    pub fn spawn(
        self,
        input: mpsc::Receiver<Value>,
    ) -> (mpsc::Receiver<RoutingEnvelope>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let task = tokio::spawn(self.run(input, tx));
        (rx, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryPeerDirectory, PeerStatus, StaticPeering};
    use crate::random::SeededRandom;
    use serde_json::json;

    const LOCAL: &str = "LocalKey111111111111111111111111111111111111";

    async fn router_with(peers: &[(&str, bool)]) -> (Router, Arc<MemoryPeerDirectory>) {
        let directory = Arc::new(MemoryPeerDirectory::new());
        for (key, member) in peers {
            directory
                .upsert(Peer::new(*key, vec![format!("BMA {key}.example.org 80")]), PeerStatus::Up)
                .await;
            directory.set_member(Pubkey::new(*key), *member).await;
        }
        let peering = Arc::new(StaticPeering::new(Pubkey::new(LOCAL), vec![]));
        let router = Router::with_random(
            directory.clone(),
            peering,
            RouterConfig::default(),
            Arc::new(SeededRandom::new(1)),
        );
        (router, directory)
    }

    #[tokio::test]
    async fn relayed_block_respects_relay_caps() {
        let peers: Vec<(String, bool)> = (0..12).map(|i| (format!("P{i}"), i % 2 == 0)).collect();
        let refs: Vec<(&str, bool)> = peers.iter().map(|(k, m)| (k.as_str(), *m)).collect();
        let (router, _) = router_with(&refs).await;

        let envelope = router
            .process(json!({ "joiners": [], "issuer": "someone" }))
            .await
            .unwrap();
        assert_eq!(envelope.kind, DocumentKind::Block);
        let members = envelope.peers.iter().filter(|p| p.member).count();
        assert_eq!(members, 4);
        assert_eq!(envelope.peers.len(), 8);
        assert!(envelope.peers[..4].iter().all(|p| p.member));
    }

    #[tokio::test]
    async fn self_block_uses_self_caps() {
        let peers: Vec<(String, bool)> = (0..20).map(|i| (format!("P{i}"), i < 10)).collect();
        let refs: Vec<(&str, bool)> = peers.iter().map(|(k, m)| (k.as_str(), *m)).collect();
        let (router, _) = router_with(&refs).await;

        let envelope = router
            .process(json!({ "joiners": [], "issuer": LOCAL }))
            .await
            .unwrap();
        assert_eq!(envelope.peers.iter().filter(|p| p.member).count(), 8);
        assert_eq!(envelope.peers.len(), 14);
    }

    #[tokio::test]
    async fn local_node_is_never_a_target() {
        let (router, directory) = router_with(&[("A", true)]).await;
        directory
            .upsert(Peer::new(LOCAL, vec![]), PeerStatus::Up)
            .await;
        let envelope = router
            .process(json!({ "endpoints": [], "pubkey": "A" }))
            .await
            .unwrap();
        assert!(envelope.peers.iter().all(|p| p.pubkey.as_str() != LOCAL));
    }

    #[tokio::test]
    async fn unreachable_marks_peer_down() {
        let (router, directory) = router_with(&[("A", false)]).await;
        let out = router
            .process(json!({ "unreachable": true, "peer": { "pubkey": "A" } }))
            .await;
        assert!(out.is_none());
        assert_eq!(directory.status(&Pubkey::new("A")).await, Some(PeerStatus::Down));
        assert_eq!(router.handle().stats().get("peers_down"), 1);
    }

    #[tokio::test]
    async fn unreachable_notice_for_unknown_peer_is_not_a_failure() {
        let (router, directory) = router_with(&[("A", false)]).await;
        let out = router
            .process(json!({ "unreachable": true, "peer": { "pubkey": "gone" } }))
            .await;
        assert!(out.is_none());
        assert_eq!(router.handle().stats().get("failed"), 0);
        assert_eq!(router.handle().stats().get("peers_down"), 1);
        assert_eq!(directory.status(&Pubkey::new("A")).await, Some(PeerStatus::Up));
    }

    #[tokio::test]
    async fn status_to_unknown_peer_fails_softly() {
        let (router, _) = router_with(&[]).await;
        let out = router.process(json!({ "from": LOCAL, "to": "ghost" })).await;
        assert!(out.is_none());
        assert_eq!(router.handle().stats().get("failed"), 1);
    }

    #[tokio::test]
    async fn unclassifiable_documents_are_counted_as_dropped() {
        let (router, _) = router_with(&[]).await;
        assert!(router.process(json!({ "nothing": 1 })).await.is_none());
        assert_eq!(router.handle().stats().get("dropped"), 1);
    }
}
