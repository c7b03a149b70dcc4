//! Collaborator interfaces consumed by the router.
//!
//! Both are object safe and `Send + Sync` so a router can hold them behind
//! `Arc<dyn ..>` and run on a tokio task.

use async_trait::async_trait;
use trustmesh_types::Pubkey;

use crate::error::{DirectoryError, PeeringError};
use crate::peer::Peer;

/// Lookup of known peers by status, membership, and identifier.
#[async_trait]
pub trait PeerDirectory: Send + Sync {
    /// Peers currently marked up, minus `excluded`, in random order.
    async fn randomly_up_peers_without(
        &self,
        excluded: &[Pubkey],
    ) -> Result<Vec<Peer>, DirectoryError>;

    async fn is_member(&self, pubkey: &Pubkey) -> Result<bool, DirectoryError>;

    async fn get_peer(&self, pubkey: &Pubkey) -> Result<Option<Peer>, DirectoryError>;

    async fn set_peer_down(&self, pubkey: &Pubkey) -> Result<(), DirectoryError>;
}

/// The local node's own peering identity.
#[async_trait]
pub trait Peering: Send + Sync {
    fn pubkey(&self) -> &Pubkey;

    /// Alternate endpoint lines the local node advertises.
    async fn mirror_endpoints(&self) -> Result<Vec<String>, PeeringError>;

    /// Reconcile with a peer record newer than the local view.
    async fn handle_newer_peer(&self, peer: Peer) -> Result<(), PeeringError>;
}
