use thiserror::Error;
use trustmesh_types::Pubkey;

/// Failure reported by a [`PeerDirectory`](crate::PeerDirectory).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("peer directory unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by the [`Peering`](crate::Peering) service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PeeringError {
    #[error("a newer peer document is available on the network")]
    NewerPeerDocumentAvailable,

    #[error("peering failure: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("peer {0} not found")]
    PeerNotFound(Pubkey),

    #[error("newer peer document available on the network for local node")]
    NewerPeerDocumentAvailable,

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("peering failure: {0}")]
    Peering(String),

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("config error: {0}")]
    Config(String),
}

impl RouterError {
    /// Whether this is the benign race where the network already holds a
    /// newer version of a peer document.
    pub fn is_newer_peer_race(&self) -> bool {
        matches!(self, Self::NewerPeerDocumentAvailable)
    }
}

impl From<PeeringError> for RouterError {
    fn from(err: PeeringError) -> Self {
        match err {
            PeeringError::NewerPeerDocumentAvailable => Self::NewerPeerDocumentAvailable,
            PeeringError::Failed(msg) => Self::Peering(msg),
        }
    }
}
