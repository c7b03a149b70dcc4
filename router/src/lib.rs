//! Gossip router for the trustmesh node.
//!
//! Classifies incoming documents by shape, picks a weighted random fanout of
//! member and non-member peers (or a single target for status messages), and
//! emits one [`RoutingEnvelope`] per routable document, in arrival order.

pub mod classify;
pub mod config;
pub mod directory;
pub mod envelope;
pub mod error;
pub mod memory;
pub mod peer;
pub mod random;
pub mod router;
pub mod selection;

pub use classify::{classify, Classification, DocumentKind};
pub use config::RouterConfig;
pub use directory::{PeerDirectory, Peering};
pub use envelope::{RoutedDocument, RoutingEnvelope};
pub use error::{DirectoryError, PeeringError, RouterError};
pub use memory::{MemoryPeerDirectory, PeerStatus, StaticPeering};
pub use peer::{mirror_target, peerize, Peer, TargetPeer};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use router::{Router, RouterHandle, STAT_NAMES};
pub use selection::{choose_x_in, selection_index, FanoutCaps, SELECTION_SPAN};
