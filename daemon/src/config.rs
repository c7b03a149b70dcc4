//! Relay configuration with TOML file support.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use trustmesh_router::{MemoryPeerDirectory, Peer, PeerStatus, RouterConfig, StaticPeering};
use trustmesh_types::Pubkey;
use trustmesh_utils::LogFormat;

/// A peer known to the relay before it starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerConfig {
    pub pubkey: String,

    #[serde(default)]
    pub endpoints: Vec<String>,

    /// Whether the peer is a network member.
    #[serde(default)]
    pub member: bool,

    /// Whether the peer starts as reachable.
    #[serde(default = "default_true")]
    pub up: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Public key of the local node.
    #[serde(default)]
    pub pubkey: String,

    /// Alternate endpoints the local node advertises.
    #[serde(default)]
    pub mirror_endpoints: Vec<String>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "info" or "debug,trustmesh_router=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub peers: Vec<PeerConfig>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Configured keys, local and peers, that are not 43-44 char base58 keys.
    ///
    /// An empty local key is left out: it only means no document is treated
    /// as self-originated.
    pub fn malformed_keys(&self) -> Vec<&str> {
        let local = Some(self.pubkey.as_str()).filter(|k| !k.is_empty());
        local
            .into_iter()
            .chain(self.peers.iter().map(|p| p.pubkey.as_str()))
            .filter(|k| !Pubkey::new(*k).is_valid())
            .collect()
    }

    pub fn peering(&self) -> StaticPeering {
        StaticPeering::new(Pubkey::new(&self.pubkey), self.mirror_endpoints.clone())
    }

    /// An in-memory directory holding the configured peers.
    pub async fn seed_directory(&self) -> MemoryPeerDirectory {
        let directory = MemoryPeerDirectory::new();
        for peer in &self.peers {
            let status = if peer.up { PeerStatus::Up } else { PeerStatus::Down };
            directory
                .upsert(Peer::new(peer.pubkey.as_str(), peer.endpoints.clone()), status)
                .await;
            directory
                .set_member(Pubkey::new(&peer.pubkey), peer.member)
                .await;
        }
        directory
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            pubkey: String::new(),
            mirror_endpoints: Vec::new(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            router: RouterConfig::default(),
            peers: Vec::new(),
        }
    }
}
