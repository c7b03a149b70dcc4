//! Router configuration with TOML file support.

use serde::{Deserialize, Serialize};

use crate::error::RouterError;
use crate::selection::FanoutCaps;

/// Fanout caps and runtime settings for the gossip router.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Members to forward a self-originated document to.
    #[serde(default = "default_max_members_self")]
    pub max_members_self: usize,

    /// Members to forward a relayed document to.
    #[serde(default = "default_max_members_relay")]
    pub max_members_relay: usize,

    /// Non-members to forward a self-originated document to.
    #[serde(default = "default_max_nonmembers_self")]
    pub max_nonmembers_self: usize,

    /// Non-members to forward a relayed document to.
    #[serde(default = "default_max_nonmembers_relay")]
    pub max_nonmembers_relay: usize,

    /// Bound of the input and output channels of a spawned router.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Whether the router starts active.
    #[serde(default = "default_true")]
    pub active: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_max_members_self() -> usize {
    8
}

fn default_max_members_relay() -> usize {
    4
}

fn default_max_nonmembers_self() -> usize {
    6
}

fn default_max_nonmembers_relay() -> usize {
    4
}

fn default_channel_capacity() -> usize {
    256
}

fn default_true() -> bool {
    true
}

// ── Impl ───────────────────────────────────────────────────────────────

impl RouterConfig {
    /// Caps for a self-originated or a relayed document.
    pub fn caps(&self, self_originated: bool) -> FanoutCaps {
        if self_originated {
            FanoutCaps {
                members: self.max_members_self,
                nonmembers: self.max_nonmembers_self,
            }
        } else {
            FanoutCaps {
                members: self.max_members_relay,
                nonmembers: self.max_nonmembers_relay,
            }
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, RouterError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RouterError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, RouterError> {
        toml::from_str(s).map_err(|e| RouterError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, RouterError> {
        toml::to_string_pretty(self).map_err(|e| RouterError::Config(e.to_string()))
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_members_self: default_max_members_self(),
            max_members_relay: default_max_members_relay(),
            max_nonmembers_self: default_max_nonmembers_self(),
            max_nonmembers_relay: default_max_nonmembers_relay(),
            channel_capacity: default_channel_capacity(),
            active: default_true(),
        }
    }
}
