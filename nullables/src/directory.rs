//! Nullable peer directory: scripted peers, recorded calls, programmable
//! failures.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use trustmesh_router::{DirectoryError, Peer, PeerDirectory};
use trustmesh_types::Pubkey;

/// One call received by a [`NullPeerDirectory`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectoryCall {
    RandomlyUpWithout(Vec<Pubkey>),
    IsMember(Pubkey),
    GetPeer(Pubkey),
    SetPeerDown(Pubkey),
}

/// A directory whose up peers are returned exactly in insertion order.
#[derive(Default)]
pub struct NullPeerDirectory {
    peers: Mutex<Vec<Peer>>,
    members: Mutex<HashSet<Pubkey>>,
    down: Mutex<Vec<Pubkey>>,
    calls: Mutex<Vec<DirectoryCall>>,
    /// Failures returned by the next `randomly_up_peers_without` calls.
    up_query_failures: Mutex<Vec<DirectoryError>>,
    /// Keys whose membership lookup always fails.
    failing_members: Mutex<HashSet<Pubkey>>,
    /// Artificial latency of membership lookups, per key.
    member_delays: Mutex<HashMap<Pubkey, Duration>>,
}

impl NullPeerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an up peer.
    pub fn with_peer(self, pubkey: &str, member: bool) -> Self {
        self.add_peer(
            Peer::new(pubkey, vec![format!("BASIC_MERKLED_API {pubkey}.example.org 443")]),
            member,
        );
        self
    }

    pub fn add_peer(&self, peer: Peer, member: bool) {
        if member {
            self.members.lock().unwrap().insert(peer.pubkey.clone());
        }
        self.peers.lock().unwrap().push(peer);
    }

    /// Fail the next up-peer query once with `err`.
    pub fn fail_next_up_query(&self, err: DirectoryError) {
        self.up_query_failures.lock().unwrap().push(err);
    }

    pub fn fail_membership_of(&self, pubkey: &str) {
        self.failing_members.lock().unwrap().insert(Pubkey::new(pubkey));
    }

    pub fn delay_membership_of(&self, pubkey: &str, delay: Duration) {
        self.member_delays
            .lock()
            .unwrap()
            .insert(Pubkey::new(pubkey), delay);
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<DirectoryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Keys passed to `set_peer_down`, in order.
    pub fn downed(&self) -> Vec<Pubkey> {
        self.down.lock().unwrap().clone()
    }

    fn record(&self, call: DirectoryCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PeerDirectory for NullPeerDirectory {
    async fn randomly_up_peers_without(
        &self,
        excluded: &[Pubkey],
    ) -> Result<Vec<Peer>, DirectoryError> {
        self.record(DirectoryCall::RandomlyUpWithout(excluded.to_vec()));
        let failure = self.up_query_failures.lock().unwrap().pop();
        if let Some(err) = failure {
            return Err(err);
        }
        let down = self.down.lock().unwrap().clone();
        Ok(self
            .peers
            .lock()
            .unwrap()
            .iter()
            .filter(|p| !excluded.contains(&p.pubkey) && !down.contains(&p.pubkey))
            .cloned()
            .collect())
    }

    async fn is_member(&self, pubkey: &Pubkey) -> Result<bool, DirectoryError> {
        self.record(DirectoryCall::IsMember(pubkey.clone()));
        let delay = self.member_delays.lock().unwrap().get(pubkey).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_members.lock().unwrap().contains(pubkey) {
            return Err(DirectoryError::Unavailable(format!(
                "membership of {pubkey} unavailable"
            )));
        }
        Ok(self.members.lock().unwrap().contains(pubkey))
    }

    async fn get_peer(&self, pubkey: &Pubkey) -> Result<Option<Peer>, DirectoryError> {
        self.record(DirectoryCall::GetPeer(pubkey.clone()));
        Ok(self
            .peers
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.pubkey == pubkey)
            .cloned())
    }

    async fn set_peer_down(&self, pubkey: &Pubkey) -> Result<(), DirectoryError> {
        self.record(DirectoryCall::SetPeerDown(pubkey.clone()));
        self.down.lock().unwrap().push(pubkey.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let dir = NullPeerDirectory::new().with_peer("A", true).with_peer("B", false);
        let local = Pubkey::new("LOCAL");
        let up = dir.randomly_up_peers_without(&[local.clone()]).await.unwrap();
        assert_eq!(up.len(), 2);
        assert!(dir.is_member(&Pubkey::new("A")).await.unwrap());
        assert!(!dir.is_member(&Pubkey::new("B")).await.unwrap());
        assert_eq!(
            dir.calls(),
            vec![
                DirectoryCall::RandomlyUpWithout(vec![local]),
                DirectoryCall::IsMember(Pubkey::new("A")),
                DirectoryCall::IsMember(Pubkey::new("B")),
            ]
        );
    }

    #[tokio::test]
    async fn scripted_failures() {
        let dir = NullPeerDirectory::new().with_peer("A", true);
        dir.fail_next_up_query(DirectoryError::Unavailable("offline".into()));
        dir.fail_membership_of("A");
        assert!(dir.randomly_up_peers_without(&[]).await.is_err());
        assert!(dir.randomly_up_peers_without(&[]).await.is_ok());
        assert!(dir.is_member(&Pubkey::new("A")).await.is_err());
    }

    #[tokio::test]
    async fn downed_peers_leave_the_up_list() {
        let dir = NullPeerDirectory::new().with_peer("A", false).with_peer("B", false);
        dir.set_peer_down(&Pubkey::new("A")).await.unwrap();
        let up = dir.randomly_up_peers_without(&[]).await.unwrap();
        assert_eq!(up.len(), 1);
        assert_eq!(dir.downed(), vec![Pubkey::new("A")]);
        assert!(dir.get_peer(&Pubkey::new("A")).await.unwrap().is_some());
    }
}
