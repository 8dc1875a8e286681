use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PEER_NAME;
use crate::models::UserId;
use crate::urls::resolve_avatar_url;

/// Wire DTO returned by the Friends API.
///
/// `id` is the relationship row id; `friend_id` is the peer's own user id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FriendDto {
    pub id: Option<UserId>,
    pub friend_id: Option<UserId>,
    pub friend_name: Option<String>,
    pub friend_email: Option<String>,
    pub friend_avatar: Option<String>,
}

/// Display metadata for one peer, keyed by the string peer id.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerSummary {
    pub id: String,
    pub numeric_id: Option<UserId>,
    pub name: String,
    pub username: String,
    pub avatar: Option<String>,
}

impl PeerSummary {
    /// Map the API DTO into display metadata, resolving the avatar against
    /// `base_url`. The peer id prefers the friend's user id over the
    /// relationship id.
    pub fn from_dto(dto: &FriendDto, base_url: &str) -> Self {
        let numeric_id = dto.friend_id.or(dto.id);
        let id = numeric_id.map(|n| n.to_string()).unwrap_or_default();
        let name = dto
            .friend_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("User {}", dto.friend_id.unwrap_or_default()));
        let username = dto
            .friend_email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
            .map(|local| format!("@{}", local.to_lowercase()))
            .unwrap_or_else(|| format!("@user{}", dto.friend_id.unwrap_or_default()));
        let avatar = resolve_avatar_url(base_url, dto.friend_avatar.as_deref());
        Self {
            id,
            numeric_id: dto.friend_id,
            name,
            username,
            avatar,
        }
    }
}

/// Mapping from peer id to display metadata, refreshed wholesale on each
/// successful friend-list fetch. Watchers read it at alert-emission time,
/// so a stale entry never blocks a live alert.
#[derive(Debug, Default)]
pub struct PeerDirectory {
    peers: HashMap<String, PeerSummary>,
}

impl PeerDirectory {
    pub fn replace_all(&mut self, peers: Vec<PeerSummary>) {
        self.peers = peers
            .into_iter()
            .filter(|p| !p.id.is_empty())
            .map(|p| (p.id.clone(), p))
            .collect();
    }

    pub fn get(&self, peer_id: &str) -> Option<&PeerSummary> {
        self.peers.get(peer_id)
    }

    /// Display name for alerts; falls back through the handle to a generic
    /// placeholder when the peer is unknown.
    pub fn display_name(&self, peer_id: &str) -> String {
        match self.peers.get(peer_id) {
            Some(peer) if !peer.name.is_empty() => peer.name.clone(),
            Some(peer) if !peer.username.is_empty() => peer.username.clone(),
            _ => DEFAULT_PEER_NAME.to_string(),
        }
    }

    pub fn avatar(&self, peer_id: &str) -> Option<String> {
        self.peers.get(peer_id).and_then(|p| p.avatar.clone())
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
