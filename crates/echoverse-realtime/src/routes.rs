//! Navigation boundary.
//!
//! Clicking a notification resolves to one of a small set of external
//! route targets. This is a pure mapping over the record's kind and
//! embedded metadata; the navigation itself belongs to the host UI.

use crate::models::{NotificationKind, NotificationRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// Friends tab of the social hub (requests and invites live there).
    FriendsTab,
    /// Social hub landing page.
    SocialHub,
    /// A specific chat room surfaced by a share.
    ChatRoom(String),
}

pub fn route_for(record: &NotificationRecord) -> RouteTarget {
    match record.kind {
        NotificationKind::FriendRequest
        | NotificationKind::FriendRequestAccepted
        | NotificationKind::Invite
        | NotificationKind::InviteAccepted
        | NotificationKind::InviteRejected => RouteTarget::FriendsTab,
        NotificationKind::Share => match room_id(record) {
            Some(room) => RouteTarget::ChatRoom(room),
            None => RouteTarget::SocialHub,
        },
        NotificationKind::Message | NotificationKind::Other => RouteTarget::SocialHub,
    }
}

fn room_id(record: &NotificationRecord) -> Option<String> {
    record
        .metadata
        .as_ref()?
        .get("roomId")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
