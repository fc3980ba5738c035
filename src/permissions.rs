//! Administrator check for server-scoped settings.

use serenity::model::guild::Member;
use serenity::model::id::UserId;

/// What the check needs to know about the invoking member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberAuthority {
    pub user_id: UserId,
    pub administrator: bool,
}

impl MemberAuthority {
    /// Interaction payloads carry the member's resolved permissions.
    pub fn from_member(member: &Member) -> Self {
        Self {
            user_id: member.user.id,
            administrator: member.permissions.is_some_and(|p| p.administrator()),
        }
    }
}

/// The owning side of the check: who owns the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerOwnership {
    pub owner_id: UserId,
}

/// True when the member holds the administrator permission or owns the server.
/// An absent member or server is never an admin.
pub fn is_admin(member: Option<&MemberAuthority>, server: Option<&ServerOwnership>) -> bool {
    let (Some(member), Some(server)) = (member, server) else {
        return false;
    };
    member.administrator || member.user_id == server.owner_id
}
