use serenity::all::{ChannelId, GuildId, RoleId, UserId};

use crate::model::antinuke::ProtectionKind;

/// Audit log category queried when attributing an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditCategory {
    MemberBanAdd,
    MemberKick,
    RoleDelete,
    ChannelDelete,
    WebhookCreate,
    BotAdd,
}

/// The fields of an audit log entry the attribution step relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditEntry {
    /// Audit entry snowflake.
    pub id: u64,
    pub executor_id: UserId,
    /// Raw id of the entity acted upon: a user, role, channel or webhook.
    pub target_id: Option<u64>,
    pub created_at_ms: i64,
}

/// Destructive guild event that may be the work of a nuking actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildEvent {
    BanAdded {
        guild_id: GuildId,
        user_id: UserId,
    },
    /// A member left the guild. Only counts when the audit log shows a kick.
    MemberRemoved {
        guild_id: GuildId,
        user_id: UserId,
    },
    RoleDeleted {
        guild_id: GuildId,
        role_id: RoleId,
    },
    ChannelDeleted {
        guild_id: GuildId,
        channel_id: ChannelId,
    },
    /// Webhooks changed in a channel. The gateway does not say which webhook, the
    /// audit entry does.
    WebhookCreated {
        guild_id: GuildId,
        channel_id: ChannelId,
    },
    /// A bot account joined. Human joins are filtered out by the gateway handler.
    BotAdded {
        guild_id: GuildId,
        user_id: UserId,
    },
}

impl GuildEvent {
    pub fn guild_id(&self) -> GuildId {
        match *self {
            Self::BanAdded { guild_id, .. }
            | Self::MemberRemoved { guild_id, .. }
            | Self::RoleDeleted { guild_id, .. }
            | Self::ChannelDeleted { guild_id, .. }
            | Self::WebhookCreated { guild_id, .. }
            | Self::BotAdded { guild_id, .. } => guild_id,
        }
    }

    /// Protection guarding against this event.
    pub fn protection_kind(&self) -> ProtectionKind {
        match *self {
            Self::BanAdded { .. } => ProtectionKind::MaxBans,
            Self::MemberRemoved { .. } => ProtectionKind::MaxKicks,
            Self::RoleDeleted { .. } => ProtectionKind::MaxRoleDeletes,
            Self::ChannelDeleted { .. } => ProtectionKind::MaxChannelDeletes,
            Self::WebhookCreated { .. } => ProtectionKind::WebhookCreate,
            Self::BotAdded { .. } => ProtectionKind::BotAdd,
        }
    }

    /// Target the audit entry must name for attribution to be accepted.
    ///
    /// Only kicks and bot additions are matched against their target; the other
    /// kinds trust the latest audit entry of their category.
    pub fn required_target(&self) -> Option<u64> {
        match *self {
            Self::MemberRemoved { user_id, .. } | Self::BotAdded { user_id, .. } => {
                Some(user_id.get())
            }
            _ => None,
        }
    }
}
