//! Boundary to the chat platform.
//!
//! The anti-nuke pipeline never talks to Discord directly; it goes through the
//! [`GuildPlatform`] trait so the whole pipeline can run against an in-memory
//! platform in tests. [`discord::SerenityPlatform`] is the production
//! implementation backed by Serenity's HTTP client.

pub mod discord;
pub mod notification;

#[cfg(test)]
pub mod mock;

use serenity::all::{ChannelId, GuildId, RoleId, UserId, WebhookId};
use serenity::async_trait;
use thiserror::Error;

use crate::{
    error::internal::InternalError,
    model::event::{AuditCategory, AuditEntry},
    platform::notification::LogNotification,
};

/// Failure of a platform call.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The bot lacks the permission or role hierarchy position for the operation.
    #[error("Missing permissions to {0}")]
    MissingPermissions(String),

    /// The entity acted upon no longer exists.
    #[error("{0} not found")]
    NotFound(String),

    /// The notification could not be rendered.
    #[error(transparent)]
    Render(#[from] InternalError),

    /// Any other Discord API failure.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    Discord(#[from] Box<serenity::Error>),
}

/// A resolved Discord account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformUser {
    pub id: UserId,
    /// Display tag such as `name` or `name#1234`.
    pub tag: String,
}

/// A resolved guild membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformMember {
    pub user_id: UserId,
    pub role_ids: Vec<RoleId>,
}

/// Operations the anti-nuke pipeline needs from the chat platform.
///
/// Lookups return `Ok(None)` when the entity does not exist; `Err` is reserved for
/// failures to ask at all. Mutations fail with [`PlatformError`] on permission or
/// not-found conditions.
#[async_trait]
pub trait GuildPlatform: Send + Sync {
    /// Fetches up to `limit` audit entries of `category`, newest first.
    async fn fetch_recent_audit_entries(
        &self,
        guild_id: GuildId,
        category: AuditCategory,
        limit: u8,
    ) -> Result<Vec<AuditEntry>, PlatformError>;

    async fn fetch_guild_owner(&self, guild_id: GuildId) -> Result<UserId, PlatformError>;

    async fn resolve_user(&self, user_id: UserId) -> Result<Option<PlatformUser>, PlatformError>;

    async fn resolve_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<PlatformMember>, PlatformError>;

    async fn ban_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError>;

    async fn kick_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError>;

    /// Replaces the member's role set with an empty one.
    async fn clear_member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError>;

    async fn delete_webhook(&self, webhook_id: WebhookId, reason: &str)
        -> Result<(), PlatformError>;

    async fn send_notification(
        &self,
        channel_id: ChannelId,
        notification: &LogNotification,
    ) -> Result<(), PlatformError>;
}
