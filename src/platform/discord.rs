use serenity::all::{
    ChannelId, CreateMessage, EditMember, GuildId, RoleId, UserId, WebhookId,
};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::guild::audit_log::{
    Action, ChannelAction, MemberAction, RoleAction, WebhookAction,
};
use std::sync::Arc;

use crate::{
    model::event::{AuditCategory, AuditEntry},
    platform::{
        notification::LogNotification, GuildPlatform, PlatformError, PlatformMember, PlatformUser,
    },
    util::snowflake::snowflake_to_unix_ms,
};

/// [`GuildPlatform`] backed by Serenity's HTTP client.
///
/// Shares the bot's `Arc<Http>` so requests go through the same rate limiter as
/// the gateway client.
pub struct SerenityPlatform {
    http: Arc<Http>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn audit_action(category: AuditCategory) -> Action {
    match category {
        AuditCategory::MemberBanAdd => Action::Member(MemberAction::BanAdd),
        AuditCategory::MemberKick => Action::Member(MemberAction::Kick),
        AuditCategory::RoleDelete => Action::Role(RoleAction::Delete),
        AuditCategory::ChannelDelete => Action::Channel(ChannelAction::Delete),
        AuditCategory::WebhookCreate => Action::Webhook(WebhookAction::Create),
        AuditCategory::BotAdd => Action::Member(MemberAction::BotAdd),
    }
}

/// Maps a Serenity error onto the platform taxonomy.
///
/// HTTP 403 and 404 become `MissingPermissions` and `NotFound`; everything else is
/// passed through as `Discord`.
fn classify(err: serenity::Error, subject: &str) -> PlatformError {
    if let serenity::Error::Http(http_err) = &err {
        match http_err.status_code().map(|status| status.as_u16()) {
            Some(403) => return PlatformError::MissingPermissions(subject.to_string()),
            Some(404) => return PlatformError::NotFound(subject.to_string()),
            _ => {}
        }
    }

    PlatformError::Discord(Box::new(err))
}

/// Turns a not-found failure into `Ok(None)` for lookups.
fn optional<T>(result: Result<T, PlatformError>) -> Result<Option<T>, PlatformError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(PlatformError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl GuildPlatform for SerenityPlatform {
    async fn fetch_recent_audit_entries(
        &self,
        guild_id: GuildId,
        category: AuditCategory,
        limit: u8,
    ) -> Result<Vec<AuditEntry>, PlatformError> {
        let logs = guild_id
            .audit_logs(
                &self.http,
                Some(audit_action(category)),
                None,
                None,
                Some(limit),
            )
            .await
            .map_err(|e| classify(e, "read the audit log"))?;

        Ok(logs
            .entries
            .into_iter()
            .map(|entry| AuditEntry {
                id: entry.id.get(),
                executor_id: entry.user_id,
                target_id: entry.target_id.map(|target| target.get()),
                created_at_ms: snowflake_to_unix_ms(entry.id.get()),
            })
            .collect())
    }

    async fn fetch_guild_owner(&self, guild_id: GuildId) -> Result<UserId, PlatformError> {
        let guild = guild_id
            .to_partial_guild(&self.http)
            .await
            .map_err(|e| classify(e, &format!("guild {}", guild_id)))?;

        Ok(guild.owner_id)
    }

    async fn resolve_user(&self, user_id: UserId) -> Result<Option<PlatformUser>, PlatformError> {
        let user = optional(
            self.http
                .get_user(user_id)
                .await
                .map_err(|e| classify(e, &format!("user {}", user_id))),
        )?;

        Ok(user.map(|user| PlatformUser {
            id: user.id,
            tag: user.tag(),
        }))
    }

    async fn resolve_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<PlatformMember>, PlatformError> {
        let member = optional(
            self.http
                .get_member(guild_id, user_id)
                .await
                .map_err(|e| classify(e, &format!("member {}", user_id))),
        )?;

        Ok(member.map(|member| PlatformMember {
            user_id: member.user.id,
            role_ids: member.roles,
        }))
    }

    async fn ban_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        guild_id
            .ban_with_reason(&self.http, user_id, 0, reason)
            .await
            .map_err(|e| classify(e, &format!("ban {}", user_id)))
    }

    async fn kick_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        guild_id
            .kick_with_reason(&self.http, user_id, reason)
            .await
            .map_err(|e| classify(e, &format!("kick {}", user_id)))
    }

    async fn clear_member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        let builder = EditMember::new()
            .roles(Vec::<RoleId>::new())
            .audit_log_reason(reason);

        guild_id
            .edit_member(&self.http, user_id, builder)
            .await
            .map(|_| ())
            .map_err(|e| classify(e, &format!("derank {}", user_id)))
    }

    async fn delete_webhook(
        &self,
        webhook_id: WebhookId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.http
            .delete_webhook(webhook_id, Some(reason))
            .await
            .map_err(|e| classify(e, &format!("webhook {}", webhook_id)))
    }

    async fn send_notification(
        &self,
        channel_id: ChannelId,
        notification: &LogNotification,
    ) -> Result<(), PlatformError> {
        let embed = notification.to_embed()?;

        channel_id
            .send_message(&self.http, CreateMessage::new().embed(embed))
            .await
            .map(|_| ())
            .map_err(|e| classify(e, &format!("channel {}", channel_id)))
    }
}
