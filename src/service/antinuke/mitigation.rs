//! Applies the configured punishment once a protection triggers.
//!
//! Platform failures never abort mitigation: they are logged and returned in the
//! [`MitigationReport`] so the history entry and log notification are still
//! written. Only an unresolvable actor or a failed settings write is an error.

use sea_orm::DatabaseConnection;
use serenity::all::{GuildId, UserId, WebhookId};
use thiserror::Error;

use crate::{
    model::antinuke::{ActionRecord, GuildProtectionConfig, MitigationAction, ProtectionKind},
    platform::{notification::LogNotification, GuildPlatform, PlatformError},
    service::antinuke::store::{AntiNukeSettingsStore, StoreError},
    util::clock::Clock,
};

#[derive(Error, Debug)]
pub enum MitigationError {
    /// The actor's account could not be looked up; nothing was done or recorded.
    #[error("Could not resolve user {0} for mitigation")]
    ActorUnresolved(UserId),

    /// The action was applied but the history entry could not be saved.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a mitigation ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MitigationOutcome {
    Banned,
    Kicked,
    Deranked,
    WebhookDeleted,
    BotKicked,
    BotBanned,
    /// The target is no longer in the guild, or the configured action does not apply.
    NoActionTaken,
    /// The platform rejected the action.
    Failed(MitigationAction),
}

impl MitigationOutcome {
    /// Text shown in the log notification and stored in the action history.
    pub fn description(self) -> String {
        match self {
            Self::Banned => "User was banned".to_string(),
            Self::Kicked => "User was kicked".to_string(),
            Self::Deranked => "User was deranked (all roles removed)".to_string(),
            Self::WebhookDeleted => "Webhook was deleted".to_string(),
            Self::BotKicked => "Bot was kicked".to_string(),
            Self::BotBanned => "Bot was banned".to_string(),
            Self::NoActionTaken => "No action taken".to_string(),
            Self::Failed(action) => format!("Failed to {} (missing permissions?)", action),
        }
    }
}

/// Input to [`MitigationEngine::act`].
#[derive(Debug, Clone)]
pub struct MitigationRequest {
    pub guild_id: GuildId,
    pub actor: UserId,
    pub kind: ProtectionKind,
    /// Window count that crossed the threshold, `1` for instant protections.
    pub trigger_count: u32,
    /// Raw id named by the audit entry: the created webhook or the added bot.
    pub target_id: Option<u64>,
    /// Config loaded when the event arrived; decides the action and log channel.
    pub config: GuildProtectionConfig,
}

#[derive(Debug)]
pub struct MitigationReport {
    pub outcome: MitigationOutcome,
    pub record: ActionRecord,
    /// Why the platform rejected the action, if it did.
    pub action_error: Option<PlatformError>,
    /// Why the log notification could not be sent, if it could not.
    pub notify_error: Option<PlatformError>,
}

pub struct MitigationEngine<'a> {
    db: &'a DatabaseConnection,
    platform: &'a dyn GuildPlatform,
    clock: &'a dyn Clock,
}

impl<'a> MitigationEngine<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        platform: &'a dyn GuildPlatform,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            db,
            platform,
            clock,
        }
    }

    /// Punishes the actor, notifies the log channel and appends to the history.
    ///
    /// Every call acts; repeated triggers in one burst are not deduplicated.
    ///
    /// # Returns
    /// - `Ok(MitigationReport)` - Mitigation ran; platform failures are in the report
    /// - `Err(MitigationError::ActorUnresolved)` - Actor lookup failed, nothing done
    /// - `Err(MitigationError::Store)` - Action applied but history not saved
    pub async fn act(
        &self,
        request: MitigationRequest,
    ) -> Result<MitigationReport, MitigationError> {
        let user = match self.platform.resolve_user(request.actor).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(MitigationError::ActorUnresolved(request.actor)),
            Err(e) => {
                tracing::warn!("Failed to resolve user {}: {}", request.actor, e);
                return Err(MitigationError::ActorUnresolved(request.actor));
            }
        };

        let action = request.config.rule(request.kind).action;
        let reason = format!("Anti-nuke protection: {}", request.kind);

        let (outcome, action_error) = match self.apply(&request, action, &reason).await {
            Ok(outcome) => (outcome, None),
            Err(e) => {
                tracing::warn!(
                    "Failed to {} for {} in guild {}: {}",
                    action,
                    request.kind,
                    request.guild_id,
                    e
                );
                (MitigationOutcome::Failed(action), Some(e))
            }
        };

        let now_ms = self.clock.now_ms();
        let notify_error = self.notify(&request, outcome, now_ms).await;

        let record = ActionRecord {
            user_id: request.actor,
            display_name: user.tag,
            protection_kind: request.kind,
            mitigation_description: outcome.description(),
            trigger_count: request.trigger_count,
            timestamp_ms: now_ms,
        };

        // Append to the stored document, not the snapshot taken when the event arrived.
        let store = AntiNukeSettingsStore::new(self.db);
        let mut config = store.get(request.guild_id).await?;
        config.push_history(record.clone());
        store.set(request.guild_id, &config).await?;

        tracing::info!(
            "Anti-nuke {} triggered by {} in guild {}: {}",
            request.kind,
            request.actor,
            request.guild_id,
            record.mitigation_description
        );

        Ok(MitigationReport {
            outcome,
            record,
            action_error,
            notify_error,
        })
    }

    async fn apply(
        &self,
        request: &MitigationRequest,
        action: MitigationAction,
        reason: &str,
    ) -> Result<MitigationOutcome, PlatformError> {
        if !request.kind.allowed_actions().contains(&action) {
            tracing::warn!(
                "Action {} is not valid for {} in guild {}",
                action,
                request.kind,
                request.guild_id
            );
            return Ok(MitigationOutcome::NoActionTaken);
        }

        let guild_id = request.guild_id;
        let target = request.target_id;

        match action {
            MitigationAction::Delete => {
                let Some(webhook_id) = target else {
                    return Ok(MitigationOutcome::NoActionTaken);
                };
                self.platform
                    .delete_webhook(WebhookId::new(webhook_id), reason)
                    .await?;
                Ok(MitigationOutcome::WebhookDeleted)
            }
            MitigationAction::Ban if request.kind == ProtectionKind::BotAdd => {
                let Some(bot_id) = target else {
                    return Ok(MitigationOutcome::NoActionTaken);
                };
                self.platform
                    .ban_member(guild_id, UserId::new(bot_id), reason)
                    .await?;
                Ok(MitigationOutcome::BotBanned)
            }
            MitigationAction::Kick if request.kind == ProtectionKind::BotAdd => {
                let Some(bot_id) = target else {
                    return Ok(MitigationOutcome::NoActionTaken);
                };
                self.platform
                    .kick_member(guild_id, UserId::new(bot_id), reason)
                    .await?;
                Ok(MitigationOutcome::BotKicked)
            }
            MitigationAction::Ban => {
                if !self.actor_is_member(request).await {
                    return Ok(MitigationOutcome::NoActionTaken);
                }
                self.platform
                    .ban_member(guild_id, request.actor, reason)
                    .await?;
                Ok(MitigationOutcome::Banned)
            }
            MitigationAction::Kick => {
                if !self.actor_is_member(request).await {
                    return Ok(MitigationOutcome::NoActionTaken);
                }
                self.platform
                    .kick_member(guild_id, request.actor, reason)
                    .await?;
                Ok(MitigationOutcome::Kicked)
            }
            MitigationAction::Derank => {
                if !self.actor_is_member(request).await {
                    return Ok(MitigationOutcome::NoActionTaken);
                }
                self.platform
                    .clear_member_roles(guild_id, request.actor, reason)
                    .await?;
                Ok(MitigationOutcome::Deranked)
            }
        }
    }

    /// Whether the actor is still in the guild. A failed lookup counts as gone.
    async fn actor_is_member(&self, request: &MitigationRequest) -> bool {
        match self
            .platform
            .resolve_member(request.guild_id, request.actor)
            .await
        {
            Ok(member) => member.is_some(),
            Err(e) => {
                tracing::warn!(
                    "Failed to resolve member {} in guild {}: {}",
                    request.actor,
                    request.guild_id,
                    e
                );
                false
            }
        }
    }

    /// Posts to the log channel if one is configured. Returns the send failure.
    async fn notify(
        &self,
        request: &MitigationRequest,
        outcome: MitigationOutcome,
        now_ms: i64,
    ) -> Option<PlatformError> {
        let channel_id = request.config.log_channel_id?;

        let notification = LogNotification {
            actor_id: request.actor,
            protection_kind: request.kind,
            outcome_description: outcome.description(),
            timestamp_ms: now_ms,
        };

        match self
            .platform
            .send_notification(channel_id, &notification)
            .await
        {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(
                    "Failed to send anti-nuke log to channel {}: {}",
                    channel_id,
                    e
                );
                Some(e)
            }
        }
    }
}
