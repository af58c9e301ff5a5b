//! Anti-nuke protection.
//!
//! Watches destructive guild events (bans, kicks, role and channel deletions,
//! webhook creation, bot additions), attributes each to an actor through the audit
//! log and punishes actors who exceed the guild's configured rate.
//!
//! The pipeline is split by concern:
//! - `attribution` - Audit log lookup deciding who performed an event
//! - `exemption` - Owner and whitelist checks
//! - `tracker` - Sliding-window action counts per actor
//! - `mitigation` - Punishment, log notification and history
//! - `store` - Per-guild settings document
//! - `settings` - Validated settings changes for the `/antinuke` command
//!
//! Events are processed concurrently with no locking around the tracker or the
//! settings document. Two events from one actor can both cross the threshold and
//! both trigger mitigation. Instant protections (webhook creation, bot additions)
//! act at most once per audit entry.

pub mod attribution;
pub mod exemption;
pub mod mitigation;
pub mod settings;
pub mod store;
pub mod tracker;

#[cfg(test)]
mod test;

use sea_orm::DatabaseConnection;
use serenity::all::{GuildId, UserId};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::AppError,
    model::{
        antinuke::{GuildProtectionConfig, ProtectionKind},
        event::GuildEvent,
    },
    platform::GuildPlatform,
    service::antinuke::{
        attribution::{
            Attribution, AttributionResolver, DeclineReason, HandledEntries, AUDIT_GRACE_DELAY,
        },
        exemption::{is_exempt, Exemption},
        mitigation::{MitigationEngine, MitigationReport, MitigationRequest},
        store::AntiNukeSettingsStore,
        tracker::ActionTracker,
    },
    util::clock::Clock,
};

/// How far an event got through the pipeline.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Anti-nuke or this protection is switched off for the guild.
    Disabled,
    Declined(DeclineReason),
    Exempt(Exemption),
    BelowThreshold { count: usize, threshold: u32 },
    Mitigated(MitigationReport),
}

/// Runs guild events through attribution, exemption, counting and mitigation.
pub struct AntiNukeService {
    db: DatabaseConnection,
    tracker: ActionTracker,
    platform: Arc<dyn GuildPlatform>,
    clock: Arc<dyn Clock>,
    /// The bot's own account; its audit entries are never attributed.
    bot_id: UserId,
    handled: HandledEntries,
    grace_delay: Duration,
}

impl AntiNukeService {
    pub fn new(
        db: DatabaseConnection,
        tracker: ActionTracker,
        platform: Arc<dyn GuildPlatform>,
        clock: Arc<dyn Clock>,
        bot_id: UserId,
    ) -> Self {
        Self {
            db,
            tracker,
            platform,
            clock,
            bot_id,
            handled: HandledEntries::new(),
            grace_delay: AUDIT_GRACE_DELAY,
        }
    }

    /// Overrides the audit log grace delay.
    #[cfg(test)]
    pub fn with_grace_delay(mut self, grace_delay: Duration) -> Self {
        self.grace_delay = grace_delay;
        self
    }

    pub fn tracker(&self) -> &ActionTracker {
        &self.tracker
    }

    /// Processes one event and reports where it stopped.
    ///
    /// A tracker record made before a later step fails is kept.
    ///
    /// # Returns
    /// - `Ok(PipelineOutcome)` - Event processed, possibly declined or below threshold
    /// - `Err(AppError::StoreErr)` - Settings could not be loaded or saved
    /// - `Err(AppError::MitigationErr)` - Actor unresolvable or history not saved
    pub async fn handle_event(&self, event: GuildEvent) -> Result<PipelineOutcome, AppError> {
        let kind = event.protection_kind();
        let guild_id = event.guild_id();

        let config = AntiNukeSettingsStore::new(&self.db).get(guild_id).await?;
        if !config.is_protecting(kind) {
            return Ok(PipelineOutcome::Disabled);
        }

        let resolver =
            AttributionResolver::new(self.platform.as_ref(), self.clock.as_ref(), self.bot_id)
                .with_grace_delay(self.grace_delay);
        let (actor, entry) = match resolver.resolve(&event).await {
            Attribution::Actor { executor, entry } => (executor, entry),
            Attribution::Declined(reason) => {
                tracing::debug!("Declined to attribute {:?}: {:?}", event, reason);
                return Ok(PipelineOutcome::Declined(reason));
            }
        };

        if !kind.is_rate_based() && !self.handled.claim(guild_id, entry.id) {
            tracing::debug!("Audit entry {} already handled for {}", entry.id, kind);
            return Ok(PipelineOutcome::Declined(DeclineReason::AlreadyHandled));
        }

        let exemption = self.check_exemption(guild_id, actor, &config).await;
        if exemption.exempts() {
            tracing::debug!("{} is exempt from {} ({:?})", actor, kind, exemption);
            return Ok(PipelineOutcome::Exempt(exemption));
        }

        let trigger_count = if kind.is_rate_based() {
            let (threshold, window_ms) = rate_limits(&config, kind);
            let now_ms = self.clock.now_ms();

            self.tracker.record(actor, kind, now_ms);
            let count = self.tracker.count_within(actor, kind, window_ms, now_ms);

            if count < threshold as usize {
                return Ok(PipelineOutcome::BelowThreshold { count, threshold });
            }
            u32::try_from(count).unwrap_or(u32::MAX)
        } else {
            1
        };

        let target_id = match event {
            GuildEvent::BotAdded { user_id, .. } => Some(user_id.get()),
            _ => entry.target_id,
        };

        let engine = MitigationEngine::new(&self.db, self.platform.as_ref(), self.clock.as_ref());
        let report = engine
            .act(MitigationRequest {
                guild_id,
                actor,
                kind,
                trigger_count,
                target_id,
                config,
            })
            .await?;

        Ok(PipelineOutcome::Mitigated(report))
    }

    /// Runs [`Self::handle_event`] and logs any error.
    pub async fn dispatch(&self, event: GuildEvent) {
        match self.handle_event(event).await {
            Ok(outcome) => tracing::debug!("Anti-nuke processed {:?}: {:?}", event, outcome),
            Err(e) => tracing::error!(
                "Anti-nuke failed to process event in guild {}: {}",
                event.guild_id(),
                e
            ),
        }
    }

    async fn check_exemption(
        &self,
        guild_id: GuildId,
        actor: UserId,
        config: &GuildProtectionConfig,
    ) -> Exemption {
        let owner_id = match self.platform.fetch_guild_owner(guild_id).await {
            Ok(owner_id) => Some(owner_id),
            Err(e) => {
                tracing::warn!("Failed to fetch owner of guild {}: {}", guild_id, e);
                None
            }
        };

        let member = if config.whitelisted_roles.is_empty() {
            None
        } else {
            match self.platform.resolve_member(guild_id, actor).await {
                Ok(member) => member,
                Err(e) => {
                    tracing::warn!("Failed to resolve member {}: {}", actor, e);
                    None
                }
            }
        };

        is_exempt(
            actor,
            owner_id,
            config,
            member.as_ref().map(|m| m.role_ids.as_slice()),
        )
    }
}

/// Threshold and window for a rate-based kind, filling gaps from the default rule.
fn rate_limits(config: &GuildProtectionConfig, kind: ProtectionKind) -> (u32, u64) {
    let rule = config.rule(kind);
    let default = kind.default_rule();

    (
        rule.threshold.or(default.threshold).unwrap_or(1),
        rule.window_ms.or(default.window_ms).unwrap_or(0),
    )
}
