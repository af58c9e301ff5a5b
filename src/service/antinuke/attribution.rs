//! Attributes a destructive guild event to the member who caused it.
//!
//! The gateway does not say who performed an action, so the resolver waits for the
//! audit log to catch up and reads the single latest entry of the matching
//! category. This is a heuristic: two identical actions inside the propagation
//! window can both be attributed to the latest entry.
//!
//! Instant protections act once per audit entry. [`HandledEntries`] remembers the
//! entries already attributed so a later gateway event that reads the same entry
//! (the bot deleting the webhook it just punished, an edit to another webhook) is
//! declined.

use dashmap::DashMap;
use serenity::all::{GuildId, UserId};
use std::collections::VecDeque;
use std::time::Duration;

use crate::{
    model::event::{AuditEntry, GuildEvent},
    platform::GuildPlatform,
    util::clock::Clock,
};

/// Wait before reading the audit log so it reflects the event.
pub const AUDIT_GRACE_DELAY: Duration = Duration::from_millis(1000);

/// Audit entries older than this at resolution time are ignored.
pub const AUDIT_STALENESS_MS: i64 = 10_000;

/// Handled entry ids remembered per guild.
pub const HANDLED_ENTRY_CAP: usize = 50;

/// Why an event was not attributed to anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    /// The audit log could not be fetched.
    AuditUnavailable,
    NoEntry,
    /// The latest entry names a different member than the one in the event.
    TargetMismatch,
    /// The bot performed the action itself, usually as a mitigation.
    SelfAction,
    Stale,
    /// The entry was already attributed for an instant protection.
    AlreadyHandled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    Actor { executor: UserId, entry: AuditEntry },
    Declined(DeclineReason),
}

pub struct AttributionResolver<'a> {
    platform: &'a dyn GuildPlatform,
    clock: &'a dyn Clock,
    bot_id: UserId,
    grace_delay: Duration,
}

impl<'a> AttributionResolver<'a> {
    pub fn new(platform: &'a dyn GuildPlatform, clock: &'a dyn Clock, bot_id: UserId) -> Self {
        Self {
            platform,
            clock,
            bot_id,
            grace_delay: AUDIT_GRACE_DELAY,
        }
    }

    pub fn with_grace_delay(mut self, grace_delay: Duration) -> Self {
        self.grace_delay = grace_delay;
        self
    }

    /// Waits the grace delay, then attributes `event` using the latest audit
    /// entry of its category.
    pub async fn resolve(&self, event: &GuildEvent) -> Attribution {
        let kind = event.protection_kind();

        if !self.grace_delay.is_zero() {
            tokio::time::sleep(self.grace_delay).await;
        }

        let entries = match self
            .platform
            .fetch_recent_audit_entries(event.guild_id(), kind.audit_category(), 1)
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    "Audit log unavailable for {} in guild {}: {}",
                    kind,
                    event.guild_id(),
                    e
                );
                return Attribution::Declined(DeclineReason::AuditUnavailable);
            }
        };

        let Some(entry) = entries.into_iter().next() else {
            return Attribution::Declined(DeclineReason::NoEntry);
        };

        evaluate_entry(
            entry,
            event.required_target(),
            self.bot_id,
            self.clock.now_ms(),
        )
    }
}

/// Applies the acceptance rules to a fetched audit entry.
///
/// Checks run in order: target match, self action, staleness.
pub fn evaluate_entry(
    entry: AuditEntry,
    required_target: Option<u64>,
    bot_id: UserId,
    now_ms: i64,
) -> Attribution {
    if let Some(target) = required_target {
        if entry.target_id != Some(target) {
            return Attribution::Declined(DeclineReason::TargetMismatch);
        }
    }

    if entry.executor_id == bot_id {
        return Attribution::Declined(DeclineReason::SelfAction);
    }

    if now_ms - entry.created_at_ms > AUDIT_STALENESS_MS {
        return Attribution::Declined(DeclineReason::Stale);
    }

    Attribution::Actor {
        executor: entry.executor_id,
        entry,
    }
}

/// Audit entry ids already acted on, newest last, per guild.
#[derive(Default)]
pub struct HandledEntries {
    entries: DashMap<GuildId, VecDeque<u64>>,
}

impl HandledEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `entry_id` as handled for the guild. Returns `false` when it already was.
    ///
    /// Check and insert happen under one shard lock, so of two concurrent claims for
    /// the same entry exactly one succeeds. Only the latest [`HANDLED_ENTRY_CAP`]
    /// ids are kept.
    pub fn claim(&self, guild_id: GuildId, entry_id: u64) -> bool {
        let mut ids = self.entries.entry(guild_id).or_default();
        if ids.contains(&entry_id) {
            return false;
        }

        ids.push_back(entry_id);
        if ids.len() > HANDLED_ENTRY_CAP {
            ids.pop_front();
        }
        true
    }
}
