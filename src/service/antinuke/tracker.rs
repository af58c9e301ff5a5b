//! In-memory sliding-window counter of destructive actions per actor.

use dashmap::DashMap;
use serenity::all::UserId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::model::antinuke::ProtectionKind;

/// Timestamps older than this are discarded by [`ActionTracker::sweep`].
pub const SWEEP_RETENTION_MS: i64 = 3_600_000;

/// Per-actor action timestamps, keyed by protection kind.
///
/// Cloning shares the underlying map. `record` and `count_within` take the shard
/// lock separately, so a concurrent caller may observe the sequence before or after
/// another caller's filter.
#[derive(Clone, Default)]
pub struct ActionTracker {
    actions: Arc<DashMap<UserId, HashMap<ProtectionKind, Vec<i64>>>>,
}

impl ActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `now_ms` to the actor's sequence for `kind`.
    pub fn record(&self, actor: UserId, kind: ProtectionKind, now_ms: i64) {
        self.actions
            .entry(actor)
            .or_default()
            .entry(kind)
            .or_default()
            .push(now_ms);
    }

    /// Counts timestamps with `now_ms - t < window_ms`.
    ///
    /// The stored sequence is replaced by the filtered one. Unknown actors or kinds
    /// count as zero and are not inserted.
    pub fn count_within(
        &self,
        actor: UserId,
        kind: ProtectionKind,
        window_ms: u64,
        now_ms: i64,
    ) -> usize {
        let Some(mut kinds) = self.actions.get_mut(&actor) else {
            return 0;
        };
        let Some(timestamps) = kinds.get_mut(&kind) else {
            return 0;
        };

        let window_ms = i64::try_from(window_ms).unwrap_or(i64::MAX);
        timestamps.retain(|&t| now_ms.saturating_sub(t) < window_ms);
        timestamps.len()
    }

    /// Drops timestamps past [`SWEEP_RETENTION_MS`] and forgets actors left with
    /// none. Returns how many actors were forgotten.
    pub fn sweep(&self, now_ms: i64) -> usize {
        let before = self.actions.len();

        self.actions.retain(|_, kinds| {
            kinds.retain(|_, timestamps| {
                timestamps.retain(|&t| now_ms.saturating_sub(t) < SWEEP_RETENTION_MS);
                !timestamps.is_empty()
            });
            !kinds.is_empty()
        });

        before.saturating_sub(self.actions.len())
    }

    /// Number of actors currently tracked.
    pub fn tracked_actors(&self) -> usize {
        self.actions.len()
    }

    /// Copy of an actor's stored sequence for `kind`.
    #[cfg(test)]
    pub fn timestamps(&self, actor: UserId, kind: ProtectionKind) -> Vec<i64> {
        self.actions
            .get(&actor)
            .and_then(|kinds| kinds.get(&kind).cloned())
            .unwrap_or_default()
    }
}
