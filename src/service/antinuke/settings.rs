//! Validated changes to a guild's anti-nuke settings.
//!
//! Backs the `/antinuke` command. Every method loads the stored document, applies
//! one change and saves it; validation happens before anything is written.

use sea_orm::DatabaseConnection;
use serenity::all::{ChannelId, GuildId, RoleId, UserId};
use thiserror::Error;

use crate::{
    model::antinuke::{
        ActionRecord, GuildProtectionConfig, MitigationAction, ProtectionKind, ProtectionRule,
    },
    service::antinuke::store::{AntiNukeSettingsStore, StoreError},
};

/// Number of history entries shown when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Most history entries shown at once.
pub const MAX_HISTORY_LIMIT: usize = 25;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(
        "\"{0}\" is not a valid anti-nuke protection. Available protections: maxBans, maxKicks, maxRoleDeletes, maxChannelDeletes, webhookCreate, botAdd"
    )]
    UnknownProtection(String),

    #[error("Please specify at least one setting to change.")]
    NothingToUpdate,

    #[error("The {} protection does not use {setting}.", display_name(.kind))]
    NotRateBased {
        kind: ProtectionKind,
        setting: &'static str,
    },

    #[error("Threshold must be a positive number, got {0}.")]
    InvalidThreshold(i64),

    #[error("Time window must be a positive number of seconds, got {0}.")]
    InvalidWindow(i64),

    #[error("\"{0}\" is not a valid action.")]
    UnknownAction(String),

    #[error("Please specify a valid action for {}: {}.", display_name(.kind), allowed_list(.kind))]
    InvalidAction {
        kind: ProtectionKind,
        action: MitigationAction,
    },

    #[error("{0} is already on the whitelist.")]
    AlreadyWhitelisted(WhitelistEntry),

    #[error("{0} is not on the whitelist.")]
    NotWhitelisted(WhitelistEntry),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn display_name(kind: &ProtectionKind) -> &'static str {
    kind.display_name()
}

fn allowed_list(kind: &ProtectionKind) -> String {
    kind.allowed_actions()
        .iter()
        .map(|action| action.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A user or role exempt from anti-nuke detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistEntry {
    User(UserId),
    Role(RoleId),
}

impl std::fmt::Display for WhitelistEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "<@{}>", id),
            Self::Role(id) => write!(f, "<@&{}>", id),
        }
    }
}

/// Requested changes to one protection rule. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProtectionUpdate {
    pub enabled: Option<bool>,
    pub threshold: Option<i64>,
    pub window_seconds: Option<i64>,
    pub action: Option<String>,
}

impl ProtectionUpdate {
    fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.threshold.is_none()
            && self.window_seconds.is_none()
            && self.action.is_none()
    }
}

pub struct AntiNukeSettingsService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AntiNukeSettingsService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, guild_id: GuildId) -> Result<GuildProtectionConfig, SettingsError> {
        Ok(AntiNukeSettingsStore::new(self.db).get(guild_id).await?)
    }

    /// Turns the guild-wide switch on or off.
    pub async fn set_enabled(
        &self,
        guild_id: GuildId,
        enabled: bool,
    ) -> Result<GuildProtectionConfig, SettingsError> {
        self.modify(guild_id, |config| {
            config.enabled = enabled;
            Ok(())
        })
        .await
    }

    /// Validates and applies `update` to the rule for the protection named `key`.
    ///
    /// # Returns
    /// - `Ok((ProtectionKind, ProtectionRule))` - The updated rule
    /// - `Err(SettingsError)` - Unknown protection, unsupported setting or invalid value
    pub async fn update_protection(
        &self,
        guild_id: GuildId,
        key: &str,
        update: ProtectionUpdate,
    ) -> Result<(ProtectionKind, ProtectionRule), SettingsError> {
        let kind = ProtectionKind::from_key(key)
            .ok_or_else(|| SettingsError::UnknownProtection(key.to_string()))?;

        if update.is_empty() {
            return Err(SettingsError::NothingToUpdate);
        }

        if !kind.is_rate_based() {
            if update.threshold.is_some() {
                return Err(SettingsError::NotRateBased {
                    kind,
                    setting: "thresholds",
                });
            }
            if update.window_seconds.is_some() {
                return Err(SettingsError::NotRateBased {
                    kind,
                    setting: "time windows",
                });
            }
        }

        let threshold = update
            .threshold
            .map(|t| {
                u32::try_from(t)
                    .ok()
                    .filter(|t| *t >= 1)
                    .ok_or(SettingsError::InvalidThreshold(t))
            })
            .transpose()?;

        let window_ms = update
            .window_seconds
            .map(|s| {
                u64::try_from(s)
                    .ok()
                    .filter(|s| *s >= 1)
                    .map(|s| s.saturating_mul(1000))
                    .ok_or(SettingsError::InvalidWindow(s))
            })
            .transpose()?;

        let action = update
            .action
            .as_deref()
            .map(|value| {
                let action = MitigationAction::parse(value)
                    .ok_or_else(|| SettingsError::UnknownAction(value.to_string()))?;
                if kind.allowed_actions().contains(&action) {
                    Ok(action)
                } else {
                    Err(SettingsError::InvalidAction { kind, action })
                }
            })
            .transpose()?;

        let config = self
            .modify(guild_id, |config| {
                let rule = config.rule_mut(kind);
                if let Some(enabled) = update.enabled {
                    rule.enabled = enabled;
                }
                if threshold.is_some() {
                    rule.threshold = threshold;
                }
                if window_ms.is_some() {
                    rule.window_ms = window_ms;
                }
                if let Some(action) = action {
                    rule.action = action;
                }
                Ok(())
            })
            .await?;

        Ok((kind, config.rule(kind)))
    }

    pub async fn add_to_whitelist(
        &self,
        guild_id: GuildId,
        entry: WhitelistEntry,
    ) -> Result<GuildProtectionConfig, SettingsError> {
        self.modify(guild_id, |config| {
            let inserted = match entry {
                WhitelistEntry::User(id) => config.whitelisted_users.insert(id),
                WhitelistEntry::Role(id) => config.whitelisted_roles.insert(id),
            };
            if inserted {
                Ok(())
            } else {
                Err(SettingsError::AlreadyWhitelisted(entry))
            }
        })
        .await
    }

    pub async fn remove_from_whitelist(
        &self,
        guild_id: GuildId,
        entry: WhitelistEntry,
    ) -> Result<GuildProtectionConfig, SettingsError> {
        self.modify(guild_id, |config| {
            let removed = match entry {
                WhitelistEntry::User(id) => config.whitelisted_users.remove(&id),
                WhitelistEntry::Role(id) => config.whitelisted_roles.remove(&id),
            };
            if removed {
                Ok(())
            } else {
                Err(SettingsError::NotWhitelisted(entry))
            }
        })
        .await
    }

    pub async fn set_log_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<GuildProtectionConfig, SettingsError> {
        self.modify(guild_id, |config| {
            config.log_channel_id = Some(channel_id);
            Ok(())
        })
        .await
    }

    /// Most recent history entries, newest first.
    ///
    /// `limit` defaults to [`DEFAULT_HISTORY_LIMIT`] and is clamped to
    /// `1..=MAX_HISTORY_LIMIT`.
    pub async fn history(
        &self,
        guild_id: GuildId,
        limit: Option<usize>,
    ) -> Result<Vec<ActionRecord>, SettingsError> {
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        let config = self.get(guild_id).await?;

        Ok(config
            .action_history
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    /// Discards the guild's settings and history, restoring the defaults.
    pub async fn reset(&self, guild_id: GuildId) -> Result<GuildProtectionConfig, SettingsError> {
        let store = AntiNukeSettingsStore::new(self.db);
        store.clear(guild_id).await?;

        Ok(store.get(guild_id).await?)
    }

    async fn modify<F>(
        &self,
        guild_id: GuildId,
        change: F,
    ) -> Result<GuildProtectionConfig, SettingsError>
    where
        F: FnOnce(&mut GuildProtectionConfig) -> Result<(), SettingsError>,
    {
        let store = AntiNukeSettingsStore::new(self.db);
        let mut config = store.get(guild_id).await?;

        change(&mut config)?;
        store.set(guild_id, &config).await?;

        Ok(config)
    }
}

/// One status line for a protection, e.g. `Enabled (Threshold: 3 in 10s, Action: ban)`.
pub fn describe_rule(kind: ProtectionKind, rule: &ProtectionRule) -> String {
    if !rule.enabled {
        return "Disabled".to_string();
    }

    match (kind.is_rate_based(), rule.threshold, rule.window_ms) {
        (true, Some(threshold), Some(window_ms)) => format!(
            "Enabled (Threshold: {} in {}s, Action: {})",
            threshold,
            window_ms / 1000,
            rule.action
        ),
        _ => format!("Enabled (Action: {})", rule.action),
    }
}

/// Comma separated mentions, or `None` when empty.
pub fn describe_whitelist(config: &GuildProtectionConfig) -> (String, String) {
    let users = config
        .whitelisted_users
        .iter()
        .map(|id| WhitelistEntry::User(*id).to_string())
        .collect::<Vec<_>>();
    let roles = config
        .whitelisted_roles
        .iter()
        .map(|id| WhitelistEntry::Role(*id).to_string())
        .collect::<Vec<_>>();

    let join = |mentions: Vec<String>| {
        if mentions.is_empty() {
            "None".to_string()
        } else {
            mentions.join(", ")
        }
    };

    (join(users), join(roles))
}
