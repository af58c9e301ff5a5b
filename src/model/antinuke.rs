use serde::{Deserialize, Serialize};
use serenity::all::{ChannelId, RoleId, UserId};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use crate::model::event::AuditCategory;

/// Maximum number of action records kept per guild. Oldest entries are evicted first.
pub const ACTION_HISTORY_CAP: usize = 100;

/// Kind of destructive behaviour the anti-nuke system guards against.
///
/// The four `Max*` kinds are rate based: they only trigger once an actor performs the
/// action `threshold` times inside `window_ms`. `WebhookCreate` and `BotAdd` trigger on
/// every attributed occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProtectionKind {
    MaxBans,
    MaxKicks,
    MaxRoleDeletes,
    MaxChannelDeletes,
    WebhookCreate,
    BotAdd,
}

impl ProtectionKind {
    pub const ALL: [ProtectionKind; 6] = [
        ProtectionKind::MaxBans,
        ProtectionKind::MaxKicks,
        ProtectionKind::MaxRoleDeletes,
        ProtectionKind::MaxChannelDeletes,
        ProtectionKind::WebhookCreate,
        ProtectionKind::BotAdd,
    ];

    pub fn is_rate_based(self) -> bool {
        matches!(
            self,
            Self::MaxBans | Self::MaxKicks | Self::MaxRoleDeletes | Self::MaxChannelDeletes
        )
    }

    /// Settings key used in stored documents and command arguments.
    pub fn key(self) -> &'static str {
        match self {
            Self::MaxBans => "maxBans",
            Self::MaxKicks => "maxKicks",
            Self::MaxRoleDeletes => "maxRoleDeletes",
            Self::MaxChannelDeletes => "maxChannelDeletes",
            Self::WebhookCreate => "webhookCreate",
            Self::BotAdd => "botAdd",
        }
    }

    /// Parses a settings key, ignoring ASCII case.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(key))
    }

    /// Human readable name used in log notifications and command replies.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::MaxBans => "Mass Ban Detection",
            Self::MaxKicks => "Mass Kick Detection",
            Self::MaxRoleDeletes => "Mass Role Deletion",
            Self::MaxChannelDeletes => "Mass Channel Deletion",
            Self::WebhookCreate => "Webhook Creation",
            Self::BotAdd => "Bot Addition",
        }
    }

    /// Mitigations that may be configured for this kind.
    pub fn allowed_actions(self) -> &'static [MitigationAction] {
        match self {
            Self::MaxBans | Self::MaxKicks | Self::MaxRoleDeletes | Self::MaxChannelDeletes => &[
                MitigationAction::Ban,
                MitigationAction::Kick,
                MitigationAction::Derank,
            ],
            Self::WebhookCreate => &[MitigationAction::Delete],
            Self::BotAdd => &[MitigationAction::Kick, MitigationAction::Ban],
        }
    }

    /// Audit log category consulted to attribute this kind of event.
    pub fn audit_category(self) -> AuditCategory {
        match self {
            Self::MaxBans => AuditCategory::MemberBanAdd,
            Self::MaxKicks => AuditCategory::MemberKick,
            Self::MaxRoleDeletes => AuditCategory::RoleDelete,
            Self::MaxChannelDeletes => AuditCategory::ChannelDelete,
            Self::WebhookCreate => AuditCategory::WebhookCreate,
            Self::BotAdd => AuditCategory::BotAdd,
        }
    }

    /// Rule applied when a guild has not customised this protection.
    pub fn default_rule(self) -> ProtectionRule {
        match self {
            Self::MaxBans | Self::MaxKicks => ProtectionRule::rate(3, 10_000, MitigationAction::Ban),
            Self::MaxRoleDeletes | Self::MaxChannelDeletes => {
                ProtectionRule::rate(2, 10_000, MitigationAction::Ban)
            }
            Self::WebhookCreate => ProtectionRule::instant(MitigationAction::Delete),
            Self::BotAdd => ProtectionRule::instant(MitigationAction::Kick),
        }
    }
}

impl fmt::Display for ProtectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Punitive action applied once a protection triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MitigationAction {
    Ban,
    Kick,
    /// Removes every role from the member.
    Derank,
    /// Deletes the created webhook.
    Delete,
}

impl MitigationAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ban => "ban",
            Self::Kick => "kick",
            Self::Derank => "derank",
            Self::Delete => "delete",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "ban" => Some(Self::Ban),
            "kick" => Some(Self::Kick),
            "derank" => Some(Self::Derank),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for MitigationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-kind protection configuration.
///
/// `threshold` and `window_ms` are only meaningful for rate-based kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionRule {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_ms: Option<u64>,
    pub action: MitigationAction,
}

impl ProtectionRule {
    pub fn rate(threshold: u32, window_ms: u64, action: MitigationAction) -> Self {
        Self {
            enabled: true,
            threshold: Some(threshold),
            window_ms: Some(window_ms),
            action,
        }
    }

    pub fn instant(action: MitigationAction) -> Self {
        Self {
            enabled: true,
            threshold: None,
            window_ms: None,
            action,
        }
    }
}

/// Entry in a guild's anti-nuke action history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    pub user_id: UserId,
    pub display_name: String,
    pub protection_kind: ProtectionKind,
    pub mitigation_description: String,
    pub trigger_count: u32,
    pub timestamp_ms: i64,
}

/// Anti-nuke configuration and history for one guild.
///
/// Stored as a single JSON document in the settings store. Missing fields fall back
/// to defaults so documents written by older versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuildProtectionConfig {
    pub enabled: bool,
    pub log_channel_id: Option<ChannelId>,
    pub whitelisted_users: BTreeSet<UserId>,
    pub whitelisted_roles: BTreeSet<RoleId>,
    pub protections: BTreeMap<ProtectionKind, ProtectionRule>,
    pub action_history: VecDeque<ActionRecord>,
}

impl Default for GuildProtectionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_channel_id: None,
            whitelisted_users: BTreeSet::new(),
            whitelisted_roles: BTreeSet::new(),
            protections: ProtectionKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.default_rule()))
                .collect(),
            action_history: VecDeque::new(),
        }
    }
}

impl GuildProtectionConfig {
    /// Returns the rule for `kind`, falling back to its default when absent.
    pub fn rule(&self, kind: ProtectionKind) -> ProtectionRule {
        self.protections
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_rule())
    }

    pub fn rule_mut(&mut self, kind: ProtectionKind) -> &mut ProtectionRule {
        self.protections
            .entry(kind)
            .or_insert_with(|| kind.default_rule())
    }

    /// Whether the guild switch and the rule for `kind` are both on.
    pub fn is_protecting(&self, kind: ProtectionKind) -> bool {
        self.enabled && self.rule(kind).enabled
    }

    /// Appends a record, evicting the oldest entries beyond [`ACTION_HISTORY_CAP`].
    pub fn push_history(&mut self, record: ActionRecord) {
        self.action_history.push_back(record);
        while self.action_history.len() > ACTION_HISTORY_CAP {
            self.action_history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: i64) -> ActionRecord {
        ActionRecord {
            user_id: UserId::new(42),
            display_name: "nuker".to_string(),
            protection_kind: ProtectionKind::MaxBans,
            mitigation_description: "User was banned".to_string(),
            trigger_count: 3,
            timestamp_ms: n,
        }
    }

    #[test]
    fn default_config_matches_stock_rules() {
        let config = GuildProtectionConfig::default();

        assert!(!config.enabled);
        assert_eq!(config.protections.len(), 6);
        assert_eq!(
            config.rule(ProtectionKind::MaxRoleDeletes),
            ProtectionRule::rate(2, 10_000, MitigationAction::Ban)
        );
        assert_eq!(
            config.rule(ProtectionKind::BotAdd).action,
            MitigationAction::Kick
        );
        assert_eq!(config.rule(ProtectionKind::WebhookCreate).threshold, None);
    }

    /// Appending the 101st record keeps exactly 100, dropping the first inserted.
    #[test]
    fn history_evicts_oldest_first() {
        let mut config = GuildProtectionConfig::default();
        for n in 1..=101 {
            config.push_history(record(n));
        }

        assert_eq!(config.action_history.len(), ACTION_HISTORY_CAP);
        let oldest = config
            .action_history
            .iter()
            .map(|r| r.timestamp_ms)
            .min()
            .unwrap();
        assert_eq!(oldest, 2);
        assert_eq!(config.action_history.back().unwrap().timestamp_ms, 101);
    }

    #[test]
    fn parses_keys_case_insensitively() {
        assert_eq!(
            ProtectionKind::from_key("maxchanneldeletes"),
            Some(ProtectionKind::MaxChannelDeletes)
        );
        assert_eq!(ProtectionKind::from_key("BOTADD"), Some(ProtectionKind::BotAdd));
        assert_eq!(ProtectionKind::from_key("maxPings"), None);
    }

    #[test]
    fn document_round_trips_through_json() {
        let mut config = GuildProtectionConfig::default();
        config.enabled = true;
        config.log_channel_id = Some(ChannelId::new(555));
        config.whitelisted_users.insert(UserId::new(7));
        config.whitelisted_roles.insert(RoleId::new(8));
        config.push_history(record(1));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["protections"]["maxBans"]["windowMs"], 10_000);
        assert_eq!(json["protections"]["webhookCreate"]["action"], "delete");

        let decoded: GuildProtectionConfig = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn partial_document_falls_back_to_defaults() {
        let decoded: GuildProtectionConfig = serde_json::from_value(serde_json::json!({
            "enabled": true,
            "protections": {
                "maxKicks": { "enabled": true, "threshold": 5, "windowMs": 20000, "action": "kick" }
            }
        }))
        .unwrap();

        assert!(decoded.enabled);
        assert_eq!(decoded.rule(ProtectionKind::MaxKicks).threshold, Some(5));
        assert_eq!(
            decoded.rule(ProtectionKind::MaxBans),
            ProtectionKind::MaxBans.default_rule()
        );
    }
}
