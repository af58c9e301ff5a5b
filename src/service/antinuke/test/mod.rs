use sea_orm::DatabaseConnection;
use serenity::all::{ChannelId, GuildId, RoleId, UserId, WebhookId};
use std::sync::Arc;
use std::time::Duration;
use test_utils::builder::TestBuilder;

use crate::{
    error::AppError,
    model::{
        antinuke::{
            ActionRecord, GuildProtectionConfig, MitigationAction, ProtectionKind, ProtectionRule,
            ACTION_HISTORY_CAP,
        },
        event::{AuditCategory, AuditEntry, GuildEvent},
    },
    platform::mock::{MockOperation, MockPlatform, PlatformCall},
    service::antinuke::{
        attribution::{
            evaluate_entry, Attribution, AttributionResolver, DeclineReason, HandledEntries,
            AUDIT_GRACE_DELAY, HANDLED_ENTRY_CAP,
        },
        exemption::{is_exempt, Exemption},
        mitigation::{
            MitigationEngine, MitigationError, MitigationOutcome, MitigationRequest,
        },
        settings::{
            describe_rule, describe_whitelist, AntiNukeSettingsService, ProtectionUpdate,
            SettingsError, WhitelistEntry,
        },
        store::{AntiNukeSettingsStore, StoreError, ANTINUKE_NAMESPACE},
        tracker::{ActionTracker, SWEEP_RETENTION_MS},
        AntiNukeService, PipelineOutcome,
    },
    util::{clock::ManualClock, snowflake::unix_ms_to_snowflake},
};

mod exemption;
mod tracker;

const GUILD_ID: u64 = 900_000_000_000_000_001;
const OWNER_ID: u64 = 1;
const BOT_ID: u64 = 2;
const NUKER_ID: u64 = 42;
const LOG_CHANNEL_ID: u64 = 555;
const START_MS: i64 = 1_700_000_000_000;

fn guild_id() -> GuildId {
    GuildId::new(GUILD_ID)
}

fn nuker() -> UserId {
    UserId::new(NUKER_ID)
}

fn audit_entry(executor: u64, target: Option<u64>, created_at_ms: i64) -> AuditEntry {
    AuditEntry {
        id: unix_ms_to_snowflake(created_at_ms),
        executor_id: UserId::new(executor),
        target_id: target,
        created_at_ms,
    }
}

/// Guild with anti-nuke switched on and the stock rules.
fn enabled_config() -> GuildProtectionConfig {
    GuildProtectionConfig {
        enabled: true,
        ..GuildProtectionConfig::default()
    }
}

/// Mock guild owned by `OWNER_ID` with the nuker as a resolvable member.
fn guild_platform() -> Arc<MockPlatform> {
    Arc::new(
        MockPlatform::new()
            .with_owner(OWNER_ID)
            .with_member(NUKER_ID, "nuker", &[]),
    )
}

async fn save_config(
    db: &DatabaseConnection,
    config: &GuildProtectionConfig,
) -> Result<(), StoreError> {
    AntiNukeSettingsStore::new(db).set(guild_id(), config).await
}

fn new_service(
    db: &DatabaseConnection,
    platform: &Arc<MockPlatform>,
    clock: &ManualClock,
) -> AntiNukeService {
    AntiNukeService::new(
        db.clone(),
        ActionTracker::new(),
        platform.clone(),
        Arc::new(clock.clone()),
        UserId::new(BOT_ID),
    )
    .with_grace_delay(Duration::ZERO)
}
