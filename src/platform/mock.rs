//! In-memory [`GuildPlatform`] used by tests.
//!
//! Holds a scripted guild (owner, users, members, audit log) and records every
//! call so tests can assert on what the pipeline did.

use serenity::all::{ChannelId, GuildId, RoleId, UserId, WebhookId};
use serenity::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::{
    model::event::{AuditCategory, AuditEntry},
    platform::{
        notification::LogNotification, GuildPlatform, PlatformError, PlatformMember, PlatformUser,
    },
};

/// Operations that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    FetchAudit,
    FetchOwner,
    ResolveUser,
    ResolveMember,
    Ban,
    Kick,
    ClearRoles,
    DeleteWebhook,
    Notify,
}

/// A mutation or notification performed against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Ban { user_id: UserId, reason: String },
    Kick { user_id: UserId, reason: String },
    ClearRoles { user_id: UserId, reason: String },
    DeleteWebhook { webhook_id: WebhookId },
    Notify {
        channel_id: ChannelId,
        notification: LogNotification,
    },
}

#[derive(Default)]
struct MockState {
    owner: Option<UserId>,
    audit: HashMap<AuditCategory, Vec<AuditEntry>>,
    users: HashMap<UserId, PlatformUser>,
    members: HashMap<UserId, PlatformMember>,
    failing: HashSet<MockOperation>,
    calls: Vec<PlatformCall>,
    audit_fetches: usize,
}

#[derive(Default)]
pub struct MockPlatform {
    state: Mutex<MockState>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner(self, owner: u64) -> Self {
        self.state.lock().unwrap().owner = Some(UserId::new(owner));
        self
    }

    /// Adds a resolvable user who is also a guild member holding `roles`.
    pub fn with_member(self, user_id: u64, tag: &str, roles: &[u64]) -> Self {
        self.add_member(user_id, tag, roles);
        self
    }

    /// Adds a resolvable user who is not in the guild.
    pub fn with_user(self, user_id: u64, tag: &str) -> Self {
        let id = UserId::new(user_id);
        self.state.lock().unwrap().users.insert(
            id,
            PlatformUser {
                id,
                tag: tag.to_string(),
            },
        );
        self
    }

    pub fn failing(self, operation: MockOperation) -> Self {
        self.state.lock().unwrap().failing.insert(operation);
        self
    }

    fn add_member(&self, user_id: u64, tag: &str, roles: &[u64]) {
        let id = UserId::new(user_id);
        let mut state = self.state.lock().unwrap();
        state.users.insert(
            id,
            PlatformUser {
                id,
                tag: tag.to_string(),
            },
        );
        state.members.insert(
            id,
            PlatformMember {
                user_id: id,
                role_ids: roles.iter().copied().map(RoleId::new).collect(),
            },
        );
    }


    /// Appends an audit entry; the latest pushed entry is returned first.
    pub fn push_audit(&self, category: AuditCategory, entry: AuditEntry) {
        self.state
            .lock()
            .unwrap()
            .audit
            .entry(category)
            .or_default()
            .insert(0, entry);
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn audit_fetches(&self) -> usize {
        self.state.lock().unwrap().audit_fetches
    }

    pub fn bans(&self) -> Vec<UserId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Ban { user_id, .. } => Some(user_id),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<LogNotification> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Notify { notification, .. } => Some(notification),
                _ => None,
            })
            .collect()
    }

    fn check(&self, operation: MockOperation) -> Result<(), PlatformError> {
        if self.state.lock().unwrap().failing.contains(&operation) {
            return Err(PlatformError::MissingPermissions(format!("{:?}", operation)));
        }
        Ok(())
    }

    fn record(&self, call: PlatformCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl GuildPlatform for MockPlatform {
    async fn fetch_recent_audit_entries(
        &self,
        _guild_id: GuildId,
        category: AuditCategory,
        limit: u8,
    ) -> Result<Vec<AuditEntry>, PlatformError> {
        self.check(MockOperation::FetchAudit)?;

        let mut state = self.state.lock().unwrap();
        state.audit_fetches += 1;
        Ok(state
            .audit
            .get(&category)
            .map(|entries| entries.iter().take(limit as usize).copied().collect())
            .unwrap_or_default())
    }

    async fn fetch_guild_owner(&self, guild_id: GuildId) -> Result<UserId, PlatformError> {
        self.check(MockOperation::FetchOwner)?;

        self.state
            .lock()
            .unwrap()
            .owner
            .ok_or_else(|| PlatformError::NotFound(format!("guild {}", guild_id)))
    }

    async fn resolve_user(&self, user_id: UserId) -> Result<Option<PlatformUser>, PlatformError> {
        self.check(MockOperation::ResolveUser)?;

        Ok(self.state.lock().unwrap().users.get(&user_id).cloned())
    }

    async fn resolve_member(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<PlatformMember>, PlatformError> {
        self.check(MockOperation::ResolveMember)?;

        Ok(self.state.lock().unwrap().members.get(&user_id).cloned())
    }

    async fn ban_member(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.check(MockOperation::Ban)?;

        self.record(PlatformCall::Ban {
            user_id,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn kick_member(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.check(MockOperation::Kick)?;

        self.record(PlatformCall::Kick {
            user_id,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn clear_member_roles(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.check(MockOperation::ClearRoles)?;

        self.record(PlatformCall::ClearRoles {
            user_id,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn delete_webhook(
        &self,
        webhook_id: WebhookId,
        _reason: &str,
    ) -> Result<(), PlatformError> {
        self.check(MockOperation::DeleteWebhook)?;

        self.record(PlatformCall::DeleteWebhook { webhook_id });
        Ok(())
    }

    async fn send_notification(
        &self,
        channel_id: ChannelId,
        notification: &LogNotification,
    ) -> Result<(), PlatformError> {
        self.check(MockOperation::Notify)?;

        self.record(PlatformCall::Notify {
            channel_id,
            notification: notification.clone(),
        });
        Ok(())
    }
}
