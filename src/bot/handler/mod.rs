use sea_orm::DatabaseConnection;
use serenity::all::{
    ChannelId, Context, EventHandler, GuildChannel, GuildId, Interaction, Member, Message, Ready,
    Role, RoleId, User,
};
use serenity::async_trait;
use std::sync::Arc;

use crate::model::event::GuildEvent;
use crate::service::antinuke::AntiNukeService;

pub mod channel;
pub mod interaction;
pub mod member;
pub mod ready;
pub mod role;
pub mod webhook;

/// Discord bot event handler
pub struct Handler {
    pub db: DatabaseConnection,
    pub antinuke: Arc<AntiNukeService>,
    /// Guild to register slash commands in; global registration when `None`.
    pub command_guild: Option<GuildId>,
}

impl Handler {
    pub fn new(
        db: DatabaseConnection,
        antinuke: Arc<AntiNukeService>,
        command_guild: Option<GuildId>,
    ) -> Self {
        Self {
            db,
            antinuke,
            command_guild,
        }
    }

    /// Runs the event through the anti-nuke pipeline on its own task.
    ///
    /// The pipeline waits for the audit log before attributing an event, which would
    /// otherwise hold up the shard's event loop.
    fn protect(&self, event: Option<GuildEvent>) {
        let Some(event) = event else {
            return;
        };

        let antinuke = self.antinuke.clone();
        tokio::spawn(async move {
            antinuke.dispatch(event).await;
        });
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready, self.command_guild).await;
    }

    /// Called when a slash command or other interaction is received
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction_create(&self.db, ctx, interaction).await;
    }

    /// Called when a user is banned from a guild
    async fn guild_ban_addition(&self, _ctx: Context, guild_id: GuildId, banned_user: User) {
        self.protect(member::ban_added(guild_id, &banned_user));
    }

    /// Called when a member joins a guild
    async fn guild_member_addition(&self, _ctx: Context, new_member: Member) {
        self.protect(member::member_added(&new_member));
    }

    /// Called when a member leaves a guild, including kicks
    async fn guild_member_removal(
        &self,
        _ctx: Context,
        guild_id: GuildId,
        user: User,
        _member_data_if_available: Option<Member>,
    ) {
        self.protect(member::member_removed(guild_id, &user));
    }

    /// Called when a role is deleted from a guild
    async fn guild_role_delete(
        &self,
        _ctx: Context,
        guild_id: GuildId,
        removed_role_id: RoleId,
        _removed_role_data_if_in_cache: Option<Role>,
    ) {
        self.protect(role::role_deleted(guild_id, removed_role_id));
    }

    /// Called when a channel is deleted from a guild
    async fn channel_delete(
        &self,
        _ctx: Context,
        channel: GuildChannel,
        _messages: Option<Vec<Message>>,
    ) {
        self.protect(channel::channel_deleted(channel.guild_id, channel.id));
    }

    /// Called when a channel's webhooks are created, updated or deleted
    async fn webhook_update(
        &self,
        _ctx: Context,
        guild_id: GuildId,
        belongs_to_channel_id: ChannelId,
    ) {
        self.protect(webhook::webhooks_updated(guild_id, belongs_to_channel_id));
    }
}
