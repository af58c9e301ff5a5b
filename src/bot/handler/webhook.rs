use serenity::all::{ChannelId, GuildId};

use crate::model::event::GuildEvent;

/// Maps a webhook update to a possible webhook creation.
///
/// The gateway reports any webhook change in the channel. The pipeline acts only on
/// a fresh webhook-create audit entry it has not handled yet, so edits and deletions
/// are declined as stale or already handled.
pub fn webhooks_updated(guild_id: GuildId, channel_id: ChannelId) -> Option<GuildEvent> {
    Some(GuildEvent::WebhookCreated {
        guild_id,
        channel_id,
    })
}
