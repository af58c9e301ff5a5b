use serenity::all::{ChannelId, GuildId};

use crate::model::event::GuildEvent;

/// Maps a guild channel deletion to a pipeline event.
pub fn channel_deleted(guild_id: GuildId, channel_id: ChannelId) -> Option<GuildEvent> {
    Some(GuildEvent::ChannelDeleted {
        guild_id,
        channel_id,
    })
}
