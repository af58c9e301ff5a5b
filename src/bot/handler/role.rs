use serenity::all::{GuildId, RoleId};

use crate::model::event::GuildEvent;

/// Maps a role deletion to a pipeline event.
pub fn role_deleted(guild_id: GuildId, removed_role_id: RoleId) -> Option<GuildEvent> {
    Some(GuildEvent::RoleDeleted {
        guild_id,
        role_id: removed_role_id,
    })
}
