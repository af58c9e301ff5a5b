//! Member ban, join and removal events.
//!
//! Discord sends no dedicated kick event; a kick arrives as a member removal and the
//! pipeline confirms it against the audit log.

use serenity::all::{GuildId, Member, User};

use crate::model::event::GuildEvent;

/// Maps a ban addition to a pipeline event.
pub fn ban_added(guild_id: GuildId, banned_user: &User) -> Option<GuildEvent> {
    Some(GuildEvent::BanAdded {
        guild_id,
        user_id: banned_user.id,
    })
}

/// Maps a member join to a pipeline event. Only bot accounts are protected against.
pub fn member_added(new_member: &Member) -> Option<GuildEvent> {
    if !new_member.user.bot {
        return None;
    }

    Some(GuildEvent::BotAdded {
        guild_id: new_member.guild_id,
        user_id: new_member.user.id,
    })
}

/// Maps a member removal to a possible kick.
pub fn member_removed(guild_id: GuildId, user: &User) -> Option<GuildEvent> {
    Some(GuildEvent::MemberRemoved {
        guild_id,
        user_id: user.id,
    })
}
