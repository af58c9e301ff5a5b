use serenity::all::{ChannelId, GuildId, RoleId, UserId};
use test_utils::builder::TestBuilder;

use crate::{
    bot::command::{
        antinuke::{definition, execute, AntiNukeCommand},
        ReplyStyle,
    },
    error::AppError,
    model::antinuke::{ActionRecord, ProtectionKind},
    service::antinuke::{
        settings::{ProtectionUpdate, WhitelistEntry},
        store::AntiNukeSettingsStore,
    },
};


const GUILD_ID: u64 = 900_000_000_000_000_001;

fn guild_id() -> GuildId {
    GuildId::new(GUILD_ID)
}
