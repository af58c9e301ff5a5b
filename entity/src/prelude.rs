pub use super::guild_setting::Entity as GuildSetting;
