//! Discord gateway integration.
//!
//! The bot receives guild events from the gateway, converts the destructive ones into
//! [`GuildEvent`](crate::model::event::GuildEvent)s and hands them to the anti-nuke
//! pipeline. It also registers and answers the `/antinuke` slash command.
//!
//! The bot is initialized last during startup and runs until the gateway connection
//! closes. Each protected event is processed on its own task.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Role and channel deletions
//! - `GUILD_MEMBERS` - Member joins and removals (privileged intent)
//! - `GUILD_MODERATION` - Ban additions
//! - `GUILD_WEBHOOKS` - Webhook updates
//!
//! Note: `GUILD_MEMBERS` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application. The bot also needs the
//! View Audit Log permission in every protected guild, otherwise no event can be
//! attributed.

pub mod command;
pub mod handler;
pub mod start;
