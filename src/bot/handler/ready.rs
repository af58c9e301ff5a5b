//! Ready event handler for bot initialization.
//!
//! Fires once per gateway connection. Slash commands are registered here so a
//! changed command definition is picked up on the next restart.

use serenity::all::{Command, Context, GuildId, Ready};

use crate::bot::command;

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `ctx` - Discord context used to register commands
/// - `ready` - Ready event data containing bot user information
/// - `command_guild` - Guild to register commands in, or `None` for global commands
pub async fn handle_ready(ctx: Context, ready: Ready, command_guild: Option<GuildId>) {
    tracing::info!(
        "{} is connected to Discord and present in {} guilds",
        ready.user.name,
        ready.guilds.len()
    );

    let commands = command::definitions();
    let result = match command_guild {
        Some(guild_id) => guild_id.set_commands(&ctx.http, commands).await,
        None => Command::set_global_commands(&ctx.http, commands).await,
    };

    match result {
        Ok(registered) => tracing::info!("Registered {} slash commands", registered.len()),
        Err(e) => tracing::error!("Failed to register slash commands: {}", e),
    }
}
