use sea_orm::DatabaseConnection;
use serenity::all::{Client, GatewayIntents, GuildId};
use serenity::http::Http;
use std::sync::Arc;

use crate::bot::handler::Handler;
use crate::config::Config;
use crate::error::AppError;
use crate::platform::discord::SerenityPlatform;
use crate::service::antinuke::{tracker::ActionTracker, AntiNukeService};
use crate::util::clock::SystemClock;

/// Builds the Discord client and the anti-nuke service it feeds.
///
/// Looks up the bot's own account first so the pipeline can ignore the bot's own
/// moderation actions.
///
/// # Arguments
/// - `config` - Application configuration
/// - `db` - Database connection for the settings store
/// - `tracker` - Action tracker shared with the sweep scheduler
///
/// # Returns
/// - `Ok(Client)` - Client ready to start
/// - `Err(AppError::DiscordErr)` - Token rejected or client construction failed
pub async fn init_bot(
    config: &Config,
    db: DatabaseConnection,
    tracker: ActionTracker,
) -> Result<Client, AppError> {
    // GUILD_MEMBERS is a privileged intent - must be enabled in Discord Developer Portal
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MODERATION
        | GatewayIntents::GUILD_WEBHOOKS;

    let http = Arc::new(Http::new(&config.discord_bot_token));
    let bot_user = http.get_current_user().await?;
    tracing::info!("Authenticated as {} ({})", bot_user.name, bot_user.id);

    let antinuke = AntiNukeService::new(
        db.clone(),
        tracker,
        Arc::new(SerenityPlatform::new(http)),
        Arc::new(SystemClock),
        bot_user.id,
    );

    let handler = Handler::new(
        db,
        Arc::new(antinuke),
        config.discord_guild_id.map(GuildId::new),
    );

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    Ok(client)
}

/// Starts the Discord bot in a blocking manner
///
/// Should be called from within a tokio::spawn task since it will block until the
/// bot shuts down.
///
/// # Returns
/// - `Ok(())` if the bot runs and shuts down cleanly
/// - `Err(AppError)` if the gateway connection fails
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
