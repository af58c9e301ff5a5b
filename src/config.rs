use crate::error::{config::ConfigError, AppError};

pub struct Config {
    pub database_url: String,

    pub discord_bot_token: String,

    /// Registers slash commands in this guild only instead of globally.
    pub discord_guild_id: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let discord_guild_id = match std::env::var("DISCORD_GUILD_ID") {
            Ok(value) => Some(value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvVar {
                name: "DISCORD_GUILD_ID".to_string(),
                value,
            })?),
            Err(_) => None,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            discord_bot_token: std::env::var("DISCORD_BOT_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
            discord_guild_id,
        })
    }
}
