use sea_orm::{DatabaseConnection, DbErr};
use serenity::all::GuildId;
use thiserror::Error;

use crate::{data::GuildSettingRepository, model::antinuke::GuildProtectionConfig};

/// Settings namespace holding the anti-nuke document.
pub const ANTINUKE_NAMESPACE: &str = "antinuke";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbErr),

    /// The stored document is not valid anti-nuke settings JSON.
    #[error("Invalid anti-nuke settings document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Loads and saves a guild's [`GuildProtectionConfig`].
///
/// Writes replace the whole document; concurrent read-modify-write cycles are
/// last-writer-wins.
pub struct AntiNukeSettingsStore<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AntiNukeSettingsStore<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the guild's config, creating and persisting the default when absent.
    pub async fn get(&self, guild_id: GuildId) -> Result<GuildProtectionConfig, StoreError> {
        let repo = GuildSettingRepository::new(self.db);

        if let Some(row) = repo.find(guild_id.get(), ANTINUKE_NAMESPACE).await? {
            return Ok(serde_json::from_str(&row.value)?);
        }

        let config = GuildProtectionConfig::default();
        self.set(guild_id, &config).await?;

        Ok(config)
    }

    pub async fn set(
        &self,
        guild_id: GuildId,
        config: &GuildProtectionConfig,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_string(config)?;

        GuildSettingRepository::new(self.db)
            .upsert(guild_id.get(), ANTINUKE_NAMESPACE, value)
            .await?;

        Ok(())
    }

    /// Removes the guild's document. The next `get` recreates the defaults.
    pub async fn clear(&self, guild_id: GuildId) -> Result<bool, StoreError> {
        Ok(GuildSettingRepository::new(self.db)
            .delete(guild_id.get(), ANTINUKE_NAMESPACE)
            .await?)
    }
}
