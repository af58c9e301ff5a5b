//! Guild setting factory for creating settings documents.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test guild settings with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::guild_setting::GuildSettingFactory;
///
/// let setting = GuildSettingFactory::new(&db)
///     .guild_id("987654321")
///     .namespace("antinuke")
///     .value(r#"{"enabled":true}"#)
///     .build()
///     .await?;
/// ```
pub struct GuildSettingFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    namespace: String,
    value: String,
}

impl<'a> GuildSettingFactory<'a> {
    /// Creates a new GuildSettingFactory with default values.
    ///
    /// Defaults:
    /// - guild_id: auto-incremented id
    /// - namespace: `"antinuke"`
    /// - value: `"{}"`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let fixture = crate::fixture::guild_setting::entity();
        Self {
            db,
            guild_id: next_id().to_string(),
            namespace: fixture.namespace,
            value: fixture.value,
        }
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the raw JSON document.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Builds and inserts the settings row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::guild_setting::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::guild_setting::Model, DbErr> {
        entity::guild_setting::ActiveModel {
            guild_id: ActiveValue::Set(self.guild_id),
            namespace: ActiveValue::Set(self.namespace),
            value: ActiveValue::Set(self.value),
            updated_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;

    #[tokio::test]
    async fn creates_setting_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_settings_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let setting = GuildSettingFactory::new(db).build().await?;

        assert!(!setting.guild_id.is_empty());
        assert_eq!(setting.namespace, "antinuke");
        assert_eq!(setting.value, "{}");

        Ok(())
    }

    #[tokio::test]
    async fn default_guild_ids_are_unique() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_settings_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let first = GuildSettingFactory::new(db).build().await?;
        let second = GuildSettingFactory::new(db).build().await?;

        assert_ne!(first.guild_id, second.guild_id);

        Ok(())
    }
}
