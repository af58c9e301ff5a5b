use chrono::Utc;
use migration::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, EntityTrait};

/// Per-guild key-value settings, one JSON document per `(guild_id, namespace)`.
pub struct GuildSettingRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GuildSettingRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the settings document for a guild and namespace
    ///
    /// # Arguments
    /// - `guild_id`: Discord guild ID
    /// - `namespace`: Feature namespace the document belongs to (e.g. `"antinuke"`)
    ///
    /// # Returns
    /// - `Ok(Some(Model))`: Document found
    /// - `Ok(None)`: Guild has no document in this namespace yet
    /// - `Err(DbErr)`: Database error during query
    pub async fn find(
        &self,
        guild_id: u64,
        namespace: &str,
    ) -> Result<Option<entity::guild_setting::Model>, DbErr> {
        entity::prelude::GuildSetting::find_by_id((guild_id.to_string(), namespace.to_string()))
            .one(self.db)
            .await
    }

    /// Inserts or fully replaces the settings document for a guild and namespace.
    pub async fn upsert(
        &self,
        guild_id: u64,
        namespace: &str,
        value: String,
    ) -> Result<entity::guild_setting::Model, DbErr> {
        entity::prelude::GuildSetting::insert(entity::guild_setting::ActiveModel {
            guild_id: ActiveValue::Set(guild_id.to_string()),
            namespace: ActiveValue::Set(namespace.to_string()),
            value: ActiveValue::Set(value),
            updated_at: ActiveValue::Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([
                entity::guild_setting::Column::GuildId,
                entity::guild_setting::Column::Namespace,
            ])
            .update_columns([
                entity::guild_setting::Column::Value,
                entity::guild_setting::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_with_returning(self.db)
        .await
    }

    /// Deletes the settings document, returning whether one existed.
    pub async fn delete(&self, guild_id: u64, namespace: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::GuildSetting::delete_by_id((
            guild_id.to_string(),
            namespace.to_string(),
        ))
        .exec(self.db)
        .await?;

        Ok(result.rows_affected > 0)
    }
}
