use chrono::Utc;

/// In-memory settings row for guild `1` in the `antinuke` namespace with an empty document.
pub fn entity() -> entity::guild_setting::Model {
    entity::guild_setting::Model {
        guild_id: "1".to_string(),
        namespace: "antinuke".to_string(),
        value: "{}".to_string(),
        updated_at: Utc::now(),
    }
}
