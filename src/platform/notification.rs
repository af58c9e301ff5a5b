use serenity::all::{CreateEmbed, CreateEmbedFooter, Timestamp, UserId};

use crate::{error::internal::InternalError, model::antinuke::ProtectionKind};

/// Embed color used for anti-nuke log entries (red).
const NOTIFICATION_COLOR: u32 = 0xFF0000;

/// Log channel notification describing a mitigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogNotification {
    pub actor_id: UserId,
    pub protection_kind: ProtectionKind,
    pub outcome_description: String,
    pub timestamp_ms: i64,
}

impl LogNotification {
    /// Builds the Discord embed for this notification.
    ///
    /// # Returns
    /// - `Ok(CreateEmbed)` - Embed ready for posting
    /// - `Err(InternalError::InvalidDiscordTimestamp)` - Timestamp out of Discord's range
    pub fn to_embed(&self) -> Result<CreateEmbed, InternalError> {
        let seconds = self.timestamp_ms.div_euclid(1000);
        let timestamp = Timestamp::from_unix_timestamp(seconds).map_err(|e| {
            InternalError::InvalidDiscordTimestamp {
                timestamp: seconds,
                reason: e.to_string(),
            }
        })?;

        let trigger = self.protection_kind.display_name();

        Ok(CreateEmbed::new()
            .title("🛡️ Anti-Nuke Protection Triggered")
            .description(format!(
                "Anti-nuke protection was triggered for **{}**.",
                trigger
            ))
            .color(NOTIFICATION_COLOR)
            .field(
                "User",
                format!("<@{}> ({})", self.actor_id, self.actor_id),
                true,
            )
            .field("Trigger", trigger, true)
            .field("Action Taken", &self.outcome_description, false)
            .field("Timestamp", format!("<t:{}:F>", seconds), false)
            .footer(CreateEmbedFooter::new("Anti-Nuke Protection System"))
            .timestamp(timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fields() {
        let notification = LogNotification {
            actor_id: UserId::new(42),
            protection_kind: ProtectionKind::MaxKicks,
            outcome_description: "User was banned".to_string(),
            timestamp_ms: 1_700_000_000_999,
        };

        let embed = serde_json::to_value(notification.to_embed().unwrap()).unwrap();

        assert_eq!(embed["color"], 0xFF0000);
        assert_eq!(
            embed["description"],
            "Anti-nuke protection was triggered for **Mass Kick Detection**."
        );
        let fields = embed["fields"].as_array().unwrap();
        assert_eq!(fields[0]["value"], "<@42> (42)");
        assert_eq!(fields[1]["value"], "Mass Kick Detection");
        assert_eq!(fields[2]["value"], "User was banned");
        assert_eq!(fields[3]["value"], "<t:1700000000:F>");
    }
}
