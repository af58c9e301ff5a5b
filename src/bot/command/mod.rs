//! Slash commands.
//!
//! Each command module exposes a `definition()` used for registration and a `run()`
//! answering the interaction. Command logic that does not need the interaction itself
//! returns a [`Reply`] so it can be tested without Discord.

pub mod antinuke;

#[cfg(test)]
mod test;

use sea_orm::DatabaseConnection;
use serenity::all::{
    CommandInteraction, Context, CreateCommand, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage,
};

use crate::error::AppError;

const SUCCESS_COLOR: u32 = 0x57F287;
const INFO_COLOR: u32 = 0x5865F2;
const ERROR_COLOR: u32 = 0xED4245;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStyle {
    Success,
    Info,
    Error,
}

/// An embed answer to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub style: ReplyStyle,
    pub title: String,
    pub description: String,
    /// `(name, value, inline)`
    pub fields: Vec<(String, String, bool)>,
}

impl Reply {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ReplyStyle::Success, title, description)
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ReplyStyle::Info, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(ReplyStyle::Error, title, description)
    }

    fn new(style: ReplyStyle, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            style,
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push((name.into(), value.into(), inline));
        self
    }

    /// Looks up a field's value by name.
    #[cfg(test)]
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _, _)| field == name)
            .map(|(_, value, _)| value.as_str())
    }

    pub fn to_embed(&self) -> CreateEmbed {
        let color = match self.style {
            ReplyStyle::Success => SUCCESS_COLOR,
            ReplyStyle::Info => INFO_COLOR,
            ReplyStyle::Error => ERROR_COLOR,
        };

        CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .color(color)
            .fields(self.fields.clone())
    }

    /// Sends the reply as the interaction's response. Errors are only shown to the
    /// invoking user.
    pub async fn send(&self, ctx: &Context, cmd: &CommandInteraction) -> Result<(), AppError> {
        cmd.create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(self.to_embed())
                    .ephemeral(self.style == ReplyStyle::Error),
            ),
        )
        .await?;

        Ok(())
    }
}

/// Every command the bot registers.
pub fn definitions() -> Vec<CreateCommand> {
    vec![antinuke::definition()]
}

/// Routes a slash command to its implementation.
pub async fn run(
    db: &DatabaseConnection,
    ctx: &Context,
    cmd: &CommandInteraction,
) -> Result<(), AppError> {
    match cmd.data.name.as_str() {
        antinuke::NAME => antinuke::run(db, ctx, cmd).await,
        other => {
            tracing::warn!("Received unknown slash command /{}", other);
            Ok(())
        }
    }
}
