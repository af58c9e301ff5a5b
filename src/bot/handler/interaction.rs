use sea_orm::DatabaseConnection;
use serenity::all::{Context, Interaction};

use crate::bot::command;

/// Handles an interaction, routing slash commands to their implementation.
pub async fn handle_interaction_create(
    db: &DatabaseConnection,
    ctx: Context,
    interaction: Interaction,
) {
    let Interaction::Command(cmd) = interaction else {
        return;
    };

    if let Err(e) = command::run(db, &ctx, &cmd).await {
        tracing::error!("Failed to run /{} command: {}", cmd.data.name, e);
    }
}
