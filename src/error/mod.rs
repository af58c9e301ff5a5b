//! Error types for the bot.
//!
//! `AppError` is the top-level error type that wraps domain-specific errors. Event
//! handlers never surface these to the guild member who triggered an event; they are
//! logged at the handler boundary instead.

pub mod config;
pub mod internal;

use thiserror::Error;

use crate::{
    error::config::ConfigError,
    service::antinuke::{mitigation::MitigationError, store::StoreError},
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the bot. Most variants use
/// `#[from]` for automatic error conversion with `?`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Settings document could not be loaded or saved.
    #[error(transparent)]
    StoreErr(#[from] StoreError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Mitigation could not be completed.
    #[error(transparent)]
    MitigationErr(#[from] MitigationError),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
