mod bot;
mod config;
mod data;
mod error;
mod model;
mod platform;
mod scheduler;
mod service;
mod startup;
mod util;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config, error::AppError, scheduler::tracker_sweep,
    service::antinuke::tracker::ActionTracker, util::clock::SystemClock,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warden=info,serenity=warn")),
        )
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;

    tracing::info!("Starting warden");

    // Shared between the anti-nuke pipeline and the sweep job
    let tracker = ActionTracker::new();

    tracker_sweep::start_scheduler(tracker.clone(), Arc::new(SystemClock)).await?;

    let bot_client = bot::start::init_bot(&config, db, tracker).await?;

    // Runs until the gateway connection closes
    bot::start::start_bot(bot_client).await
}
