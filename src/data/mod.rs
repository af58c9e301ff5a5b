//! Database repository layer.
//!
//! Repositories use SeaORM entity models internally and perform all database
//! queries, inserts, updates and deletes for the service layer.

pub mod guild_setting;

pub use guild_setting::GuildSettingRepository;

#[cfg(test)]
mod test;
