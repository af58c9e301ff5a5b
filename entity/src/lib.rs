//! SeaORM entity models for the warden database.

pub mod prelude;

pub mod guild_setting;
