//! Test fixtures providing reusable test data without database insertion.
//!
//! Unlike factories, fixtures do NOT insert data into the database. They provide
//! consistent defaults for factory builders and in-memory models for unit tests.

pub mod guild_setting;
