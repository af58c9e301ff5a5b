//! Test factories that insert entity rows into the test database.
//!
//! Each factory exposes a builder with sensible defaults; override only the fields
//! a test cares about, then call `build()`.

pub mod guild_setting;
pub mod helpers;
