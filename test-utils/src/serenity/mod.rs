//! Test factories for creating Serenity API objects.
//!
//! These factories create valid Serenity structs by deserializing JSON, simulating
//! what Discord's gateway would deliver. Use them to test code that converts
//! gateway payloads into domain events.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::{create_test_member, create_test_user};
//!
//! let user = create_test_user(123456789, "nuker", false);
//! let bot = create_test_member(1, 987654321, "raid-bot", true, &[]);
//! ```
//!
//! # Available Factories
//!
//! - `user::create_test_user` - Create Serenity User objects
//! - `member::create_test_member` - Create Serenity Member objects

pub mod member;
pub mod user;

// Re-export commonly used functions for convenience
pub use member::create_test_member;
pub use user::create_test_user;
