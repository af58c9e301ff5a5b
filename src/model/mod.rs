//! Domain models used throughout the service layer.
//!
//! Settings documents are converted to these types at the store boundary; the
//! platform layer converts Discord payloads into [`event::GuildEvent`] and
//! [`event::AuditEntry`] before they reach the anti-nuke pipeline.

pub mod antinuke;
pub mod event;
