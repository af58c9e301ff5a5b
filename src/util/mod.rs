//! Small shared helpers with no domain knowledge.

pub mod clock;
pub mod snowflake;
