//! Background jobs run on a cron schedule.

pub mod tracker_sweep;
