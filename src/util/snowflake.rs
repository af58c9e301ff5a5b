/// Discord epoch (2015-01-01T00:00:00Z) in Unix milliseconds.
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Returns the creation time encoded in a Discord snowflake, in Unix milliseconds.
pub fn snowflake_to_unix_ms(id: u64) -> i64 {
    (id >> 22) as i64 + DISCORD_EPOCH_MS
}

/// Builds the smallest snowflake created at the given Unix millisecond.
///
/// Used to fabricate audit entry ids with a known timestamp.
#[cfg(test)]
pub fn unix_ms_to_snowflake(unix_ms: i64) -> u64 {
    ((unix_ms - DISCORD_EPOCH_MS).max(0) as u64) << 22
}
