pub mod stopwatch;
pub mod timer;

use thiserror::Error;

/// Nominal period of the stopwatch and timer tick sources.
pub const TICK_INTERVAL_MS: u64 = 10;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum TrackerError {
    #[error("timer duration must be greater than zero")]
    EmptyDuration,
    #[error("timer is already running")]
    AlreadyRunning,
}

/// Reads the leading decimal digits of a text field after an optional `+`;
/// anything else counts as 0.
pub fn parse_leading_number(input: &str) -> u64 {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().unwrap_or(0)
}
