use time::Duration;

/// Delay until the next review after a successful recall, indexed by the mastery level reached
/// minus one.
pub const INTERVALS: [Duration; 6] = [
    Duration::hours(1),
    Duration::hours(8),
    Duration::days(1),
    Duration::days(3),
    Duration::weeks(1),
    Duration::weeks(2),
];

/// Highest reachable mastery level. A card at this level has exhausted the interval table.
pub const MAX_LEVEL: u8 = INTERVALS.len() as u8;

/// Delay used after any failed review, whatever the card's level.
pub const RETRY_DELAY: Duration = Duration::minutes(5);

/// Returns the delay to schedule for a card that has just reached `level`.
pub fn interval_for(level: u8) -> Duration {
    match level.min(MAX_LEVEL) {
        0 => RETRY_DELAY,
        level => INTERVALS[usize::from(level) - 1],
    }
}
