use crate::card::Card;
use crate::card::ReviewOutcome;
use crate::interval::MAX_LEVEL;
use crate::interval::RETRY_DELAY;
use crate::interval::interval_for;
use crate::mastery::is_mastered;
use time::Duration;
use time::OffsetDateTime;

/// Levels lost after recalling a card incorrectly.
const FORGOT_PENALTY: u8 = 2;

/// Levels lost after not attempting a recall.
const UNKNOWN_PENALTY: u8 = 1;

/// Computes the state of `card` after it was reviewed at `now` with the given outcome.
///
/// The input is left untouched. `is_foundational` is the kind of the card's category, which
/// only affects the lapse reset and the mastery rule.
pub fn apply_outcome(
    card: &Card,
    outcome: ReviewOutcome,
    is_foundational: bool,
    now: OffsetDateTime,
) -> Card {
    let level = card.level();
    let mut next = card.clone();

    let interval = match outcome {
        ReviewOutcome::Remembered => {
            next.mastery_level = (level + 1).min(MAX_LEVEL);
            next.know_streak = card.know_streak.saturating_add(1);
            next.know_count = card.know_count.saturating_add(1);
            if !is_foundational {
                next.lapses = 0;
            }

            interval_for(next.mastery_level)
        }
        ReviewOutcome::Forgot | ReviewOutcome::Unknown => {
            let penalty = match outcome {
                ReviewOutcome::Forgot => FORGOT_PENALTY,
                _ => UNKNOWN_PENALTY,
            };

            next.mastery_level = level.saturating_sub(penalty);
            next.know_streak = 0;
            // A card failing at level 0 was never learned, so it isn't a lapse
            if level > 0 {
                next.lapses = card.lapses.saturating_add(1);
            }

            RETRY_DELAY
        }
    };

    next.last_reviewed_at = Some(now);
    next.next_review_at = now.saturating_add(interval);
    next.is_mastered = is_mastered(&next, is_foundational);

    next
}

/// Returns the delay each outcome would schedule if `card` were reviewed at `now`.
pub fn preview_intervals(
    card: &Card,
    is_foundational: bool,
    now: OffsetDateTime,
) -> [(ReviewOutcome, Duration); 3] {
    ReviewOutcome::ALL.map(|outcome| {
        let next = apply_outcome(card, outcome, is_foundational, now);

        (outcome, next.next_review_at - now)
    })
}

/// Formats a delay compactly, e.g. "5m", "8h", "3d" or "2w".
pub fn format_interval(interval: Duration) -> String {
    if interval < Duration::hours(1) {
        format!("{}m", interval.whole_minutes())
    } else if interval < Duration::days(1) {
        format!("{}h", interval.whole_hours())
    } else if interval < Duration::weeks(1) {
        format!("{}d", interval.whole_days())
    } else {
        format!("{}w", interval.whole_weeks())
    }
}
