use crate::error::CardError;
use crate::interval::MAX_LEVEL;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scheduling state of a single flashcard.
///
/// Cards are values: the engine never mutates one in place, every review produces a new `Card`
/// (see [`crate::apply_outcome`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub category: CategoryId,
    /// Rung on the interval ladder. Read it through [`Card::level`], which clamps values a
    /// looser store may have left out of range.
    pub mastery_level: u8,
    /// `None` until the first review.
    pub last_reviewed_at: Option<OffsetDateTime>,
    /// Earliest time the card may be shown again. Only meaningful once the card was reviewed.
    pub next_review_at: OffsetDateTime,
    pub know_count: u32,
    pub know_streak: u32,
    pub lapses: u32,
    /// Derived from the other fields after every transition.
    pub is_mastered: bool,
}

impl Card {
    /// Creates a card that has never been reviewed.
    pub fn new(id: CardId, category: CategoryId, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            category,
            mastery_level: 0,
            last_reviewed_at: None,
            next_review_at: created_at,
            know_count: 0,
            know_streak: 0,
            lapses: 0,
            is_mastered: false,
        }
    }

    pub fn level(&self) -> u8 {
        self.mastery_level.min(MAX_LEVEL)
    }

    pub fn is_new(&self) -> bool {
        self.last_reviewed_at.is_none()
    }

    pub fn is_due(&self, now: OffsetDateTime) -> bool {
        self.last_reviewed_at.is_some() && self.next_review_at <= now
    }
}

/// The implicit states a card moves through. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    New,
    Due,
    Scheduled,
    Mastered,
}

impl fmt::Display for CardState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CardState::New => "new",
            CardState::Due => "due",
            CardState::Scheduled => "scheduled",
            CardState::Mastered => "mastered",
        };

        f.write_str(name)
    }
}

/// Mastered wins over the timing states, a mastered card that is due still classifies as
/// mastered.
pub fn classify_state(card: &Card, now: OffsetDateTime) -> CardState {
    if card.is_mastered {
        CardState::Mastered
    } else if card.is_new() {
        CardState::New
    } else if card.is_due(now) {
        CardState::Due
    } else {
        CardState::Scheduled
    }
}

/// How well a card was recalled during a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Remembered,
    /// Recalled, but incorrectly.
    Forgot,
    /// No recall attempt at all.
    Unknown,
}

impl ReviewOutcome {
    pub const ALL: [ReviewOutcome; 3] = [
        ReviewOutcome::Remembered,
        ReviewOutcome::Forgot,
        ReviewOutcome::Unknown,
    ];

    pub fn is_success(self) -> bool {
        self == ReviewOutcome::Remembered
    }
}

impl fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ReviewOutcome::Remembered => "remembered",
            ReviewOutcome::Forgot => "forgot",
            ReviewOutcome::Unknown => "unknown",
        };

        f.write_str(name)
    }
}

impl FromStr for ReviewOutcome {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remembered" => Ok(ReviewOutcome::Remembered),
            "forgot" => Ok(ReviewOutcome::Forgot),
            "unknown" => Ok(ReviewOutcome::Unknown),
            _ => Err(CardError::UnknownOutcome(s.to_string())),
        }
    }
}

/// A card as an external store holds it, with loosely typed numbers.
#[derive(Debug, Clone)]
pub struct CardRecord {
    pub id: u64,
    pub category_id: u64,
    pub mastery_level: i64,
    pub last_reviewed_at: Option<OffsetDateTime>,
    pub next_review_at: OffsetDateTime,
    pub know_count: i64,
    pub know_streak: i64,
    pub lapses: i64,
    pub is_mastered: bool,
}

impl TryFrom<CardRecord> for Card {
    type Error = CardError;

    /// Out of range levels are clamped. Counters that don't fit are rejected.
    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        let mastery_level = record.mastery_level.clamp(0, i64::from(MAX_LEVEL)) as u8;

        Ok(Card {
            id: CardId(record.id),
            category: CategoryId(record.category_id),
            mastery_level,
            last_reviewed_at: record.last_reviewed_at,
            next_review_at: record.next_review_at,
            know_count: counter("knowCount", record.know_count)?,
            know_streak: counter("knowStreak", record.know_streak)?,
            lapses: counter("lapses", record.lapses)?,
            is_mastered: record.is_mastered,
        })
    }
}

fn counter(field: &'static str, value: i64) -> Result<u32, CardError> {
    u32::try_from(value).map_err(|_| CardError::InvalidCounter { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-03-01 12:00 UTC);

    fn record() -> CardRecord {
        CardRecord {
            id: 7,
            category_id: 2,
            mastery_level: 3,
            last_reviewed_at: Some(NOW - Duration::days(1)),
            next_review_at: NOW,
            know_count: 4,
            know_streak: 2,
            lapses: 1,
            is_mastered: false,
        }
    }

    #[test]
    fn new_card_is_blank() {
        let card = Card::new(CardId(1), CategoryId(1), NOW);

        assert_eq!(card.mastery_level, 0);
        assert!(card.is_new());
        assert_eq!(card.know_count, 0);
        assert_eq!(card.know_streak, 0);
        assert_eq!(card.lapses, 0);
        assert!(!card.is_mastered);
    }

    #[test]
    fn level_is_clamped_on_read() {
        let mut card = Card::new(CardId(1), CategoryId(1), NOW);
        card.mastery_level = 42;

        assert_eq!(card.level(), MAX_LEVEL);
    }

    #[test]
    fn classify() {
        let mut card = Card::new(CardId(1), CategoryId(1), NOW);
        assert_eq!(classify_state(&card, NOW), CardState::New);

        card.last_reviewed_at = Some(NOW - Duration::hours(2));
        card.next_review_at = NOW - Duration::hours(1);
        assert_eq!(classify_state(&card, NOW), CardState::Due);

        card.next_review_at = NOW + Duration::hours(1);
        assert_eq!(classify_state(&card, NOW), CardState::Scheduled);

        card.is_mastered = true;
        assert_eq!(classify_state(&card, NOW), CardState::Mastered);
    }

    #[test]
    fn new_card_is_never_due() {
        let card = Card::new(CardId(1), CategoryId(1), NOW - Duration::days(3));

        assert!(!card.is_due(NOW));
    }

    #[test]
    fn due_at_exact_time() {
        let mut card = Card::new(CardId(1), CategoryId(1), NOW);
        card.last_reviewed_at = Some(NOW - Duration::minutes(5));

        assert!(card.is_due(NOW));
    }

    #[test]
    fn outcome_names() {
        for outcome in ReviewOutcome::ALL {
            assert_eq!(outcome.to_string().parse::<ReviewOutcome>(), Ok(outcome));
        }

        assert_eq!(
            "maybe".parse::<ReviewOutcome>(),
            Err(CardError::UnknownOutcome("maybe".to_string()))
        );
    }

    #[test]
    fn record_converts() {
        let card = Card::try_from(record()).unwrap();

        assert_eq!(card.id, CardId(7));
        assert_eq!(card.category, CategoryId(2));
        assert_eq!(card.mastery_level, 3);
        assert_eq!(card.lapses, 1);
    }

    #[test]
    fn record_level_is_clamped() {
        let mut high = record();
        high.mastery_level = 9;
        assert_eq!(Card::try_from(high).unwrap().mastery_level, MAX_LEVEL);

        let mut low = record();
        low.mastery_level = -3;
        assert_eq!(Card::try_from(low).unwrap().mastery_level, 0);
    }

    #[test]
    fn negative_counter_is_rejected() {
        let mut r = record();
        r.lapses = -1;

        assert_eq!(
            Card::try_from(r),
            Err(CardError::InvalidCounter {
                field: "lapses",
                value: -1
            })
        );
    }
}
