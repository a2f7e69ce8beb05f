use crate::card::Card;
use crate::card::CardState;
use crate::card::classify_state;
use crate::leech::is_leech;
use time::OffsetDateTime;

/// Number of cards in each implicit state.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub new: u32,
    pub due: u32,
    pub scheduled: u32,
    pub mastered: u32,
    pub leech: u32,
}

impl Summary {
    pub fn total(&self) -> u32 {
        self.new + self.due + self.scheduled + self.mastered
    }
}

pub fn summarize(pool: &[Card], now: OffsetDateTime) -> Summary {
    let mut summary = Summary::default();

    for card in pool {
        match classify_state(card, now) {
            CardState::New => summary.new += 1,
            CardState::Due => summary.due += 1,
            CardState::Scheduled => summary.scheduled += 1,
            CardState::Mastered => summary.mastered += 1,
        }

        if is_leech(card) {
            summary.leech += 1;
        }
    }

    summary
}
