use crate::card::Card;

pub const LEECH_THRESHOLD: u32 = 5;

/// Whether the card keeps failing and needs attention outside of normal scheduling.
pub fn is_leech(card: &Card) -> bool {
    card.lapses >= LEECH_THRESHOLD
}

pub fn leeches(pool: &[Card]) -> impl Iterator<Item = &Card> {
    pool.iter().filter(|card| is_leech(card))
}
