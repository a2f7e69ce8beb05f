use crate::card::Card;
use crate::interval::MAX_LEVEL;

/// Consecutive successful recalls needed to master a card in a foundational category.
pub const FOUNDATIONAL_STREAK: u32 = 10;

/// Foundational categories are small closed sets drilled to automaticity, so they are mastered
/// by streak and ignore the level. Everything else is mastered once the interval table is
/// exhausted.
pub fn is_mastered(card: &Card, is_foundational: bool) -> bool {
    if is_foundational {
        card.know_streak >= FOUNDATIONAL_STREAK
    } else {
        card.level() >= MAX_LEVEL
    }
}
