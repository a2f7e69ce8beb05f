use crate::card::Card;
use crate::card::CardId;
use time::OffsetDateTime;

/// Picks the card to show next from `pool`.
///
/// `exclude` is the card currently displayed, it is skipped so the same card doesn't come up
/// twice in a row. A pool holding a single card is the exception: that card is returned while
/// it is new or due, otherwise the deck couldn't be practised.
///
/// Due cards come first, weakest (lowest level) first, ties resolved by pool order. Without
/// due cards a new card is picked uniformly at random with `rng`. `None` means there's nothing
/// left to review right now.
pub fn select_next<'a>(
    pool: &'a [Card],
    exclude: Option<CardId>,
    now: OffsetDateTime,
    rng: &mut fastrand::Rng,
) -> Option<&'a Card> {
    if let [card] = pool {
        return (card.is_new() || card.is_due(now)).then_some(card);
    }

    let candidates = || pool.iter().filter(move |card| Some(card.id) != exclude);

    let due = candidates()
        .filter(|card| card.is_due(now))
        .min_by_key(|card| card.level());
    if due.is_some() {
        return due;
    }

    let new: Vec<&Card> = candidates().filter(|card| card.is_new()).collect();
    if new.is_empty() {
        return None;
    }

    Some(new[rng.usize(..new.len())])
}
