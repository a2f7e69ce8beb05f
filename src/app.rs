use crate::clock::Clock;
use crate::prompt;
use crate::stats::Stats;
use crate::store::Content;
use crate::store::Store;
use anyhow::Result;
use anyhow::bail;
use srs_engine::Card;
use srs_engine::CardId;
use srs_engine::CategoryId;
use srs_engine::ReviewOutcome;
use srs_engine::apply_outcome;
use srs_engine::classify_state;
use srs_engine::format_interval;
use srs_engine::is_leech;
use srs_engine::preview_intervals;
use srs_engine::select_next;
use srs_engine::summarize;
use time::Duration;

pub struct App<C> {
    store: Store,
    clock: C,
}

impl<C: Clock> App<C> {
    pub fn new(store: Store, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn init(&mut self) -> Result<()> {
        self.store.init()
    }

    pub fn create_category(&mut self, name: &str, is_foundational: bool) -> Result<()> {
        let name = name.trim();
        let id = self
            .store
            .create_category(name, is_foundational, self.clock.now())?;

        println!("Created {name} ({id})");
        Ok(())
    }

    pub fn categories(&self) -> Result<()> {
        for category in self.store.categories()? {
            if category.is_foundational {
                println!("{} {} [foundational]", category.id, category.name);
            } else {
                println!("{} {}", category.id, category.name);
            }
        }

        Ok(())
    }

    pub fn add(&mut self, category_id: u64, front: &str, back: &str) -> Result<CardId> {
        let front = front.trim();
        if front.is_empty() {
            bail!("Front of card can't be empty");
        }

        let category = self.store.get_category(CategoryId(category_id))?;

        let card = self
            .store
            .create_card(category.id, front, back.trim(), self.clock.now())?;

        println!("Added {} to {}", card.id, category.name);
        Ok(card.id)
    }

    pub fn delete(&mut self, card_id: u64) -> Result<()> {
        let id = CardId(card_id);
        let front = self.store.content(id)?.front;

        if prompt::binary(format!(
            "Are you sure you want to delete '{}'",
            front.replace('\n', " ")
        ))? {
            self.store.delete_card(id)?;
            println!("... deleted.");
        }

        Ok(())
    }

    pub fn cards(&self) -> Result<()> {
        let now = self.clock.now();

        for (card, front) in self.store.card_previews()? {
            let front = front.replace('\n', " ");
            let state = classify_state(&card, now);

            if is_leech(&card) {
                println!("[leech] {} {state} {front}", card.id);
            } else {
                println!("{} {state} {front}", card.id);
            }
        }

        Ok(())
    }

    /// Shows cards one at a time until nothing is new or due.
    pub fn review(&mut self) -> Result<()> {
        let foundational = self.store.foundational()?;
        let mut cards = self.store.cards()?;

        let summary = summarize(&cards, self.clock.now());
        println!("{} cards due, {} new\n", summary.due, summary.new);

        let mut rng = fastrand::Rng::new();
        log::debug!("Review session seed {}", rng.get_seed());

        let mut current = None;
        let mut num_reviewed = 0;
        let mut num_remembered = 0;

        loop {
            let Some(card) = select_next(&cards, current, self.clock.now(), &mut rng).cloned()
            else {
                break;
            };

            let is_foundational = foundational.contains(&card.category);
            let content = self.store.content(card.id)?;

            let outcome = self.review_card(&card, &content, is_foundational)?;

            let next = self.record_answer(&mut cards, &card, outcome, is_foundational)?;

            num_reviewed += 1;
            if outcome.is_success() {
                num_remembered += 1;
            }

            if is_leech(&next) && !is_leech(&card) {
                log::info!("Card {} became a leech after {} lapses", next.id, next.lapses);
                println!("... flagged as a leech.");
            }
            if next.is_mastered && !card.is_mastered {
                println!("... mastered.");
            }

            current = Some(next.id);

            println!();
        }

        println!("Remembered {num_remembered}/{num_reviewed}");
        println!("Finished review");

        Ok(())
    }

    /// Applies `outcome` to `card`, persists the result and swaps it into `cards`.
    fn record_answer(
        &mut self,
        cards: &mut [Card],
        card: &Card,
        outcome: ReviewOutcome,
        is_foundational: bool,
    ) -> Result<Card> {
        let now = self.clock.now();
        let next = apply_outcome(card, outcome, is_foundational, now);
        self.store.save_review(&next, outcome, now)?;

        if let Some(slot) = cards.iter_mut().find(|c| c.id == next.id) {
            *slot = next.clone();
        }

        Ok(next)
    }

    fn review_card(
        &self,
        card: &Card,
        content: &Content,
        is_foundational: bool,
    ) -> Result<ReviewOutcome> {
        println!("{}\n", &content.front);

        prompt::any("Press any key to show answer")?;

        println!("{}", "-".repeat(79));

        println!("{}\n", &content.back);

        let previews = preview_intervals(card, is_foundational, self.clock.now())
            .map(|(outcome, interval)| format!("{outcome} {}", format_interval(interval)))
            .join(", ");

        prompt::outcome(format!(
            "[r]emembered, [f]orgot or [u]nknown? ({previews}) "
        ))
    }

    pub fn stats(&self) -> Result<()> {
        print!("{}", self.collect_stats()?);

        Ok(())
    }

    fn collect_stats(&self) -> Result<Stats> {
        let now = self.clock.now();

        Ok(Stats {
            summary: summarize(&self.store.cards()?, now),
            answers: self.store.answers_since(now - Duration::days(30))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::Answers;
    use time::OffsetDateTime;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-03-01 12:00 UTC);

    fn app() -> App<FixedClock> {
        let mut app = App::new(Store::open_in_memory().unwrap(), FixedClock(NOW));
        app.init().unwrap();
        app.create_category("verbs", false).unwrap();
        app
    }

    #[test]
    fn add_trims_content() {
        let mut app = app();

        let id = app.add(1, "  gehen \n", " to go ").unwrap();

        let content = app.store.content(id).unwrap();
        assert_eq!(content.front, "gehen");
        assert_eq!(content.back, "to go");
    }

    #[test]
    fn add_rejects_empty_front() {
        let mut app = app();

        assert!(app.add(1, "  ", "back").is_err());
        assert!(app.store.cards().unwrap().is_empty());
    }

    #[test]
    fn add_rejects_unknown_category() {
        let mut app = app();

        assert!(app.add(9, "front", "back").is_err());
    }

    #[test]
    fn stats_count_new_cards() {
        let mut app = app();
        app.add(1, "gehen", "to go").unwrap();
        app.add(1, "sehen", "to see").unwrap();

        let stats = app.collect_stats().unwrap();

        assert_eq!(stats.summary.new, 2);
        assert_eq!(stats.summary.total(), 2);
        assert_eq!(stats.answers, Answers::default());
    }

    #[test]
    fn stats_after_review() {
        let mut app = app();
        let id = app.add(1, "gehen", "to go").unwrap();

        let card = app.store.cards().unwrap().remove(0);
        assert_eq!(card.id, id);
        let next = apply_outcome(&card, ReviewOutcome::Remembered, false, NOW);
        app.store
            .save_review(&next, ReviewOutcome::Remembered, NOW)
            .unwrap();

        let stats = app.collect_stats().unwrap();

        assert_eq!(stats.summary.scheduled, 1);
        assert_eq!(
            stats.answers,
            Answers {
                remembered: 1,
                total: 1
            }
        );
    }

    #[test]
    fn session_reviews_each_card_once_then_stops() {
        let mut app = app();
        app.add(1, "gehen", "to go").unwrap();
        app.add(1, "sehen", "to see").unwrap();
        app.add(1, "essen", "to eat").unwrap();

        let mut cards = app.store.cards().unwrap();
        let mut rng = fastrand::Rng::with_seed(3);
        let mut current = None;
        let mut shown = vec![];

        while let Some(card) = select_next(&cards, current, NOW, &mut rng).cloned() {
            assert_ne!(Some(card.id), current);

            let next = app
                .record_answer(&mut cards, &card, ReviewOutcome::Remembered, false)
                .unwrap();
            assert_eq!(next.next_review_at, NOW + Duration::hours(1));

            shown.push(card.id);
            current = Some(next.id);
        }

        shown.sort();
        assert_eq!(shown, vec![CardId(1), CardId(2), CardId(3)]);
        assert_eq!(app.store.cards().unwrap(), cards);
        assert!(cards.iter().all(|c| c.mastery_level == 1));
        assert_eq!(app.collect_stats().unwrap().answers.total, 3);
    }

    #[test]
    fn forgotten_card_is_kept_in_pool_as_scheduled() {
        let mut app = app();
        app.add(1, "gehen", "to go").unwrap();
        app.add(1, "sehen", "to see").unwrap();

        let mut cards = app.store.cards().unwrap();
        let card = cards[0].clone();

        let next = app
            .record_answer(&mut cards, &card, ReviewOutcome::Forgot, false)
            .unwrap();

        assert_eq!(cards[0], next);
        assert_eq!(cards[0].next_review_at, NOW + Duration::minutes(5));
        assert_eq!(app.store.cards().unwrap(), cards);

        let mut rng = fastrand::Rng::with_seed(3);
        let following = select_next(&cards, Some(next.id), NOW, &mut rng).unwrap();
        assert_eq!(following.id, cards[1].id);
    }
}
