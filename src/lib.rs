//! Review scheduling for spaced-repetition flashcards.
//!
//! Everything here is a pure function over card values: callers pass in the current time, the
//! category kind and a random number generator, and get new values back. Storing cards is up
//! to the caller.

mod card;
mod error;
mod interval;
mod leech;
mod mastery;
mod schedule;
mod select;
mod summary;

pub use card::Card;
pub use card::CardId;
pub use card::CardRecord;
pub use card::CardState;
pub use card::CategoryId;
pub use card::ReviewOutcome;
pub use card::classify_state;
pub use error::CardError;
pub use interval::INTERVALS;
pub use interval::MAX_LEVEL;
pub use interval::RETRY_DELAY;
pub use interval::interval_for;
pub use leech::LEECH_THRESHOLD;
pub use leech::is_leech;
pub use leech::leeches;
pub use mastery::FOUNDATIONAL_STREAK;
pub use mastery::is_mastered;
pub use schedule::apply_outcome;
pub use schedule::format_interval;
pub use schedule::preview_intervals;
pub use select::select_next;
pub use summary::Summary;
pub use summary::summarize;
