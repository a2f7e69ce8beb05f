use anyhow::Result;
use anyhow::bail;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::config::DbConfig;
use rusqlite::params;
use rusqlite::types::Type;
use srs_engine::Card;
use srs_engine::CardId;
use srs_engine::CardRecord;
use srs_engine::CategoryId;
use srs_engine::ReviewOutcome;
use std::collections::HashSet;
use std::path::Path;
use time::OffsetDateTime;

const CARD_COLUMNS: &str = "
    Card.id, Card.categoryId, masteryLevel, lastReviewedTimestamp, nextReviewTimestamp,
    knowCount, knowStreak, lapses, isMastered
";

/// SQLite backed storage for categories, cards and their review history.
pub struct Store {
    conn: Connection,
}

#[derive(Debug)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub is_foundational: bool,
}

#[derive(Debug)]
pub struct Content {
    pub front: String,
    pub back: String,
}

/// Answers recorded over some period.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Answers {
    pub remembered: u32,
    pub total: u32,
}

impl Store {
    pub fn open(db_path: &Path) -> Result<Self> {
        log::debug!("Opening {}", db_path.display());

        Self::with_connection(Connection::open(db_path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;

        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        log::debug!("Creating schema");

        self.conn.execute_batch(include_str!("schema.sql"))?;

        Ok(())
    }

    pub fn create_category(
        &mut self,
        name: &str,
        is_foundational: bool,
        now: OffsetDateTime,
    ) -> Result<CategoryId> {
        if name.is_empty() {
            bail!("category name can't be empty");
        }

        let id: u64 = self.conn.query_row(
            "INSERT INTO Category(name, isFoundational, creationTimestamp) VALUES (?, ?, ?) RETURNING id",
            params![name, is_foundational, to_millis(now)],
            |row| row.get(0),
        )?;

        Ok(CategoryId(id))
    }

    pub fn categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, isFoundational FROM Category ORDER BY name")?;

        let iter = stmt.query_map([], category)?;

        let r: Result<_, rusqlite::Error> = iter.collect();

        Ok(r?)
    }

    pub fn get_category(&self, id: CategoryId) -> Result<Category> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name, isFoundational FROM Category WHERE id = ?",
                [id.0],
                category,
            )
            .optional()?;

        match category {
            Some(category) => Ok(category),
            None => bail!("no category with id {id}"),
        }
    }

    /// Adds a card that has never been reviewed.
    pub fn create_card(
        &mut self,
        category: CategoryId,
        front: &str,
        back: &str,
        now: OffsetDateTime,
    ) -> Result<Card> {
        let tx = self.conn.transaction()?;

        let id: u64 = tx.query_row(
            "INSERT INTO Card(categoryId, front, back, creationTimestamp) VALUES (?, ?, ?, ?) RETURNING id",
            params![category.0, front, back, to_millis(now)],
            |row| row.get(0),
        )?;

        let card = Card::new(CardId(id), category, now);

        tx.execute(
            "
            INSERT INTO Schedule(
                cardId, masteryLevel, lastReviewedTimestamp, nextReviewTimestamp,
                knowCount, knowStreak, lapses, isMastered
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                id,
                card.mastery_level,
                card.last_reviewed_at.map(to_millis),
                to_millis(card.next_review_at),
                card.know_count,
                card.know_streak,
                card.lapses,
                card.is_mastered,
            ],
        )?;

        tx.commit()?;

        log::debug!("Created card {id}");

        Ok(card)
    }

    pub fn delete_card(&mut self, id: CardId) -> Result<()> {
        self.conn.execute("DELETE FROM Card WHERE id = ?", [id.0])?;

        Ok(())
    }

    /// Loads every card, in creation order.
    pub fn cards(&self) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {CARD_COLUMNS}
            FROM Card JOIN Schedule ON Card.id = Schedule.cardId
            ORDER BY Card.id
            "
        ))?;

        let iter = stmt.query_map([], card_record)?;

        let records: Result<Vec<_>, rusqlite::Error> = iter.collect();
        let cards: Result<Vec<_>, _> = records?.into_iter().map(Card::try_from).collect();

        let cards = cards?;
        log::debug!("Loaded {} cards", cards.len());

        Ok(cards)
    }

    /// Loads every card together with its front.
    pub fn card_previews(&self) -> Result<Vec<(Card, String)>> {
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {CARD_COLUMNS}, front
            FROM Card JOIN Schedule ON Card.id = Schedule.cardId
            ORDER BY Card.id
            "
        ))?;

        let iter = stmt.query_map([], |row| Ok((card_record(row)?, row.get::<_, String>(9)?)))?;

        let mut previews = vec![];
        for row in iter {
            let (record, front) = row?;
            previews.push((Card::try_from(record)?, front));
        }

        Ok(previews)
    }

    pub fn content(&self, id: CardId) -> Result<Content> {
        let content = self
            .conn
            .query_row(
                "SELECT front, back FROM Card WHERE id = ?",
                [id.0],
                |row| {
                    Ok(Content {
                        front: row.get(0)?,
                        back: row.get(1)?,
                    })
                },
            )
            .optional()?;

        match content {
            Some(content) => Ok(content),
            None => bail!("no card with id {id}"),
        }
    }

    /// Ids of the categories whose cards are mastered by streak.
    pub fn foundational(&self) -> Result<HashSet<CategoryId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM Category WHERE isFoundational = 1")?;

        let iter = stmt.query_map([], |row| Ok(CategoryId(row.get(0)?)))?;

        let r: Result<_, rusqlite::Error> = iter.collect();

        Ok(r?)
    }

    /// Records an answer and overwrites the card's schedule with `card`. The last write wins.
    pub fn save_review(
        &mut self,
        card: &Card,
        outcome: ReviewOutcome,
        now: OffsetDateTime,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;

        let updated = tx.execute(
            "
            UPDATE Schedule
            SET masteryLevel = ?, lastReviewedTimestamp = ?, nextReviewTimestamp = ?,
                knowCount = ?, knowStreak = ?, lapses = ?, isMastered = ?
            WHERE cardId = ?
            ",
            params![
                card.mastery_level,
                card.last_reviewed_at.map(to_millis),
                to_millis(card.next_review_at),
                card.know_count,
                card.know_streak,
                card.lapses,
                card.is_mastered,
                card.id.0,
            ],
        )?;

        if updated == 0 {
            bail!("no card with id {}", card.id);
        }

        tx.execute(
            "INSERT INTO Answer(cardId, outcome, timestamp) VALUES (?, ?, ?)",
            params![card.id.0, outcome.to_string(), to_millis(now)],
        )?;

        tx.commit()?;

        log::info!(
            "Card {} {outcome}, level {} due {}",
            card.id,
            card.mastery_level,
            card.next_review_at
        );

        Ok(())
    }

    pub fn answers_since(&self, since: OffsetDateTime) -> Result<Answers> {
        Ok(self.conn.query_row(
            "
            SELECT
                (SELECT COUNT(*) FROM Answer WHERE outcome = 'remembered' AND timestamp > ?1),
                (SELECT COUNT(*) FROM Answer WHERE timestamp > ?1)
            ",
            [to_millis(since)],
            |row| {
                Ok(Answers {
                    remembered: row.get(0)?,
                    total: row.get(1)?,
                })
            },
        )?)
    }
}

fn category(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: CategoryId(row.get(0)?),
        name: row.get(1)?,
        is_foundational: row.get(2)?,
    })
}

fn card_record(row: &Row) -> rusqlite::Result<CardRecord> {
    let last_reviewed_at: Option<i64> = row.get(3)?;

    Ok(CardRecord {
        id: row.get(0)?,
        category_id: row.get(1)?,
        mastery_level: row.get(2)?,
        last_reviewed_at: last_reviewed_at.map(|ms| from_millis(3, ms)).transpose()?,
        next_review_at: from_millis(4, row.get(4)?)?,
        know_count: row.get(5)?,
        know_streak: row.get(6)?,
        lapses: row.get(7)?,
        is_mastered: row.get(8)?,
    })
}

fn to_millis(timestamp: OffsetDateTime) -> i64 {
    (timestamp.unix_timestamp_nanos() / 1_000_000) as i64
}

fn from_millis(column: usize, millis: i64) -> rusqlite::Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Integer, Box::new(e)))
}
