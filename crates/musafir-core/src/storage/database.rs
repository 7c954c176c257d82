//! SQLite-backed progress storage.
//!
//! Keeps:
//! - the current level, points and gauge (single row)
//! - every journal entry ever recorded

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::data_dir;
use super::store::ProgressStore;
use crate::catalog::TaskCategory;
use crate::error::StoreError;
use crate::progression::{JournalEntry, Level, ProgressionState};

/// Default database file name inside the data directory.
pub const DEFAULT_DB_FILE: &str = "musafir.db";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at `<data_dir>/<file_name>`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(file_name: &str) -> Result<Self, StoreError> {
        let path = data_dir()?.join(file_name);
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS progress (
                id          INTEGER PRIMARY KEY CHECK (id = 1),
                level       INTEGER NOT NULL,
                points      INTEGER NOT NULL,
                gauge       INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS journal (
                id              INTEGER PRIMARY KEY,
                task_id         INTEGER NOT NULL,
                task_text       TEXT NOT NULL,
                category        TEXT NOT NULL,
                content         TEXT NOT NULL,
                created_at      TEXT NOT NULL,
                points_awarded  INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_journal_category ON journal(category);",
        )?;
        Ok(())
    }

    /// Number of stored journal entries.
    pub fn journal_len(&self) -> Result<u64, StoreError> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM journal", [], |row| row.get::<_, u64>(0))?;
        Ok(n)
    }

    fn load_journal(&self) -> Result<Vec<JournalEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, task_text, category, content, created_at, points_awarded
             FROM journal
             ORDER BY id DESC",
        )?;
        let rows = stmt.query_map([], read_row)?;

        let mut journal = Vec::new();
        for row in rows {
            journal.push(decode_row(row?)?);
        }
        Ok(journal)
    }
}

type JournalRow = (i64, u32, String, String, String, String, u32);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<JournalRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn decode_row(row: JournalRow) -> Result<JournalEntry, StoreError> {
    let (id, task_id, task_text, category, content, created_at, points_awarded) = row;
    let category: TaskCategory = category
        .parse()
        .map_err(|_| StoreError::Corrupt(format!("unknown category '{category}'")))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp on entry {id}: {e}")))?
        .with_timezone(&Utc);
    Ok(JournalEntry {
        id,
        task_id,
        task_text,
        category,
        content,
        created_at,
        points_awarded,
    })
}

/// Entries of `journal` (most recent first) that are not yet stored.
///
/// The stored rows must be exactly the older tail of `journal`: same count,
/// and the newest stored row equal to its in-memory counterpart. Anything
/// else means the database and the session have diverged.
fn unsaved_entries<'a>(
    conn: &Connection,
    journal: &'a [JournalEntry],
) -> Result<&'a [JournalEntry], StoreError> {
    let (max_id, stored) = conn.query_row(
        "SELECT MAX(id), COUNT(*) FROM journal",
        [],
        |row| Ok((row.get::<_, Option<i64>>(0)?, row.get::<_, usize>(1)?)),
    )?;
    let fresh = match max_id {
        Some(max_id) => journal.iter().take_while(|e| e.id > max_id).count(),
        None => journal.len(),
    };
    let (unsaved, saved) = journal.split_at(fresh);
    if saved.len() != stored {
        return Err(StoreError::Corrupt(format!(
            "journal has {stored} stored entries but the session holds {} older ones",
            saved.len()
        )));
    }
    if let Some(newest_saved) = saved.first() {
        let row = conn
            .query_row(
                "SELECT id, task_id, task_text, category, content, created_at, points_awarded
                 FROM journal WHERE id = ?1",
                params![newest_saved.id],
                read_row,
            )
            .optional()?;
        let stored_entry = row.map(decode_row).transpose()?;
        if stored_entry.as_ref() != Some(newest_saved) {
            return Err(StoreError::Corrupt(format!(
                "journal entry {} differs from the stored row",
                newest_saved.id
            )));
        }
    }
    Ok(unsaved)
}

impl ProgressStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn load(&mut self) -> Result<Option<ProgressionState>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT level, points, gauge FROM progress WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, u8>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, u8>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((level, points, gauge)) = row else {
            return Ok(None);
        };
        let level = Level::try_from(level).map_err(StoreError::Corrupt)?;
        let journal = self.load_journal()?;
        let state = ProgressionState::from_parts(level, points, gauge, journal)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(Some(state))
    }

    fn save(&mut self, state: &ProgressionState) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let unsaved = unsaved_entries(&tx, state.journal())?;
        {
            // Entries are immutable; only the ones newer than the stored
            // head are written, oldest first.
            let mut stmt = tx.prepare(
                "INSERT INTO journal
                    (id, task_id, task_text, category, content, created_at, points_awarded)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for entry in unsaved.iter().rev() {
                stmt.execute(params![
                    entry.id,
                    entry.task_id,
                    entry.task_text,
                    entry.category.as_str(),
                    entry.content,
                    entry.created_at.to_rfc3339(),
                    entry.points_awarded,
                ])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO progress (id, level, points, gauge) VALUES (1, ?1, ?2, ?3)",
            params![state.level().as_u8(), state.points(), state.gauge_value()],
        )?;
        tx.commit()?;
        tracing::debug!(inserted = unsaved.len(), "saved progress");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: i64, points: u32) -> JournalEntry {
        JournalEntry {
            id,
            task_id: 1,
            task_text: "Dhikr".into(),
            category: TaskCategory::Remembrance,
            content: "I felt calm".into(),
            created_at: Utc.timestamp_millis_opt(id).unwrap(),
            points_awarded: points,
        }
    }

    #[test]
    fn empty_database_loads_none() {
        let mut store = SqliteStore::open_memory().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_and_load() {
        let mut store = SqliteStore::open_memory().unwrap();
        let state = ProgressionState::from_parts(
            Level::Two,
            120,
            15,
            vec![entry(3_000, 25), entry(2_000, 10)],
        )
        .unwrap();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state));
    }

    #[test]
    fn repeated_saves_do_not_duplicate_entries() {
        let mut store = SqliteStore::open_memory().unwrap();
        let first = ProgressionState::from_parts(Level::One, 10, 5, vec![entry(1_000, 10)]).unwrap();
        store.save(&first).unwrap();
        let second = ProgressionState::from_parts(
            Level::One,
            20,
            10,
            vec![entry(2_000, 10), entry(1_000, 10)],
        )
        .unwrap();
        store.save(&second).unwrap();
        assert_eq!(store.journal_len().unwrap(), 2);
        assert_eq!(store.load().unwrap().unwrap().points(), 20);
    }

    #[test]
    fn conflicting_entry_is_rejected() {
        let mut store = SqliteStore::open_memory().unwrap();
        let first = ProgressionState::from_parts(Level::One, 10, 5, vec![entry(1_000, 10)]).unwrap();
        store.save(&first).unwrap();

        let mut altered = entry(1_000, 10);
        altered.content = "something else".into();
        let second = ProgressionState::from_parts(Level::One, 10, 5, vec![altered]).unwrap();
        assert!(matches!(store.save(&second), Err(StoreError::Corrupt(_))));
        assert_eq!(store.load().unwrap(), Some(first));
    }

    #[test]
    fn diverged_journal_leaves_database_untouched() {
        let mut store = SqliteStore::open_memory().unwrap();
        let stored = ProgressionState::from_parts(
            Level::One,
            20,
            10,
            vec![entry(2_000, 10), entry(1_000, 10)],
        )
        .unwrap();
        store.save(&stored).unwrap();

        // A session that started fresh knows nothing of the stored rows.
        let fresh = ProgressionState::from_parts(Level::One, 10, 5, vec![entry(3_000, 10)]).unwrap();
        assert!(matches!(store.save(&fresh), Err(StoreError::Corrupt(_))));
        assert_eq!(store.journal_len().unwrap(), 2);
        assert_eq!(store.load().unwrap(), Some(stored));
    }

    #[test]
    fn saves_append_in_steps() {
        let mut store = SqliteStore::open_memory().unwrap();
        let mut journal = Vec::new();
        for (step, id) in [1_000, 2_000, 3_000].into_iter().enumerate() {
            journal.insert(0, entry(id, 10));
            let points = 10 * (step as u32 + 1);
            let state =
                ProgressionState::from_parts(Level::One, points, 5 * (step as u8 + 1), journal.clone())
                    .unwrap();
            store.save(&state).unwrap();
            assert_eq!(store.journal_len().unwrap(), step as u64 + 1);
            assert_eq!(store.load().unwrap(), Some(state));
        }
    }

    #[test]
    fn corrupt_level_is_reported() {
        let mut store = SqliteStore::open_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO progress (id, level, points, gauge) VALUES (1, 7, 0, 0)",
                [],
            )
            .unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
    }
}
