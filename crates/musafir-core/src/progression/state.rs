//! Progression state and journal entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::gauge::Gauge;
use super::level::Level;
use crate::catalog::TaskCategory;
use crate::error::ProgressionError;

/// Default rendering of `created_at`, e.g. "14 March, 09:30".
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-d %B, %H:%M";

/// Immutable record of one completed effort.
///
/// Task text and points are snapshots taken at completion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Epoch milliseconds of creation, strictly increasing within a journal.
    pub id: i64,
    pub task_id: u32,
    pub task_text: String,
    pub category: TaskCategory,
    /// The reflection, trimmed. Never empty.
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub points_awarded: u32,
}

impl JournalEntry {
    /// Render the creation time with a chrono format string.
    ///
    /// Falls back to RFC 3339 when the format string is invalid.
    pub fn display_timestamp(&self, format: &str) -> String {
        let mut out = String::new();
        if write!(out, "{}", self.created_at.format(format)).is_err() {
            return self.created_at.to_rfc3339();
        }
        out
    }
}

/// Mutable progress of one user's session.
///
/// Only [`ProgressionEngine`](super::ProgressionEngine) mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub(crate) level: Level,
    pub(crate) points: u32,
    pub(crate) gauge: Gauge,
    /// Most recent first.
    pub(crate) journal: Vec<JournalEntry>,
}

impl ProgressionState {
    /// Fresh state: level 1, no points, empty gauge and journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a state from stored parts.
    ///
    /// # Errors
    /// Returns `ProgressionError::InvalidState` if the gauge is out of range
    /// or the journal is not ordered most-recent-first.
    pub fn from_parts(
        level: Level,
        points: u32,
        gauge_value: u8,
        journal: Vec<JournalEntry>,
    ) -> Result<Self, ProgressionError> {
        let gauge = Gauge::try_from(gauge_value).map_err(ProgressionError::InvalidState)?;
        if journal.windows(2).any(|pair| pair[0].id <= pair[1].id) {
            return Err(ProgressionError::InvalidState(
                "journal must be ordered most recent first".into(),
            ));
        }
        Ok(Self {
            level,
            points,
            gauge,
            journal,
        })
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn gauge(&self) -> Gauge {
        self.gauge
    }

    pub fn gauge_value(&self) -> u8 {
        self.gauge.value()
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    /// Id for an entry created at `now`: its epoch milliseconds, bumped
    /// past the newest existing id if the clock has not moved forward.
    pub(crate) fn next_entry_id(&self, now: DateTime<Utc>) -> i64 {
        let ms = now.timestamp_millis();
        match self.journal.first() {
            Some(latest) if latest.id >= ms => latest.id + 1,
            _ => ms,
        }
    }
}
