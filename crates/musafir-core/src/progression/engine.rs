//! Progression engine.
//!
//! The engine owns a [`ProgressionState`] and is its only writer. The single
//! mutating operation is recording an effort:
//!
//! ```text
//! validate reflection -> resolve task -> build entry
//!     -> points += task.points -> gauge += 5 (max 100)
//!     -> level.advance(new points) -> commit -> save (best effort)
//! ```
//!
//! Everything is computed before anything is written, so a rejected call
//! leaves the state exactly as it was.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = ProgressionEngine::new();
//! let result = engine.record_effort(1, "I felt calm")?;
//! println!("{}", result.confirmation);
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::gauge::GaugeBand;
use super::level::Level;
use super::state::{JournalEntry, ProgressionState};
use crate::catalog::{Catalog, Stage, Task, TaskCategory};
use crate::error::ProgressionError;
use crate::events::Event;
use crate::storage::ProgressStore;

/// Outcome of an accepted effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordResult {
    pub entry_id: i64,
    pub task_id: u32,
    pub points_awarded: u32,
    pub total_points: u32,
    pub level: Level,
    pub leveled_up: bool,
    pub gauge_value: u8,
    /// Short message for a transient notification.
    pub confirmation: String,
    pub events: Vec<Event>,
}

/// A stage together with its unlock flag at the time of the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageStatus {
    pub stage: &'static Stage,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: TaskCategory,
    pub efforts: usize,
    pub points: u32,
}

/// Totals derived from the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressStats {
    pub total_efforts: usize,
    pub by_category: Vec<CategoryCount>,
}

pub struct ProgressionEngine {
    catalog: Catalog,
    state: ProgressionState,
    store: Option<Box<dyn ProgressStore>>,
    /// Set when the stored state could not be loaded; saving is then
    /// suspended so the unreadable data is not overwritten.
    store_degraded: bool,
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionEngine {
    /// Engine over a fresh, unpersisted state.
    pub fn new() -> Self {
        Self::from_state(ProgressionState::new())
    }

    /// Engine over an existing state, without persistence.
    pub fn from_state(state: ProgressionState) -> Self {
        Self {
            catalog: Catalog::new(),
            state,
            store: None,
            store_degraded: false,
        }
    }

    /// Engine backed by `store`.
    ///
    /// Loads the stored state; if there is none, or loading fails, the
    /// session starts fresh. A load failure is logged, not returned, and
    /// leaves the store untouched for the rest of the session.
    pub fn with_store(mut store: Box<dyn ProgressStore>) -> Self {
        let mut store_degraded = false;
        let state = match store.load() {
            Ok(Some(state)) => {
                tracing::debug!(
                    store = store.name(),
                    points = state.points(),
                    entries = state.journal().len(),
                    "loaded progress"
                );
                state
            }
            Ok(None) => ProgressionState::new(),
            Err(e) => {
                tracing::warn!(
                    store = store.name(),
                    error = %e,
                    "failed to load progress, starting fresh; saving disabled for this session"
                );
                store_degraded = true;
                ProgressionState::new()
            }
        };
        Self {
            catalog: Catalog::new(),
            state,
            store: Some(store),
            store_degraded,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    /// Whether accepted efforts are being written to a store.
    pub fn is_persisting(&self) -> bool {
        self.store.is_some() && !self.store_degraded
    }

    /// True if the store failed to load at construction.
    pub fn store_degraded(&self) -> bool {
        self.store_degraded
    }

    pub fn level(&self) -> Level {
        self.state.level
    }

    pub fn points(&self) -> u32 {
        self.state.points
    }

    pub fn gauge_value(&self) -> u8 {
        self.state.gauge.value()
    }

    pub fn gauge_band(&self) -> GaugeBand {
        self.state.gauge.band()
    }

    /// Journal, most recent first.
    pub fn journal(&self) -> &[JournalEntry] {
        &self.state.journal
    }

    /// Stages with their unlock flags, derived from the current level.
    pub fn stages(&self) -> Vec<StageStatus> {
        let level = self.state.level;
        self.catalog
            .list_stages()
            .iter()
            .enumerate()
            .map(|(idx, stage)| StageStatus {
                stage,
                unlocked: level.unlocks_stage(idx),
            })
            .collect()
    }

    /// Points still needed to cross the next threshold; `None` at the top.
    pub fn points_to_next_level(&self) -> Option<u32> {
        self.state
            .level
            .next_threshold()
            .map(|threshold| (threshold + 1).saturating_sub(self.state.points))
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            level: self.state.level,
            points: self.state.points,
            gauge_value: self.gauge_value(),
            gauge_band: self.gauge_band(),
            journal_len: self.state.journal.len(),
            points_to_next_level: self.points_to_next_level(),
            at: Utc::now(),
        }
    }

    pub fn stats(&self) -> ProgressStats {
        let by_category = self
            .catalog
            .list_tasks()
            .iter()
            .map(|task| task.category)
            .map(|category| {
                let matching = self.state.journal.iter().filter(|e| e.category == category);
                CategoryCount {
                    category,
                    efforts: matching.clone().count(),
                    points: matching.fold(0u32, |acc, e| acc.saturating_add(e.points_awarded)),
                }
            })
            .collect();
        ProgressStats {
            total_efforts: self.state.journal.len(),
            by_category,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record a completed effort with its reflection, timestamped now.
    ///
    /// # Errors
    /// `EmptyReflection` if the text is blank, `UnknownTask` if the id is
    /// not in the catalog. Neither touches the state.
    pub fn record_effort(
        &mut self,
        task_id: u32,
        reflection: &str,
    ) -> Result<RecordResult, ProgressionError> {
        self.record_effort_at(task_id, reflection, Utc::now())
    }

    /// Like [`record_effort`](Self::record_effort), with an explicit clock.
    ///
    /// # Errors
    /// Same as `record_effort`.
    pub fn record_effort_at(
        &mut self,
        task_id: u32,
        reflection: &str,
        now: DateTime<Utc>,
    ) -> Result<RecordResult, ProgressionError> {
        let content = validate_reflection(reflection)?;
        let task = self.catalog.get_task(task_id)?;
        Ok(self.apply(task, content, now))
    }

    /// Record an effort for a task named by user input, e.g. `"2"`.
    ///
    /// # Errors
    /// Same as `record_effort`; an unparsable key is an `UnknownTask`.
    pub fn record_effort_by_key(
        &mut self,
        task_key: &str,
        reflection: &str,
    ) -> Result<RecordResult, ProgressionError> {
        let content = validate_reflection(reflection)?;
        let task = self.catalog.find_task(task_key)?;
        Ok(self.apply(task, content, Utc::now()))
    }

    fn apply(&mut self, task: &'static Task, content: &str, now: DateTime<Utc>) -> RecordResult {
        let entry = JournalEntry {
            id: self.state.next_entry_id(now),
            task_id: task.id,
            task_text: task.text.to_string(),
            category: task.category,
            content: content.to_string(),
            created_at: now,
            points_awarded: task.points,
        };
        let level_before = self.state.level;
        let points = self.state.points.saturating_add(task.points);
        let gauge = self.state.gauge.advanced();
        let level = level_before.advance(points);

        let mut events = vec![Event::EffortRecorded {
            entry_id: entry.id,
            task_id: task.id,
            points_awarded: task.points,
            total_points: points,
            gauge_value: gauge.value(),
            at: now,
        }];
        if level != level_before {
            tracing::info!(from = %level_before, to = %level, points, "level up");
            events.push(Event::LevelUp {
                from: level_before,
                to: level,
                at: now,
            });
        }
        if gauge.is_saturated() && !self.state.gauge.is_saturated() {
            events.push(Event::GaugeSaturated { at: now });
        }

        let entry_id = entry.id;
        self.state.journal.insert(0, entry);
        self.state.points = points;
        self.state.gauge = gauge;
        self.state.level = level;
        tracing::debug!(task_id = task.id, points_awarded = task.points, total = points, "effort recorded");

        self.persist();

        RecordResult {
            entry_id,
            task_id: task.id,
            points_awarded: task.points,
            total_points: points,
            level,
            leveled_up: level != level_before,
            gauge_value: gauge.value(),
            confirmation: format!("Experience recorded. +{} points.", task.points),
            events,
        }
    }

    fn persist(&mut self) {
        if self.store_degraded {
            return;
        }
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.save(&self.state) {
                tracing::warn!(store = store.name(), error = %e, "failed to save progress");
            }
        }
    }
}

/// Trimmed reflection, or `EmptyReflection` if nothing is left.
fn validate_reflection(reflection: &str) -> Result<&str, ProgressionError> {
    let trimmed = reflection.trim();
    if trimmed.is_empty() {
        return Err(ProgressionError::EmptyReflection);
    }
    Ok(trimmed)
}
