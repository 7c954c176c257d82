//! # Musafir Core Library
//!
//! This library holds the logic of the Musafir spiritual-progress tracker.
//! The user performs small daily efforts, writes a reflection for each, and
//! the library turns that into points, a level, a "mirror polishing" gauge
//! and a journal. Presentation (the CLI, or any GUI) is a thin layer that
//! calls into this crate and renders what it returns.
//!
//! ## Architecture
//!
//! - **Catalog**: fixed reference data, three stages and four efforts
//! - **Progression Engine**: sole writer of the progression state; records
//!   efforts, applies the leveling thresholds and the saturating gauge
//! - **Storage**: optional persistence collaborator (SQLite) and TOML
//!   configuration
//!
//! ## Key Components
//!
//! - [`Catalog`]: stage and task lookup
//! - [`ProgressionEngine`]: the `record_effort` state transition
//! - [`ProgressStore`]: trait the engine saves through after each effort
//! - [`Config`]: application configuration management

pub mod catalog;
pub mod error;
pub mod events;
pub mod progression;
pub mod storage;

pub use catalog::{Catalog, Stage, StageId, Task, TaskCategory};
pub use error::{CatalogError, ConfigError, CoreError, ProgressionError, StoreError};
pub use events::{Event, Notification};
pub use progression::{
    GaugeBand, JournalEntry, Level, ProgressStats, ProgressionEngine, ProgressionState,
    RecordResult, StageStatus,
};
pub use storage::{Config, MemoryStore, ProgressStore, SqliteStore};
