mod engine;
mod gauge;
mod level;
mod state;

pub use engine::{CategoryCount, ProgressStats, ProgressionEngine, RecordResult, StageStatus};
pub use gauge::{Gauge, GaugeBand, GAUGE_MAX, GAUGE_STEP};
pub use level::{Level, LEVEL_THREE_THRESHOLD, LEVEL_TWO_THRESHOLD};
pub use state::{JournalEntry, ProgressionState, DEFAULT_TIMESTAMP_FORMAT};
