pub mod catalog;
pub mod config;
pub mod progress;

use musafir_core::{Config, MemoryStore, ProgressStore, ProgressionEngine, SqliteStore};

/// Engine over the store selected by `storage.persist`.
///
/// An unavailable database degrades to an in-memory session, and so does
/// one whose contents cannot be read back.
pub fn open_engine(config: &Config) -> ProgressionEngine {
    let store: Box<dyn ProgressStore> = if config.storage.persist {
        match SqliteStore::open(&config.storage.db_file) {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::warn!(error = %e, "progress database unavailable, progress will not be kept");
                Box::new(MemoryStore::new())
            }
        }
    } else {
        Box::new(MemoryStore::new())
    };
    let engine = ProgressionEngine::with_store(store);
    if engine.store_degraded() {
        eprintln!("warning: stored progress could not be read; progress will not be kept this session");
    }
    engine
}
