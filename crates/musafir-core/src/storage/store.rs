use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::progression::ProgressionState;

/// Persistence collaborator of the progression engine.
///
/// The engine loads once at construction and saves after every accepted
/// effort. Failures are reported to the engine, which logs them and keeps
/// its in-memory state.
pub trait ProgressStore: Send {
    /// Short identifier used in log lines (e.g. "sqlite", "memory").
    fn name(&self) -> &str;

    /// Stored state, or `None` if nothing has been saved yet.
    fn load(&mut self) -> Result<Option<ProgressionState>, StoreError>;

    fn save(&mut self, state: &ProgressionState) -> Result<(), StoreError>;
}

/// In-process store.
///
/// Clones share the same slot, so a caller can keep a handle and observe
/// what the engine saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<ProgressionState>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `state`.
    pub fn with_state(state: ProgressionState) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(state))),
        }
    }

    /// Last saved state.
    pub fn snapshot(&self) -> Option<ProgressionState> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }
}

impl ProgressStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&mut self) -> Result<Option<ProgressionState>, StoreError> {
        let guard = self
            .slot
            .lock()
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&mut self, state: &ProgressionState) -> Result<(), StoreError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        *guard = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::Level;

    #[test]
    fn empty_store_loads_none() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn clones_share_saved_state() {
        let handle = MemoryStore::new();
        let mut store = handle.clone();
        let state = ProgressionState::from_parts(Level::Two, 150, 40, vec![]).unwrap();
        store.save(&state).unwrap();
        assert_eq!(handle.snapshot(), Some(state));
    }
}
