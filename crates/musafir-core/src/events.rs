use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::progression::{GaugeBand, Level};

/// Every state change in the system produces an Event.
/// Presentation layers render them; stores ignore them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    EffortRecorded {
        entry_id: i64,
        task_id: u32,
        points_awarded: u32,
        total_points: u32,
        gauge_value: u8,
        at: DateTime<Utc>,
    },
    LevelUp {
        from: Level,
        to: Level,
        at: DateTime<Utc>,
    },
    /// The gauge reached its maximum during this effort.
    GaugeSaturated {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        level: Level,
        points: u32,
        gauge_value: u8,
        gauge_band: GaugeBand,
        journal_len: usize,
        points_to_next_level: Option<u32>,
        at: DateTime<Utc>,
    },
}

/// Default lifetime of a notification, in seconds.
pub const DEFAULT_NOTIFICATION_SECS: u64 = 3;
const MAX_NOTIFICATION_SECS: u64 = 86_400;

/// A transient message with an expiry, held by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>, issued_at: DateTime<Utc>, duration_secs: u64) -> Self {
        // Capped at a day; a toast never needs longer.
        let secs = duration_secs.min(MAX_NOTIFICATION_SECS) as i64;
        Self {
            message: message.into(),
            issued_at,
            expires_at: issued_at + Duration::seconds(secs),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_expires_after_duration() {
        let t0 = Utc::now();
        let n = Notification::new("+10 points", t0, DEFAULT_NOTIFICATION_SECS);
        assert!(n.is_active(t0));
        assert!(n.is_active(t0 + Duration::milliseconds(2_999)));
        assert!(!n.is_active(t0 + Duration::seconds(3)));
    }

    #[test]
    fn event_is_tagged() {
        let e = Event::GaugeSaturated { at: Utc::now() };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "GaugeSaturated");
    }
}
