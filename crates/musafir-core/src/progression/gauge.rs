//! The "mirror polishing" gauge.

use serde::{Deserialize, Serialize};

pub const GAUGE_MAX: u8 = 100;
/// Fixed advance per recorded effort, independent of task or points.
pub const GAUGE_STEP: u8 = 5;

/// Saturating 0..=100 progress value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Gauge(u8);

impl Gauge {
    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_saturated(&self) -> bool {
        self.0 == GAUGE_MAX
    }

    /// Gauge after one more effort.
    pub fn advanced(self) -> Gauge {
        Gauge(self.0.saturating_add(GAUGE_STEP).min(GAUGE_MAX))
    }

    pub fn band(&self) -> GaugeBand {
        GaugeBand::for_value(self.0)
    }
}

impl TryFrom<u8> for Gauge {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > GAUGE_MAX {
            return Err(format!("gauge must be at most {GAUGE_MAX} (got {value})"));
        }
        Ok(Gauge(value))
    }
}

impl From<Gauge> for u8 {
    fn from(gauge: Gauge) -> Self {
        gauge.0
    }
}

/// Display band of the gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeBand {
    /// Below 30: the rust of forgetfulness still covers the mirror.
    Obscured,
    /// 30 to 69: light begins to show.
    Emerging,
    /// 70 and above: the mirror reflects the Presence.
    Radiant,
}

impl GaugeBand {
    pub fn for_value(value: u8) -> GaugeBand {
        match value {
            0..=29 => GaugeBand::Obscured,
            30..=69 => GaugeBand::Emerging,
            _ => GaugeBand::Radiant,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GaugeBand::Obscured => "obscured",
            GaugeBand::Emerging => "emerging",
            GaugeBand::Radiant => "radiant",
        }
    }
}
