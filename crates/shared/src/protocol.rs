use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{SlideIndex, View};

/// Session storage key the snapshot is written under.
pub const SNAPSHOT_KEY: &str = "pitchState";

/// Ephemeral UI position, valid only within one browsing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub current_view: View,
    pub current_slide: SlideIndex,
    /// Epoch milliseconds.
    pub last_interaction: i64,
}

impl Default for PersistedSnapshot {
    fn default() -> Self {
        Self {
            current_view: View::Overview,
            current_slide: SlideIndex::FIRST,
            last_interaction: 0,
        }
    }
}

impl PersistedSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Snapshot age relative to `now_ms`; negative ages (clock skew) count as fresh.
    pub fn is_fresh(&self, now_ms: i64, freshness_ms: i64) -> bool {
        now_ms.saturating_sub(self.last_interaction) < freshness_ms
    }

    /// Wall-clock form of `last_interaction`, for diagnostics.
    pub fn last_interaction_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.last_interaction).single()
    }
}
