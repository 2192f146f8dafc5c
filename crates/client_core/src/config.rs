use serde::Deserialize;

/// Timing and sizing knobs for the presentation controller.
///
/// All durations are milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Delay between deactivating the current view and activating the target.
    pub exit_delay_ms: i64,
    /// Lock hold time for a view switch, measured from the request.
    pub view_settle_ms: i64,
    /// Lock hold time for a slide change.
    pub slide_settle_ms: i64,
    /// Base backoff for a slide request waiting on the detail view.
    pub slide_retry_base_ms: i64,
    pub slide_retry_attempts: u8,
    pub persist_debounce_ms: i64,
    pub snapshot_freshness_ms: i64,
    /// Deck length assumed until the content fragment reports its own.
    pub default_slide_count: u16,
    pub story_chapters: u16,
    pub swipe_distance_px: f32,
    pub swipe_max_duration_ms: i64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            exit_delay_ms: 200,
            view_settle_ms: 500,
            slide_settle_ms: 300,
            slide_retry_base_ms: 200,
            slide_retry_attempts: 4,
            persist_debounce_ms: 500,
            snapshot_freshness_ms: 60 * 60 * 1000,
            default_slide_count: 10,
            story_chapters: 5,
            swipe_distance_px: 50.0,
            swipe_max_duration_ms: 300,
        }
    }
}
