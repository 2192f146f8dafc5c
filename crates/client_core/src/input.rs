//! Discrete user input routed into the controller.

use crate::rollout::RolloutField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    /// Digit keys 1 through 9.
    Digit(u8),
    Other,
}

impl Key {
    /// Maps a DOM-style key name (`"ArrowRight"`, `"Escape"`, `"3"`).
    pub fn from_name(name: &str) -> Key {
        match name {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            other => match other.as_bytes() {
                [digit @ b'1'..=b'9'] => Key::Digit(digit - b'0'),
                _ => Key::Other,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    pub at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// View toggle carrying its raw `data-view` identifier.
    ViewToggle(String),
    SlideDot(u16),
    SlideNext,
    SlidePrevious,
    StoryNext,
    StoryPrevious,
    JourneyNode(u16),
    ProgressBar,
    /// Collapsible panel trigger carrying the panel id.
    PanelToggle(String),
    NavHelperOverview,
    NavHelperExpandAll,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(Key),
    TouchStart(TouchPoint),
    TouchEnd(TouchPoint),
    Click(ClickTarget),
    Scroll { offset: f32, max: f32 },
    RolloutInput { field: RolloutField, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved left; advances the deck.
    Left,
    Right,
}

/// Classifies a touch start/end pair as a horizontal swipe.
#[derive(Debug, Clone)]
pub struct SwipeDetector {
    start: Option<TouchPoint>,
    min_distance: f32,
    max_duration_ms: i64,
}

impl SwipeDetector {
    pub fn new(min_distance: f32, max_duration_ms: i64) -> Self {
        Self {
            start: None,
            min_distance,
            max_duration_ms,
        }
    }

    pub fn begin(&mut self, point: TouchPoint) {
        self.start = Some(point);
    }

    pub fn finish(&mut self, end: TouchPoint) -> Option<SwipeDirection> {
        let start = self.start.take()?;
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let elapsed = end.at_ms - start.at_ms;

        if elapsed >= self.max_duration_ms || dx.abs() <= dy.abs() || dx.abs() <= self.min_distance {
            return None;
        }
        Some(if dx < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32, at_ms: i64) -> TouchPoint {
        TouchPoint { x, y, at_ms }
    }

    #[test]
    fn key_names_map_to_keys() {
        assert_eq!(Key::from_name("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("7"), Key::Digit(7));
        assert_eq!(Key::from_name("0"), Key::Other);
        assert_eq!(Key::from_name("12"), Key::Other);
    }

    #[test]
    fn quick_horizontal_swipe_is_detected() {
        let mut swipe = SwipeDetector::new(50.0, 300);
        swipe.begin(point(300.0, 100.0, 0));
        assert_eq!(swipe.finish(point(200.0, 110.0, 120)), Some(SwipeDirection::Left));

        swipe.begin(point(100.0, 100.0, 0));
        assert_eq!(swipe.finish(point(180.0, 90.0, 50)), Some(SwipeDirection::Right));
    }

    #[test]
    fn slow_short_or_vertical_swipes_are_ignored() {
        let mut swipe = SwipeDetector::new(50.0, 300);
        swipe.begin(point(300.0, 100.0, 0));
        assert_eq!(swipe.finish(point(200.0, 100.0, 300)), None);

        swipe.begin(point(300.0, 100.0, 0));
        assert_eq!(swipe.finish(point(260.0, 100.0, 100)), None);

        swipe.begin(point(300.0, 100.0, 0));
        assert_eq!(swipe.finish(point(220.0, 300.0, 100)), None);
    }

    #[test]
    fn touch_end_without_start_is_ignored() {
        let mut swipe = SwipeDetector::new(50.0, 300);
        assert_eq!(swipe.finish(point(0.0, 0.0, 10)), None);
    }
}
