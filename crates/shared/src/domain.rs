use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! index_newtype {
    ($name:ident) => {
        /// One-based position.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u16);

        impl $name {
            pub const FIRST: Self = Self(1);

            pub fn get(self) -> u16 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_newtype!(SlideIndex);
index_newtype!(ChapterIndex);

/// Top-level page sections. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Overview,
    Story,
    Detail,
    Rollout,
}

impl View {
    /// Declaration order, also the cycle order used by the progress bar.
    pub const ALL: [View; 4] = [View::Overview, View::Story, View::Detail, View::Rollout];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Overview => "overview",
            View::Story => "story",
            View::Detail => "detail",
            View::Rollout => "rollout",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Story => "Story Mode",
            View::Detail => "Deep Dive",
            View::Rollout => "Rollout",
        }
    }

    pub fn section_id(self) -> String {
        format!("{}-section", self.as_str())
    }

    pub fn next_in_cycle(self) -> View {
        let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Parses a view identifier, returning `None` for anything outside the fixed set.
    pub fn parse(raw: &str) -> Option<View> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "overview" => Some(View::Overview),
            "story" => Some(View::Story),
            "detail" => Some(View::Detail),
            "rollout" => Some(View::Rollout),
            _ => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view identifier '{0}'")]
pub struct UnknownView(pub String);

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::parse(s).ok_or_else(|| UnknownView(s.to_string()))
    }
}

/// Requested slide movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideRequest {
    Next,
    Previous,
    /// Explicit one-based target; clamped into the deck bounds.
    To(u16),
}

impl SlideRequest {
    pub fn parse(raw: &str) -> Option<SlideRequest> {
        let raw = raw.trim();
        match raw.to_ascii_lowercase().as_str() {
            "next" => Some(SlideRequest::Next),
            "prev" | "previous" => Some(SlideRequest::Previous),
            other => other.parse::<u16>().ok().map(SlideRequest::To),
        }
    }
}

impl fmt::Display for SlideRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlideRequest::Next => f.write_str("next"),
            SlideRequest::Previous => f.write_str("previous"),
            SlideRequest::To(index) => write!(f, "{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_views_case_insensitively() {
        assert_eq!(View::parse("Detail"), Some(View::Detail));
        assert_eq!(View::parse(" rollout "), Some(View::Rollout));
        assert_eq!(View::parse("pricing"), None);
        assert!("nope".parse::<View>().is_err());
    }

    #[test]
    fn view_cycle_wraps_to_overview() {
        assert_eq!(View::Rollout.next_in_cycle(), View::Overview);
        assert_eq!(View::Overview.next_in_cycle(), View::Story);
    }

    #[test]
    fn slide_request_parsing() {
        assert_eq!(SlideRequest::parse("next"), Some(SlideRequest::Next));
        assert_eq!(SlideRequest::parse("prev"), Some(SlideRequest::Previous));
        assert_eq!(SlideRequest::parse("7"), Some(SlideRequest::To(7)));
        assert_eq!(SlideRequest::parse("sideways"), None);
    }

    #[test]
    fn section_ids_follow_page_markup() {
        assert_eq!(View::Detail.section_id(), "detail-section");
    }
}
