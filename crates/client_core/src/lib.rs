//! Presentation view controller and the state machines it drives.

pub mod config;
pub mod controller;
pub mod deck;
pub mod input;
mod lock;
pub mod panels;
pub mod rollout;
mod schedule;
pub mod session;
pub mod story;

pub use config::ControllerConfig;
pub use controller::{
    DeckContent, Effect, PresentationController, RestoreOutcome, Transition, ViewPhase,
};
pub use deck::{SlideDeck, SlideIndicators};
pub use input::{ClickTarget, InputEvent, Key, SwipeDetector, SwipeDirection, TouchPoint};
pub use panels::DetailPanels;
pub use rollout::{RolloutField, RolloutInputs, RolloutProjection};
pub use session::{epoch_millis, PresenterSession};
pub use story::StoryState;
