//! Presentation view controller: owns every piece of UI state and is the only
//! place it changes.
//!
//! The controller never blocks and never reads a clock. Every operation takes
//! the current time in epoch milliseconds; delayed work (exit animations,
//! lock release, slide retries, debounced persistence) is queued and runs when
//! the driver calls [`PresentationController::tick`].

use content::{ContentError, SanitizedFragment, FALLBACK_MESSAGE};
use shared::{
    domain::{SlideIndex, SlideRequest, View},
    protocol::{PersistedSnapshot, SNAPSHOT_KEY},
};
use storage::SessionStorage;
use tracing::{debug, info, warn};

use crate::{
    config::ControllerConfig,
    deck::{SlideDeck, SlideIndicators},
    input::{ClickTarget, InputEvent, Key, SwipeDetector, SwipeDirection},
    lock::TransitionLock,
    panels::DetailPanels,
    rollout::{RolloutField, RolloutInputs, RolloutProjection},
    schedule::{Deferred, DeferredQueue},
    story::StoryState,
};

/// What an operation did with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// An animated transition began and holds the lock.
    Started,
    /// Waiting on the detail view; will be retried.
    Deferred,
    /// Immediate, non-animated state change.
    Updated,
    /// Lost to an in-flight transition.
    Dropped,
    /// Not applicable in the current state.
    Ignored,
}

/// Side effects for the driver to carry out or render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the deck fragment and report back through `content_loaded`.
    LoadContent,
    ScrollToTop,
    ViewActivated(View),
    /// `animation` increments per change so the entry animation can restart.
    SlideShown { index: SlideIndex, animation: u64 },
    /// Deck markup is in place; `title` names the document.
    ContentReady { title: String },
    /// The fallback message replaced the deck.
    ContentFailed,
}

/// Load state of the deck fragment shown in the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckContent {
    NotLoaded,
    Loading,
    Loaded {
        title: String,
        html: String,
        slide_count: u16,
    },
    Failed {
        message: String,
    },
}

/// Where the view state machine is between switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Settled,
    /// Exit animation running; `from` stays active until the swap.
    Leaving { from: View, to: View },
}

/// Result of reading the session snapshot at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored(PersistedSnapshot),
    /// Nothing stored, or storage unreadable.
    Missing,
    /// Older than the freshness window.
    Stale,
    /// Stored value did not parse.
    Invalid,
    AlreadyRestored,
}

pub struct PresentationController {
    config: ControllerConfig,
    storage: SessionStorage,
    lock: TransitionLock,
    queue: DeferredQueue,
    active_view: View,
    phase: ViewPhase,
    deck: SlideDeck,
    story: StoryState,
    rollout: RolloutInputs,
    content: DeckContent,
    panels: DetailPanels,
    swipe: SwipeDetector,
    scroll_offset: f32,
    scroll_max: f32,
    last_interaction: i64,
    persist_due: Option<i64>,
    pending_slide: Option<SlideRequest>,
    /// Restored position, re-applied once the real deck length is known.
    restored_slide: Option<SlideIndex>,
    slide_animation: u64,
    restored: bool,
    effects: Vec<Effect>,
}

impl PresentationController {
    pub fn new(config: ControllerConfig, storage: SessionStorage) -> Self {
        Self {
            deck: SlideDeck::new(config.default_slide_count),
            story: StoryState::new(config.story_chapters),
            swipe: SwipeDetector::new(config.swipe_distance_px, config.swipe_max_duration_ms),
            config,
            storage,
            lock: TransitionLock::default(),
            queue: DeferredQueue::default(),
            active_view: View::Overview,
            phase: ViewPhase::Settled,
            rollout: RolloutInputs::default(),
            content: DeckContent::NotLoaded,
            panels: DetailPanels::default(),
            scroll_offset: 0.0,
            scroll_max: 0.0,
            last_interaction: 0,
            persist_due: None,
            pending_slide: None,
            restored_slide: None,
            slide_animation: 0,
            restored: false,
            effects: Vec::new(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.lock.is_held()
    }

    pub fn current_slide(&self) -> SlideIndex {
        self.deck.current()
    }

    pub fn slide_count(&self) -> u16 {
        self.deck.len()
    }

    pub fn slide_indicators(&self) -> SlideIndicators {
        self.deck.indicators()
    }

    pub fn slide_animation(&self) -> u64 {
        self.slide_animation
    }

    pub fn story(&self) -> &StoryState {
        &self.story
    }

    pub fn rollout_inputs(&self) -> RolloutInputs {
        self.rollout
    }

    pub fn rollout_projection(&self) -> RolloutProjection {
        self.rollout.project()
    }

    pub fn content(&self) -> &DeckContent {
        &self.content
    }

    pub fn panels(&self) -> &DetailPanels {
        &self.panels
    }

    /// The floating nav helper is shown on the detail and rollout views only.
    pub fn nav_helper_visible(&self) -> bool {
        matches!(self.active_view, View::Detail | View::Rollout)
    }

    /// Markup for the content area: the fragment, the fallback, or nothing yet.
    pub fn content_html(&self) -> Option<String> {
        match &self.content {
            DeckContent::Loaded { html, .. } => Some(html.clone()),
            DeckContent::Failed { .. } => Some(SanitizedFragment::fallback_html()),
            DeckContent::NotLoaded | DeckContent::Loading => None,
        }
    }

    pub fn last_interaction(&self) -> i64 {
        self.last_interaction
    }

    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            current_view: self.active_view,
            current_slide: self.deck.current(),
            last_interaction: self.last_interaction,
        }
    }

    /// Header progress bar width in percent.
    pub fn progress_percent(&self) -> f32 {
        if self.active_view == View::Detail && self.has_loaded_slides() {
            return self.deck.indicators().progress_percent;
        }
        if self.scroll_max <= 0.0 {
            return 0.0;
        }
        (self.scroll_offset / self.scroll_max * 100.0).clamp(0.0, 100.0)
    }

    /// Earliest instant at which `tick` has work to do.
    pub fn next_deadline(&self) -> Option<i64> {
        match (self.queue.next_due(), self.persist_due) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.next_deadline().is_none()
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Switches by raw identifier; anything outside the four views is a no-op.
    pub fn switch_view_named(&mut self, raw: &str, now_ms: i64) -> Transition {
        match View::parse(raw) {
            Some(target) => self.switch_view(target, now_ms),
            None => {
                warn!(view = raw, "unknown view requested; ignoring");
                Transition::Ignored
            }
        }
    }

    pub fn switch_view(&mut self, target: View, now_ms: i64) -> Transition {
        let Some(hold) = self.lock.try_acquire(now_ms, self.config.view_settle_ms) else {
            debug!(%target, "transition in progress; dropping view switch");
            return Transition::Dropped;
        };
        self.queue.schedule(
            hold.release_at,
            Deferred::ReleaseLock {
                generation: hold.generation,
            },
        );

        debug!(from = %self.active_view, %target, "view switch started");
        self.phase = ViewPhase::Leaving {
            from: self.active_view,
            to: target,
        };
        self.queue.schedule(
            now_ms + self.config.exit_delay_ms,
            Deferred::ActivateView { target },
        );
        self.record_interaction(now_ms);

        if target == View::Detail {
            self.ensure_content_requested();
        }
        Transition::Started
    }

    pub fn change_slide(&mut self, request: SlideRequest, now_ms: i64) -> Transition {
        if self.active_view == View::Detail {
            return self.apply_slide(request, now_ms);
        }

        if let Some(pending) = self.pending_slide {
            debug!(%request, %pending, "slide request already waiting on detail view; dropping");
            return Transition::Dropped;
        }
        if !self.switching_to(View::Detail) {
            self.switch_view(View::Detail, now_ms);
        }
        self.pending_slide = Some(request);
        self.queue.schedule(
            now_ms + self.config.slide_retry_base_ms,
            Deferred::RetrySlide {
                request,
                attempt: 1,
            },
        );
        debug!(%request, "deferring slide change until detail view is active");
        Transition::Deferred
    }

    /// Schedules a debounced snapshot write.
    pub fn persist(&mut self, now_ms: i64) {
        self.persist_due = Some(now_ms + self.config.persist_debounce_ms);
    }

    /// Re-applies a fresh snapshot from session storage. Runs once per controller.
    pub fn restore(&mut self, now_ms: i64) -> RestoreOutcome {
        if self.restored {
            return RestoreOutcome::AlreadyRestored;
        }
        self.restored = true;

        let raw = match self.storage.get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return RestoreOutcome::Missing,
            Err(error) => {
                warn!(%error, "failed to read UI snapshot; using defaults");
                return RestoreOutcome::Missing;
            }
        };
        if let Err(error) = self.storage.remove(SNAPSHOT_KEY) {
            warn!(%error, "failed to clear UI snapshot after reading");
        }

        let snapshot = match PersistedSnapshot::from_json(&raw) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(%error, "discarding malformed UI snapshot");
                return RestoreOutcome::Invalid;
            }
        };
        if !snapshot.is_fresh(now_ms, self.config.snapshot_freshness_ms) {
            info!(
                last_interaction = ?snapshot.last_interaction_at(),
                "discarding stale UI snapshot"
            );
            return RestoreOutcome::Stale;
        }

        self.active_view = snapshot.current_view;
        self.phase = ViewPhase::Settled;
        self.deck.show(snapshot.current_slide);
        self.restored_slide = Some(snapshot.current_slide);
        self.last_interaction = snapshot.last_interaction;
        if self.active_view == View::Detail {
            self.ensure_content_requested();
        }
        info!(
            view = %self.active_view,
            slide = %snapshot.current_slide,
            last_interaction = ?snapshot.last_interaction_at(),
            "restored UI snapshot"
        );
        RestoreOutcome::Restored(snapshot)
    }

    /// Completes the one content load requested through [`Effect::LoadContent`].
    pub fn content_loaded(&mut self, result: Result<SanitizedFragment, ContentError>) {
        if self.content != DeckContent::Loading {
            warn!("content result arrived without an outstanding request; ignoring");
            return;
        }

        match result {
            Ok(fragment) => {
                if fragment.slide_count > 0 {
                    self.deck.resize(fragment.slide_count);
                    if let Some(slide) = self.restored_slide.take() {
                        self.deck.show(slide);
                        debug!(slide = %self.deck.current(), "re-applied restored slide");
                    }
                } else {
                    warn!(
                        default_slides = self.deck.len(),
                        "content fragment has no slides; keeping configured deck length"
                    );
                }
                info!(title = %fragment.title, slides = fragment.slide_count, "deck content ready");
                self.effects.push(Effect::ContentReady {
                    title: fragment.title.clone(),
                });
                self.content = DeckContent::Loaded {
                    title: fragment.title,
                    html: fragment.html,
                    slide_count: fragment.slide_count,
                };
            }
            Err(error) => {
                warn!(%error, "failed to load deck content");
                self.content = DeckContent::Failed {
                    message: FALLBACK_MESSAGE.to_string(),
                };
                self.effects.push(Effect::ContentFailed);
            }
        }
    }

    pub fn toggle_panel(&mut self, id: &str) -> Transition {
        let expanded = self.panels.toggle(id);
        debug!(panel = id, expanded, "detail panel toggled");
        Transition::Updated
    }

    pub fn expand_all_panels(&mut self) -> Transition {
        if !self.panels.expand_all() {
            return Transition::Ignored;
        }
        debug!("all detail panels expanded");
        Transition::Updated
    }

    pub fn story_next(&mut self, now_ms: i64) -> Transition {
        if !self.story.next() {
            return Transition::Ignored;
        }
        self.record_interaction(now_ms);
        Transition::Updated
    }

    pub fn story_previous(&mut self, now_ms: i64) -> Transition {
        if !self.story.previous() {
            return Transition::Ignored;
        }
        self.record_interaction(now_ms);
        Transition::Updated
    }

    pub fn set_rollout_input(&mut self, field: RolloutField, raw: &str, now_ms: i64) -> Transition {
        if !self.rollout.apply(field, raw) {
            debug!(?field, value = raw, "ignoring non-numeric calculator input");
            return Transition::Ignored;
        }
        self.record_interaction(now_ms);
        Transition::Updated
    }

    pub fn handle_input(&mut self, event: InputEvent, now_ms: i64) -> Transition {
        match event {
            InputEvent::Key(key) => self.handle_key(key, now_ms),
            InputEvent::TouchStart(point) => {
                self.swipe.begin(point);
                Transition::Ignored
            }
            InputEvent::TouchEnd(point) => match self.swipe.finish(point) {
                Some(direction) if self.active_view == View::Detail => {
                    let request = match direction {
                        SwipeDirection::Left => SlideRequest::Next,
                        SwipeDirection::Right => SlideRequest::Previous,
                    };
                    self.change_slide(request, now_ms)
                }
                _ => Transition::Ignored,
            },
            InputEvent::Click(target) => self.handle_click(target, now_ms),
            InputEvent::Scroll { offset, max } => {
                self.scroll_offset = offset.max(0.0);
                self.scroll_max = max.max(0.0);
                self.record_interaction(now_ms);
                Transition::Updated
            }
            InputEvent::RolloutInput { field, value } => {
                self.set_rollout_input(field, &value, now_ms)
            }
        }
    }

    /// Runs every continuation due at or before `now_ms`. Returns how many ran.
    pub fn tick(&mut self, now_ms: i64) -> usize {
        let mut ran = 0;
        loop {
            // Persist yields to queue entries due at the same instant.
            let persist_first = match (self.persist_due, self.queue.next_due()) {
                (Some(persist), Some(task)) => persist <= now_ms && persist < task,
                (Some(persist), None) => persist <= now_ms,
                (None, _) => false,
            };
            if persist_first {
                self.persist_due = None;
                self.write_snapshot();
                ran += 1;
                continue;
            }

            let Some((due, task)) = self.queue.pop_due(now_ms) else {
                break;
            };
            self.run_deferred(task, due);
            ran += 1;
        }
        ran
    }

    fn run_deferred(&mut self, task: Deferred, now_ms: i64) {
        match task {
            Deferred::ActivateView { target } => self.activate_view(target, now_ms),
            Deferred::ReleaseLock { generation } => {
                if self.lock.release(generation) {
                    debug!(generation, "transition lock released");
                }
            }
            Deferred::RetrySlide { request, attempt } => self.retry_slide(request, attempt, now_ms),
        }
    }

    fn activate_view(&mut self, target: View, now_ms: i64) {
        let from = self.active_view;
        self.active_view = target;
        self.phase = ViewPhase::Settled;
        self.scroll_offset = 0.0;
        self.effects.push(Effect::ViewActivated(target));
        self.effects.push(Effect::ScrollToTop);
        info!(%from, to = %target, "view activated");
        self.persist(now_ms);
    }

    fn retry_slide(&mut self, request: SlideRequest, attempt: u8, now_ms: i64) {
        if self.active_view == View::Detail && !self.lock.is_held() {
            self.pending_slide = None;
            self.apply_slide(request, now_ms);
            return;
        }
        if attempt >= self.config.slide_retry_attempts {
            self.pending_slide = None;
            warn!(%request, attempt, "detail view never settled; dropping slide request");
            return;
        }

        if self.active_view != View::Detail && !self.switching_to(View::Detail) {
            self.switch_view(View::Detail, now_ms);
        }
        let next = attempt + 1;
        self.queue.schedule(
            now_ms + self.config.slide_retry_base_ms * i64::from(next),
            Deferred::RetrySlide {
                request,
                attempt: next,
            },
        );
    }

    fn apply_slide(&mut self, request: SlideRequest, now_ms: i64) -> Transition {
        if self.deck.is_empty() {
            warn!(%request, "no slides to show; ignoring slide change");
            return Transition::Ignored;
        }
        let Some(hold) = self.lock.try_acquire(now_ms, self.config.slide_settle_ms) else {
            debug!(%request, "transition in progress; dropping slide change");
            return Transition::Dropped;
        };
        self.queue.schedule(
            hold.release_at,
            Deferred::ReleaseLock {
                generation: hold.generation,
            },
        );

        self.restored_slide = None;
        let from = self.deck.current();
        let to = self.deck.resolve(request);
        self.deck.show(to);
        self.slide_animation += 1;
        self.effects.push(Effect::SlideShown {
            index: to,
            animation: self.slide_animation,
        });
        info!(%from, %to, %request, "slide changed");
        self.record_interaction(now_ms);
        Transition::Started
    }

    fn handle_key(&mut self, key: Key, now_ms: i64) -> Transition {
        let in_detail = self.active_view == View::Detail;
        match key {
            Key::ArrowRight if in_detail => self.change_slide(SlideRequest::Next, now_ms),
            Key::ArrowLeft if in_detail => self.change_slide(SlideRequest::Previous, now_ms),
            Key::Digit(digit) if in_detail => {
                self.change_slide(SlideRequest::To(u16::from(digit)), now_ms)
            }
            Key::Escape => self.switch_view(View::Overview, now_ms),
            _ => Transition::Ignored,
        }
    }

    fn handle_click(&mut self, target: ClickTarget, now_ms: i64) -> Transition {
        match target {
            ClickTarget::ViewToggle(raw) => self.switch_view_named(&raw, now_ms),
            ClickTarget::SlideDot(index) => self.change_slide(SlideRequest::To(index), now_ms),
            ClickTarget::SlideNext => self.change_slide(SlideRequest::Next, now_ms),
            ClickTarget::SlidePrevious => self.change_slide(SlideRequest::Previous, now_ms),
            ClickTarget::StoryNext => self.story_next(now_ms),
            ClickTarget::StoryPrevious => self.story_previous(now_ms),
            ClickTarget::JourneyNode(stage) => {
                self.change_slide(SlideRequest::To(stage.max(1)), now_ms)
            }
            ClickTarget::ProgressBar => {
                if self.has_loaded_slides() {
                    self.change_slide(SlideRequest::Next, now_ms)
                } else {
                    self.switch_view(self.active_view.next_in_cycle(), now_ms)
                }
            }
            ClickTarget::PanelToggle(id) => self.toggle_panel(&id),
            ClickTarget::NavHelperOverview | ClickTarget::NavHelperExpandAll
                if !self.nav_helper_visible() =>
            {
                Transition::Ignored
            }
            ClickTarget::NavHelperOverview => self.switch_view(View::Overview, now_ms),
            ClickTarget::NavHelperExpandAll => self.expand_all_panels(),
        }
    }

    fn ensure_content_requested(&mut self) {
        if self.content != DeckContent::NotLoaded {
            return;
        }
        self.content = DeckContent::Loading;
        self.effects.push(Effect::LoadContent);
        info!("requesting deck content");
    }

    fn has_loaded_slides(&self) -> bool {
        matches!(self.content, DeckContent::Loaded { slide_count, .. } if slide_count > 0)
    }

    fn switching_to(&self, view: View) -> bool {
        matches!(self.phase, ViewPhase::Leaving { to, .. } if to == view)
    }

    fn record_interaction(&mut self, now_ms: i64) {
        self.last_interaction = now_ms;
        self.persist(now_ms);
    }

    fn write_snapshot(&mut self) {
        let snapshot = self.snapshot();
        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(error) => {
                warn!(%error, "failed to serialize UI snapshot");
                return;
            }
        };
        match self.storage.set(SNAPSHOT_KEY, &json) {
            Ok(outcome) => debug!(?outcome, view = %snapshot.current_view, slide = %snapshot.current_slide, "persisted UI snapshot"),
            Err(error) => warn!(%error, "failed to persist UI snapshot; continuing without it"),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
