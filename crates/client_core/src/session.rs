use std::sync::Arc;

use chrono::Utc;
use content::{ContentFetcher, FragmentSanitizer};
use tracing::{debug, info};

use crate::controller::{Effect, PresentationController};

/// Wall-clock time in epoch milliseconds, the time base every controller call uses.
pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Couples a controller with the collaborators that carry out its effects.
pub struct PresenterSession {
    controller: PresentationController,
    fetcher: Arc<dyn ContentFetcher>,
    sanitizer: FragmentSanitizer,
}

impl PresenterSession {
    pub fn new(
        controller: PresentationController,
        fetcher: Arc<dyn ContentFetcher>,
        sanitizer: FragmentSanitizer,
    ) -> Self {
        Self {
            controller,
            fetcher,
            sanitizer,
        }
    }

    pub fn controller(&self) -> &PresentationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PresentationController {
        &mut self.controller
    }

    /// Drains pending effects, performing content loads in place.
    ///
    /// Returns every effect observed, including those produced by the load
    /// itself, so the caller can render them in order.
    pub async fn process_effects(&mut self) -> Vec<Effect> {
        let mut observed = Vec::new();
        loop {
            let batch = self.controller.drain_effects();
            if batch.is_empty() {
                break;
            }
            for effect in batch {
                if effect == Effect::LoadContent {
                    self.load_content().await;
                }
                observed.push(effect);
            }
        }
        observed
    }

    async fn load_content(&mut self) {
        debug!("fetching content fragment");
        let result = self
            .fetcher
            .fetch_fragment()
            .await
            .map(|raw| self.sanitizer.sanitize(&raw));
        if let Ok(fragment) = &result {
            info!(document_title = %fragment.document_title(), "content fragment fetched");
        }
        self.controller.content_loaded(result);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
