use std::sync::Arc;

use content::{FragmentSanitizer, StaticContentFetcher};
use shared::domain::View;
use storage::SessionStorage;

use super::*;
use crate::{
    config::ControllerConfig,
    controller::{DeckContent, Transition},
};

const T0: i64 = 1_700_000_000_000;

fn session(fetcher: StaticContentFetcher) -> PresenterSession {
    let controller =
        PresentationController::new(ControllerConfig::default(), SessionStorage::unavailable());
    PresenterSession::new(
        controller,
        Arc::new(fetcher),
        FragmentSanitizer::new().expect("sanitizer"),
    )
}

#[tokio::test]
async fn load_effect_fetches_and_sanitizes_fragment() {
    let mut session = session(StaticContentFetcher::new(
        r#"<body><nav>menu</nav><h2>Field Rollout</h2>
        <section class="webdeck-slide">a</section>
        <section class="webdeck-slide">b</section>
        <section class="webdeck-slide">c</section></body>"#,
    ));

    assert_eq!(
        session.controller_mut().switch_view(View::Detail, T0),
        Transition::Started
    );
    let effects = session.process_effects().await;

    assert_eq!(
        effects,
        vec![
            Effect::LoadContent,
            Effect::ContentReady {
                title: "Field Rollout".to_string()
            }
        ]
    );
    assert_eq!(session.controller().slide_count(), 3);
    let html = session.controller().content_html().expect("markup");
    assert!(!html.contains("<nav"));

    session.controller_mut().tick(T0 + 1_000);
    assert_eq!(
        session.process_effects().await,
        vec![Effect::ViewActivated(View::Detail), Effect::ScrollToTop]
    );
}

#[tokio::test]
async fn failing_fetch_leaves_fallback_content() {
    let mut session = session(StaticContentFetcher::failing());

    session.controller_mut().switch_view(View::Detail, T0);
    let effects = session.process_effects().await;

    assert!(effects.contains(&Effect::ContentFailed));
    assert!(matches!(
        session.controller().content(),
        DeckContent::Failed { .. }
    ));
}

#[test]
fn epoch_millis_is_after_2020() {
    assert!(epoch_millis() > 1_577_836_800_000);
}
