use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    epoch_millis, Effect, InputEvent, PresentationController, PresenterSession, SwipeDirection,
    TouchPoint, Transition, ViewPhase,
};
use content::{ContentFetcher, FragmentSanitizer, HttpContentFetcher, DOCUMENT_TITLE_SUFFIX};
use storage::{MemorySessionStore, SessionStorage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::{wrappers::LinesStream, StreamExt};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod settings;

use commands::{parse_command, Command, HELP};
use settings::{load_settings, PresenterSettings};

#[derive(Parser, Debug)]
struct Args {
    /// Optional TOML settings file.
    #[arg(long, default_value = "presenter.toml")]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    tick_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(tick_ms) = args.tick_ms {
        settings.tick_interval_ms = tick_ms;
    }
    info!(server_url = %settings.server_url, tick_ms = settings.tick_interval_ms, "presenter starting");

    let fetcher: Arc<dyn ContentFetcher> = Arc::new(
        HttpContentFetcher::new(&settings.server_url)
            .with_context(|| format!("invalid server url '{}'", settings.server_url))?,
    );
    // Survives `reload` the way a browser session store survives a page reload.
    let store = MemorySessionStore::new();

    let mut session = open_session(&settings, &store, fetcher.clone())?;
    render_effects(&session.process_effects().await);
    print_status(session.controller());
    println!("{HELP}");

    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    let mut ticker = tokio::time::interval(Duration::from_millis(settings.tick_interval_ms.max(1)));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if session.controller_mut().tick(epoch_millis()) > 0 {
                    render_effects(&session.process_effects().await);
                }
            }
            line = lines.next() => {
                let Some(line) = line else {
                    debug!("stdin closed");
                    break;
                };
                let line = line.context("failed to read stdin")?;
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };

                match command {
                    Command::Quit => break,
                    Command::Reload => {
                        session = open_session(&settings, &store, fetcher.clone())?;
                        print_status(session.controller());
                    }
                    Command::Help => println!("{HELP}"),
                    Command::Status => print_status(session.controller()),
                    other => {
                        let transition = apply(session.controller_mut(), other, &settings);
                        report(transition);
                    }
                }
                render_effects(&session.process_effects().await);
            }
        }
    }

    info!("presenter exiting");
    Ok(())
}

fn open_session(
    settings: &PresenterSettings,
    store: &MemorySessionStore,
    fetcher: Arc<dyn ContentFetcher>,
) -> Result<PresenterSession> {
    let storage = SessionStorage::new(Arc::new(store.clone()));
    let mut controller = PresentationController::new(settings.controller.clone(), storage);
    let outcome = controller.restore(epoch_millis());
    info!(?outcome, "session restore");

    let sanitizer = FragmentSanitizer::new().context("failed to build fragment sanitizer")?;
    Ok(PresenterSession::new(controller, fetcher, sanitizer))
}

fn apply(
    controller: &mut PresentationController,
    command: Command,
    settings: &PresenterSettings,
) -> Transition {
    let now = epoch_millis();
    match command {
        Command::View(raw) => controller.switch_view_named(&raw, now),
        Command::Slide(request) => controller.change_slide(request, now),
        Command::Swipe(direction) => {
            let distance = settings.controller.swipe_distance_px + 1.0;
            let dx = match direction {
                SwipeDirection::Left => -distance,
                SwipeDirection::Right => distance,
            };
            let start = TouchPoint {
                x: 0.0,
                y: 0.0,
                at_ms: now,
            };
            controller.handle_input(InputEvent::TouchStart(start), now);
            controller.handle_input(InputEvent::TouchEnd(TouchPoint { x: dx, ..start }), now)
        }
        Command::Input(event) => controller.handle_input(event, now),
        Command::Status | Command::Reload | Command::Help | Command::Quit => {
            warn!(?command, "session command reached the controller; ignoring");
            Transition::Ignored
        }
    }
}

fn report(transition: Transition) {
    match transition {
        Transition::Dropped => println!("(dropped: transition in progress)"),
        Transition::Ignored => println!("(ignored)"),
        Transition::Deferred => println!("(waiting for deep dive view)"),
        Transition::Started | Transition::Updated => {}
    }
}

fn render_effects(effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::LoadContent => println!("[content] loading deck..."),
            Effect::ScrollToTop => debug!("scroll to top"),
            Effect::ViewActivated(view) => {
                println!("[view] {} (#{})", view.label(), view.section_id())
            }
            Effect::SlideShown { index, animation } => {
                println!("[slide] {index} (animation #{animation})")
            }
            Effect::ContentReady { title } => {
                println!("[content] {title}{DOCUMENT_TITLE_SUFFIX}")
            }
            Effect::ContentFailed => println!("[content] {}", content::FALLBACK_MESSAGE),
        }
    }
}

fn print_status(controller: &PresentationController) {
    let phase = match controller.phase() {
        ViewPhase::Settled => String::new(),
        ViewPhase::Leaving { to, .. } => format!(" -> {}", to.label()),
    };
    let indicators = controller.slide_indicators();
    let projection = controller.rollout_projection();
    let story = controller.story();

    println!("view:     {}{phase}", controller.active_view().label());
    if controller.nav_helper_visible() {
        let panels = controller.panels();
        let expanded = if panels.all_expanded() {
            "all".to_string()
        } else {
            panels.expanded_ids().collect::<Vec<_>>().join(", ")
        };
        println!("panels:   expanded [{expanded}]");
    }
    println!(
        "slide:    {} ({:.0}% of deck)",
        indicators.counter, indicators.progress_percent
    );
    println!("progress: {:.0}%", controller.progress_percent());
    println!(
        "story:    chapter {} of {} ({:.0}%)",
        story.current(),
        story.chapters(),
        story.progress_percent()
    );
    println!(
        "rollout:  cost base {}, savings {}, ROI {}",
        projection.cost_base_display(),
        projection.savings_display(),
        projection.roi_display()
    );
}
