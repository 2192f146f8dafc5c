use client_core::{ClickTarget, InputEvent, Key, RolloutField, SwipeDirection};
use shared::domain::SlideRequest;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  view <overview|story|detail|rollout>   switch view
  slide <next|prev|N>                    change slide
  key <ArrowLeft|ArrowRight|Escape|1-9>  keyboard input
  swipe <left|right>                     touch swipe
  click <progress|dot N|journey N|next|prev|story-next|story-prev|nav-overview|nav-expand|panel ID|toggle VIEW>
  scroll <offset> <max>                  page scroll position
  set <hourlyRate|fieldForce|automationRate> <value>
  status | reload | help | quit";

const SCROLL_USAGE: &str = "scroll <offset> <max>";
const SET_USAGE: &str = "set <hourlyRate|fieldForce|automationRate> <value>";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    View(String),
    Slide(SlideRequest),
    Swipe(SwipeDirection),
    Input(InputEvent),
    Status,
    /// Rebuilds the controller over the same session store.
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("view", [name]) => Command::View(name.to_string()),
        ("view", _) => return Err(CommandError::Usage("view <name>")),
        ("slide", [raw]) => Command::Slide(
            SlideRequest::parse(raw).ok_or(CommandError::Usage("slide <next|prev|N>"))?,
        ),
        ("slide", _) => return Err(CommandError::Usage("slide <next|prev|N>")),
        ("key", [name]) => Command::Input(InputEvent::Key(Key::from_name(name))),
        ("key", _) => return Err(CommandError::Usage("key <name>")),
        ("swipe", [direction]) => match direction.to_ascii_lowercase().as_str() {
            "left" => Command::Swipe(SwipeDirection::Left),
            "right" => Command::Swipe(SwipeDirection::Right),
            _ => return Err(CommandError::Usage("swipe <left|right>")),
        },
        ("swipe", _) => return Err(CommandError::Usage("swipe <left|right>")),
        ("click", rest) => Command::Input(InputEvent::Click(parse_click(rest)?)),
        ("scroll", [offset, max]) => {
            let parse =
                |raw: &str| raw.parse::<f32>().map_err(|_| CommandError::Usage(SCROLL_USAGE));
            Command::Input(InputEvent::Scroll {
                offset: parse(*offset)?,
                max: parse(*max)?,
            })
        }
        ("scroll", _) => return Err(CommandError::Usage(SCROLL_USAGE)),
        ("set", [field, value]) => Command::Input(InputEvent::RolloutInput {
            field: RolloutField::parse(field).ok_or(CommandError::Usage(SET_USAGE))?,
            value: value.to_string(),
        }),
        ("set", _) => return Err(CommandError::Usage(SET_USAGE)),
        ("status", []) => Command::Status,
        ("reload", []) => Command::Reload,
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        _ => return Err(CommandError::Unknown(line.trim().to_string())),
    };
    Ok(Some(command))
}

fn parse_click(args: &[&str]) -> Result<ClickTarget, CommandError> {
    const USAGE: &str =
        "click <progress|dot N|journey N|next|prev|story-next|story-prev|nav-overview|nav-expand|panel ID|toggle VIEW>";
    let index = |raw: &str| raw.parse::<u16>().map_err(|_| CommandError::Usage(USAGE));

    match args {
        ["progress"] => Ok(ClickTarget::ProgressBar),
        ["next"] => Ok(ClickTarget::SlideNext),
        ["prev"] => Ok(ClickTarget::SlidePrevious),
        ["story-next"] => Ok(ClickTarget::StoryNext),
        ["story-prev"] => Ok(ClickTarget::StoryPrevious),
        ["nav-overview"] => Ok(ClickTarget::NavHelperOverview),
        ["nav-expand"] => Ok(ClickTarget::NavHelperExpandAll),
        ["panel", id] => Ok(ClickTarget::PanelToggle(id.to_string())),
        ["dot", raw] => Ok(ClickTarget::SlideDot(index(*raw)?)),
        ["journey", raw] => Ok(ClickTarget::JourneyNode(index(*raw)?)),
        ["toggle", view] => Ok(ClickTarget::ViewToggle(view.to_string())),
        _ => Err(CommandError::Usage(USAGE)),
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
