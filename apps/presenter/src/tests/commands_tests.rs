use super::*;

#[test]
fn blank_lines_are_skipped() {
    assert_eq!(parse_command("   "), Ok(None));
}

#[test]
fn parses_navigation_commands() {
    assert_eq!(
        parse_command("view detail"),
        Ok(Some(Command::View("detail".to_string())))
    );
    assert_eq!(
        parse_command("slide prev"),
        Ok(Some(Command::Slide(SlideRequest::Previous)))
    );
    assert_eq!(
        parse_command("slide 4"),
        Ok(Some(Command::Slide(SlideRequest::To(4))))
    );
    assert_eq!(
        parse_command("SWIPE left"),
        Ok(Some(Command::Swipe(SwipeDirection::Left)))
    );
    assert_eq!(
        parse_command("key ArrowRight"),
        Ok(Some(Command::Input(InputEvent::Key(Key::ArrowRight))))
    );
}

#[test]
fn parses_clicks_and_form_input() {
    assert_eq!(
        parse_command("click journey 3"),
        Ok(Some(Command::Input(InputEvent::Click(
            ClickTarget::JourneyNode(3)
        ))))
    );
    assert_eq!(
        parse_command("click toggle rollout"),
        Ok(Some(Command::Input(InputEvent::Click(
            ClickTarget::ViewToggle("rollout".to_string())
        ))))
    );
    assert_eq!(
        parse_command("click panel pricing"),
        Ok(Some(Command::Input(InputEvent::Click(
            ClickTarget::PanelToggle("pricing".to_string())
        ))))
    );
    assert_eq!(
        parse_command("click nav-expand"),
        Ok(Some(Command::Input(InputEvent::Click(
            ClickTarget::NavHelperExpandAll
        ))))
    );
    assert_eq!(
        parse_command("set automationRate 90"),
        Ok(Some(Command::Input(InputEvent::RolloutInput {
            field: RolloutField::AutomationRate,
            value: "90".to_string(),
        })))
    );
    assert_eq!(
        parse_command("scroll 120 480"),
        Ok(Some(Command::Input(InputEvent::Scroll {
            offset: 120.0,
            max: 480.0,
        })))
    );
}

#[test]
fn reports_usage_for_bad_arguments() {
    assert_eq!(
        parse_command("slide sideways"),
        Err(CommandError::Usage("slide <next|prev|N>"))
    );
    assert!(matches!(
        parse_command("click dot x"),
        Err(CommandError::Usage(_))
    ));
    assert!(matches!(
        parse_command("scroll a b"),
        Err(CommandError::Usage(_))
    ));
    assert_eq!(
        parse_command("dance"),
        Err(CommandError::Unknown("dance".to_string()))
    );
}

#[test]
fn session_commands() {
    assert_eq!(parse_command("status"), Ok(Some(Command::Status)));
    assert_eq!(parse_command("reload"), Ok(Some(Command::Reload)));
    assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
}
