//! Line-oriented input mapping for the headless frame loop.

use anyhow::{bail, Result};
use overworld_core::Direction;
use overworld_system_controls::InputEvent;

const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

/// What a single input line asks the frame loop to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FrameInput {
    /// Run one tick after applying the listed input events.
    Tick(Vec<InputEvent>),
    /// End the session without running another tick.
    Quit,
}

/// Parses one line of whitespace-separated tokens.
///
/// `+dir` presses and `-dir` releases a direction, `stop` releases all of
/// them and `quit` ends the session. An empty line runs a tick with no input
/// changes.
pub(crate) fn parse_line(line: &str) -> Result<FrameInput> {
    let mut inputs = Vec::new();
    for token in line.split_whitespace() {
        match token {
            "quit" | "q" => return Ok(FrameInput::Quit),
            "stop" => inputs.extend(DIRECTIONS.map(InputEvent::Released)),
            _ => inputs.push(parse_token(token)?),
        }
    }
    Ok(FrameInput::Tick(inputs))
}

fn parse_token(token: &str) -> Result<InputEvent> {
    let (pressed, name) = if let Some(name) = token.strip_prefix('+') {
        (true, name)
    } else if let Some(name) = token.strip_prefix('-') {
        (false, name)
    } else {
        bail!("input token `{token}` must start with `+` or `-`");
    };
    let direction = match name {
        "up" => Direction::Up,
        "down" => Direction::Down,
        "left" => Direction::Left,
        "right" => Direction::Right,
        _ => bail!("unknown direction `{name}`"),
    };
    Ok(if pressed {
        InputEvent::Pressed(direction)
    } else {
        InputEvent::Released(direction)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_is_an_idle_tick() {
        assert_eq!(
            parse_line("   ").expect("parses"),
            FrameInput::Tick(Vec::new())
        );
    }

    #[test]
    fn press_and_release_tokens_map_to_events() {
        assert_eq!(
            parse_line("+left -up").expect("parses"),
            FrameInput::Tick(vec![
                InputEvent::Pressed(Direction::Left),
                InputEvent::Released(Direction::Up),
            ])
        );
    }

    #[test]
    fn stop_releases_every_direction() {
        let FrameInput::Tick(inputs) = parse_line("stop").expect("parses") else {
            panic!("stop should not quit");
        };
        assert_eq!(inputs.len(), 4);
        assert!(inputs
            .iter()
            .all(|input| matches!(input, InputEvent::Released(_))));
    }

    #[test]
    fn quit_ends_the_session() {
        assert_eq!(parse_line("+up quit").expect("parses"), FrameInput::Quit);
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert!(parse_line("+north").is_err());
        assert!(parse_line("left").is_err());
    }
}
