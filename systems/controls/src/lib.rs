#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that turns held directions into per-tick movement requests.

use overworld_core::{Axis, Command, Direction, Displacement};

/// Press or release of a direction, as reported by an input adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// The direction started being held.
    Pressed(Direction),
    /// The direction stopped being held.
    Released(Direction),
}

/// Tracks which direction is held on each axis.
///
/// Pressing a direction replaces whatever was held on its axis. Releasing a
/// direction clears the axis only if that direction is the one held, so
/// releasing a key that was already overridden has no effect.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    horizontal: Option<Direction>,
    vertical: Option<Direction>,
}

impl Controls {
    /// Creates a controller with nothing held.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            horizontal: None,
            vertical: None,
        }
    }

    /// Displacement requested by the held directions at `speed` units per tick.
    #[must_use]
    pub fn requested(&self, speed: i32) -> Displacement {
        [self.horizontal, self.vertical]
            .into_iter()
            .flatten()
            .fold(Displacement::ZERO, |requested, direction| {
                requested.with_along(direction.axis(), direction.sign() * speed)
            })
    }

    /// Applies this frame's inputs and emits exactly one step command.
    pub fn handle(&mut self, inputs: &[InputEvent], speed: i32, out: &mut Vec<Command>) {
        for input in inputs {
            match *input {
                InputEvent::Pressed(direction) => *self.slot(direction.axis()) = Some(direction),
                InputEvent::Released(direction) => {
                    let slot = self.slot(direction.axis());
                    if *slot == Some(direction) {
                        *slot = None;
                    }
                }
            }
        }

        out.push(Command::Step {
            requested: self.requested(speed),
        });
    }

    fn slot(&mut self, axis: Axis) -> &mut Option<Direction> {
        match axis {
            Axis::X => &mut self.horizontal,
            Axis::Y => &mut self.vertical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_controls_request_nothing() {
        assert_eq!(Controls::new().requested(50), Displacement::ZERO);
    }

    #[test]
    fn held_directions_combine_across_axes() {
        let mut controls = Controls::new();
        let mut commands = Vec::new();

        controls.handle(
            &[
                InputEvent::Pressed(Direction::Left),
                InputEvent::Pressed(Direction::Down),
            ],
            7,
            &mut commands,
        );

        assert_eq!(controls.requested(7), Displacement::new(-7, 7));
        assert_eq!(
            commands,
            vec![Command::Step {
                requested: Displacement::new(-7, 7),
            }]
        );
    }
}
