#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that records what external collaborators need from a session:
//! the encounters awaiting the battle system and the last known player
//! placement for saving.

use std::collections::VecDeque;

use overworld_core::{Command, EncounterEvent, Event, MapId, Point};
use serde::{Deserialize, Serialize};

/// Map and anchor position the player can be restored to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checkpoint {
    map: MapId,
    position: Point,
}

impl Checkpoint {
    /// Creates a checkpoint in `map` at `position`.
    #[must_use]
    pub const fn new(map: MapId, position: Point) -> Self {
        Self { map, position }
    }

    /// Map of the checkpoint.
    #[must_use]
    pub const fn map(&self) -> MapId {
        self.map
    }

    /// Player anchor position of the checkpoint.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }
}

/// Event-driven record of encounters and player placement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Journal {
    checkpoint: Option<Checkpoint>,
    pending: VecDeque<EncounterEvent>,
}

impl Journal {
    /// Creates a journal that starts from a known placement.
    #[must_use]
    pub fn starting_at(checkpoint: Checkpoint) -> Self {
        Self {
            checkpoint: Some(checkpoint),
            pending: VecDeque::new(),
        }
    }

    /// Consumes world events emitted by the last tick.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PlayerMoved { to, .. } => {
                    if let Some(checkpoint) = self.checkpoint.as_mut() {
                        checkpoint.position = *to;
                    }
                }
                Event::MapEntered { to, position, .. } => {
                    self.checkpoint = Some(Checkpoint::new(*to, *position));
                }
                Event::EncounterTriggered { encounter } => self.pending.push_back(*encounter),
                Event::TimeAdvanced { .. } | Event::TeleportRejected { .. } => {}
            }
        }
    }

    /// Last known placement of the player.
    #[must_use]
    pub const fn checkpoint(&self) -> Option<Checkpoint> {
        self.checkpoint
    }

    /// Hands every queued encounter over, oldest first.
    pub fn take_encounters(&mut self) -> Vec<EncounterEvent> {
        self.pending.drain(..).collect()
    }

    /// Emits the command that places the player back at the checkpoint.
    pub fn restore(&self, out: &mut Vec<Command>) {
        if let Some(checkpoint) = self.checkpoint {
            out.push(Command::Teleport {
                map: checkpoint.map,
                position: checkpoint.position,
            });
        }
    }
}
