#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Overworld engine.
//!
//! This crate defines the geometry and message surface that connects adapters,
//! the authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing the movement requested for a frame, the world resolves them via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically.

mod geometry;

use serde::{Deserialize, Serialize};

pub use geometry::{Axis, Displacement, Door, Extent, GeometryError, Point, Rect, Segment};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Runs one tick, moving the player by as much of `requested` as the
    /// current map allows.
    Step {
        /// Displacement derived from input for this tick.
        requested: Displacement,
    },
    /// Places the player at a stored checkpoint without collision resolution.
    Teleport {
        /// Map that becomes current.
        map: MapId,
        /// Anchor position of the player inside that map.
        position: Point,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that a tick started.
    TimeAdvanced {
        /// Number of ticks processed so far, including this one.
        tick: u64,
    },
    /// Confirms that the player moved within the current map.
    PlayerMoved {
        /// Anchor position before the tick.
        from: Point,
        /// Anchor position after the corrected displacement was applied.
        to: Point,
        /// Displacement requested by input.
        requested: Displacement,
        /// Displacement left after bounds and structure correction.
        resolved: Displacement,
    },
    /// Announces a random encounter for the external battle collaborator.
    EncounterTriggered {
        /// Species and level drawn by the trigger zone.
        encounter: EncounterEvent,
    },
    /// Announces that the current map changed.
    MapEntered {
        /// Map that was active before the change.
        from: MapId,
        /// Map that is active now.
        to: MapId,
        /// Anchor position the player was placed at.
        position: Point,
    },
    /// Reports that a teleport targeted a missing map or an out-of-bounds point.
    TeleportRejected {
        /// Requested map.
        map: MapId,
        /// Requested anchor position.
        position: Point,
    },
}

/// Index of a map within the world's ordered map list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(usize);

impl MapId {
    /// Creates a map identifier from its list index.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the list index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Identifier of a species known to the external species catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(u32);

impl SpeciesId {
    /// Creates a new species identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Experience level of an encountered creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Level(u32);

impl Level {
    /// Wraps a raw level value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the raw level value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Elemental type label attached to species, e.g. `"grass"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    /// Creates a tag from its label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Label of the tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Encounter handed to the battle system when a trigger zone fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncounterEvent {
    species: SpeciesId,
    level: Level,
}

impl EncounterEvent {
    /// Creates a new encounter description.
    #[must_use]
    pub const fn new(species: SpeciesId, level: Level) -> Self {
        Self { species, level }
    }

    /// Species the player encounters.
    #[must_use]
    pub const fn species(&self) -> SpeciesId {
        self.species
    }

    /// Level of the encountered creature.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing vertical coordinates.
    Up,
    /// Movement toward increasing vertical coordinates.
    Down,
    /// Movement toward decreasing horizontal coordinates.
    Left,
    /// Movement toward increasing horizontal coordinates.
    Right,
}

impl Direction {
    /// Axis the direction moves along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Y,
            Self::Left | Self::Right => Axis::X,
        }
    }

    /// Sign of the movement along [`Direction::axis`].
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Up | Self::Left => -1,
            Self::Down | Self::Right => 1,
        }
    }

    /// Displacement covering `distance` units in this direction.
    #[must_use]
    pub const fn scaled(self, distance: i32) -> Displacement {
        Displacement::ZERO.with_along(self.axis(), self.sign() * distance)
    }
}
