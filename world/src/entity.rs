//! Capabilities shared by the things placed inside a map.

use overworld_core::{Displacement, Door, EncounterEvent, Rect};
use rand::RngCore;

use crate::{
    structure::Structure,
    trigger::{SpeciesPools, TriggerZone},
};

/// Anything occupying a rectangle of a map.
pub trait Placed {
    /// Rectangle covered by the entity.
    fn bounds(&self) -> Rect;
}

/// Entity that may shorten the player's movement.
pub trait Collider: Placed {
    /// Returns the part of `requested` that `body` may travel without
    /// penetrating the entity.
    fn resolve(&self, requested: Displacement, body: &Rect) -> Displacement;
}

/// Entity that may start a random encounter.
pub trait EncounterSource: Placed {
    /// Rolls for an encounter given the footprint the player will occupy.
    fn maybe_trigger(
        &self,
        body: &Rect,
        pools: &SpeciesPools,
        rng: &mut dyn RngCore,
    ) -> Option<EncounterEvent>;
}

/// Closed set of entity kinds a map can contain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// Solid obstacle.
    Structure(Structure),
    /// Encounter area.
    TriggerZone(TriggerZone),
}

impl Entity {
    /// Collision behaviour, if the entity blocks movement.
    #[must_use]
    pub fn collider(&self) -> Option<&dyn Collider> {
        match self {
            Self::Structure(structure) => Some(structure),
            Self::TriggerZone(_) => None,
        }
    }

    /// Encounter behaviour, if the entity can start encounters.
    #[must_use]
    pub fn encounter_source(&self) -> Option<&dyn EncounterSource> {
        match self {
            Self::Structure(_) => None,
            Self::TriggerZone(zone) => Some(zone),
        }
    }

    /// Doors owned by the entity.
    #[must_use]
    pub fn doors(&self) -> &[Door] {
        match self {
            Self::Structure(structure) => structure.doors(),
            Self::TriggerZone(_) => &[],
        }
    }
}

impl Placed for Entity {
    fn bounds(&self) -> Rect {
        match self {
            Self::Structure(structure) => structure.bounds(),
            Self::TriggerZone(zone) => zone.bounds(),
        }
    }
}

impl From<Structure> for Entity {
    fn from(structure: Structure) -> Self {
        Self::Structure(structure)
    }
}

impl From<TriggerZone> for Entity {
    fn from(zone: TriggerZone) -> Self {
        Self::TriggerZone(zone)
    }
}
