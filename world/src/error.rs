//! Configuration errors detected while assembling a world.

use overworld_core::{Extent, GeometryError, Point, Rect};

/// Reasons a world description is rejected before it becomes playable.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A segment or door was built from diagonal endpoints.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// A map, structure or trigger zone has zero width or height.
    #[error("{what} has zero area: {rect:?}")]
    DegenerateRect {
        /// Kind of element that was rejected.
        what: &'static str,
        /// Offending rectangle.
        rect: Rect,
    },
    /// A door leads to a map index that does not exist.
    #[error("door in map {map} leads to missing map {destination}")]
    InvalidDoorDestination {
        /// Map that owns the door.
        map: usize,
        /// Destination index stored on the door.
        destination: usize,
    },
    /// The description contains no maps at all.
    #[error("world description contains no maps")]
    NoMaps,
    /// The player starts in a map that does not exist.
    #[error("player starts in missing map {map}")]
    InvalidStartingMap {
        /// Requested starting map index.
        map: usize,
    },
    /// The player's starting position lies outside the starting map.
    #[error("player start {position:?} lies outside map {map}")]
    StartOutOfBounds {
        /// Starting map index.
        map: usize,
        /// Requested anchor position.
        position: Point,
    },
    /// The player footprint has a negative dimension.
    #[error("player footprint {size:?} has a negative dimension")]
    NegativeFootprint {
        /// Requested footprint size.
        size: Extent,
    },
    /// The player movement speed is negative.
    #[error("player speed {speed} is negative")]
    NegativeSpeed {
        /// Requested speed.
        speed: i32,
    },
    /// A trigger zone's level range contains no level.
    #[error("level range {low}..{high} is empty")]
    EmptyLevelRange {
        /// Inclusive lower bound.
        low: u32,
        /// Exclusive upper bound.
        high: u32,
    },
    /// A trigger zone references a species pool that was not declared.
    #[error("species pool `{name}` is not defined")]
    UnknownSpeciesPool {
        /// Pool name used by the zone.
        name: String,
    },
    /// The parameters of a known entity kind could not be decoded.
    #[error("entity {index} of kind `{kind}` in map {map} is malformed")]
    InvalidEntity {
        /// Map that lists the entity.
        map: usize,
        /// Position of the entity within the map's entity list.
        index: usize,
        /// Kind tag of the entity.
        kind: String,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
}
